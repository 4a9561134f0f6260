use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

use crate::rl_env::TensorSpec;

/// Network architecture of a policy or critic. Deserializes from a tagged
/// object or the name `"auto"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(remote = "Self", tag = "type", rename_all = "snake_case")]
pub enum NetworkSpec {
    /// Automatically configured dense network, optionally followed by an LSTM
    /// cell with the given horizon.
    Auto {
        size: usize,
        depth: usize,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        internal_rnn: Option<usize>,
    },
    Mlp {
        n_layers: usize,
        layer_size: usize,
    },
    Lstm {
        layer_size: usize,
        horizon: usize,
    },
}

impl NetworkSpec {
    pub fn auto(size: usize, depth: usize) -> Self {
        return NetworkSpec::Auto {
            size,
            depth,
            internal_rnn: None,
        };
    }

    pub fn with_internal_rnn(self, horizon: usize) -> Self {
        match self {
            NetworkSpec::Auto { size, depth, .. } => NetworkSpec::Auto {
                size,
                depth,
                internal_rnn: Some(horizon),
            },
            other => other,
        }
    }

    /// Recurrent horizon of the network, if it has one.
    pub fn rnn_horizon(&self) -> Option<usize> {
        match self {
            NetworkSpec::Auto { internal_rnn, .. } => *internal_rnn,
            NetworkSpec::Mlp { .. } => None,
            NetworkSpec::Lstm { horizon, .. } => Some(*horizon),
        }
    }

    pub(crate) fn check(&self) -> Result<(), String> {
        let sizes_ok = match self {
            NetworkSpec::Auto { size, depth, .. } => *size > 0 && *depth > 0,
            NetworkSpec::Mlp {
                n_layers,
                layer_size,
            } => *n_layers > 0 && *layer_size > 0,
            NetworkSpec::Lstm { layer_size, .. } => *layer_size > 0,
        };
        if !sizes_ok {
            return Err(format!("{self:?} has an empty layer"));
        }
        if self.rnn_horizon() == Some(0) {
            return Err(format!("{self:?} has a zero rnn horizon"));
        }
        return Ok(());
    }
}

impl Default for NetworkSpec {
    fn default() -> Self {
        return NetworkSpec::auto(64, 2);
    }
}

impl Serialize for NetworkSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        return NetworkSpec::serialize(self, serializer);
    }
}

impl<'de> Deserialize<'de> for NetworkSpec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Name(String),
            #[serde(deserialize_with = "NetworkSpec::deserialize")]
            Spec(NetworkSpec),
        }
        match Raw::deserialize(deserializer)? {
            Raw::Spec(network) => Ok(network),
            Raw::Name(name) if name == "auto" => Ok(NetworkSpec::default()),
            Raw::Name(name) => Err(de::Error::custom(format!(
                "unknown network {name:?}, expected \"auto\" or a network spec"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FloatDistribution {
    Gaussian,
    Beta,
}

/// Distribution overrides per action type. Unset types use the default for
/// their action spec.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DistributionsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub float: Option<FloatDistribution>,
}

impl DistributionsConfig {
    pub fn float(distribution: FloatDistribution) -> Self {
        return Self {
            float: Some(distribution),
        };
    }

    /// Distribution a float action resolves to: bounded actions default to
    /// Beta, unbounded ones to Gaussian.
    pub fn float_distribution(&self, action: &TensorSpec) -> FloatDistribution {
        if let Some(distribution) = self.float {
            return distribution;
        }
        if action.is_bounded_float() {
            return FloatDistribution::Beta;
        }
        return FloatDistribution::Gaussian;
    }

    fn is_default(&self) -> bool {
        return self.float.is_none();
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyConfig {
    pub network: NetworkSpec,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default, skip_serializing_if = "DistributionsConfig::is_default")]
    pub distributions: DistributionsConfig,
}

fn default_temperature() -> f32 {
    1.0
}

impl PolicyConfig {
    pub fn new(network: NetworkSpec) -> Self {
        return Self {
            network,
            temperature: default_temperature(),
            distributions: DistributionsConfig::default(),
        };
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_distributions(mut self, distributions: DistributionsConfig) -> Self {
        self.distributions = distributions;
        self
    }
}
