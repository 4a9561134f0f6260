use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

/// Learning rate of an optimizer given only by name.
pub const DEFAULT_LEARNING_RATE: f32 = 1e-3;

/// Optimizer as a chain of stages. Wrapping stages hold the optimizer they decorate.
/// Deserializes from a tagged object or the name `"adam"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(remote = "Self", tag = "type", rename_all = "snake_case")]
pub enum OptimizerConfig {
    Adam {
        learning_rate: f32,
    },
    /// Trains each step on a random `fraction` of the batch.
    SubsamplingStep {
        optimizer: Box<OptimizerConfig>,
        fraction: f32,
    },
    /// Runs the wrapped optimizer `num_steps` times per update.
    MultiStep {
        optimizer: Box<OptimizerConfig>,
        num_steps: usize,
    },
}

impl OptimizerConfig {
    pub fn adam(learning_rate: f32) -> Self {
        return OptimizerConfig::Adam { learning_rate };
    }

    pub fn subsampling_step(self, fraction: f32) -> Self {
        return OptimizerConfig::SubsamplingStep {
            optimizer: Box::new(self),
            fraction,
        };
    }

    pub fn multi_step(self, num_steps: usize) -> Self {
        return OptimizerConfig::MultiStep {
            optimizer: Box::new(self),
            num_steps,
        };
    }

    /// The wrapped stage, `None` for a base optimizer.
    pub fn inner(&self) -> Option<&OptimizerConfig> {
        match self {
            OptimizerConfig::Adam { .. } => None,
            OptimizerConfig::SubsamplingStep { optimizer, .. }
            | OptimizerConfig::MultiStep { optimizer, .. } => Some(optimizer.as_ref()),
        }
    }

    /// Stages from the outermost to the base optimizer.
    pub fn stages(&self) -> Vec<&OptimizerConfig> {
        let mut stages = vec![self];
        let mut current = self;
        while let Some(inner) = current.inner() {
            stages.push(inner);
            current = inner;
        }
        return stages;
    }

    pub fn learning_rate(&self) -> f32 {
        match self {
            OptimizerConfig::Adam { learning_rate } => *learning_rate,
            _ => self.inner().map_or(0.0, |inner| inner.learning_rate()),
        }
    }

    /// Product of all subsampling fractions in the chain.
    pub fn subsampling_fraction(&self) -> f32 {
        return self
            .stages()
            .iter()
            .map(|stage| match stage {
                OptimizerConfig::SubsamplingStep { fraction, .. } => *fraction,
                _ => 1.0,
            })
            .product();
    }

    /// Optimization steps per update, over all multi-step stages.
    pub fn num_steps(&self) -> usize {
        return self
            .stages()
            .iter()
            .map(|stage| match stage {
                OptimizerConfig::MultiStep { num_steps, .. } => *num_steps,
                _ => 1,
            })
            .product();
    }

    pub(crate) fn check(&self) -> Result<(), (&'static str, f64, &'static str)> {
        for stage in self.stages() {
            match stage {
                OptimizerConfig::Adam { learning_rate } => {
                    if !(*learning_rate > 0.0) {
                        return Err(("learning_rate", *learning_rate as f64, "> 0.0"));
                    }
                }
                OptimizerConfig::SubsamplingStep { fraction, .. } => {
                    if !(*fraction > 0.0 && *fraction <= 1.0) {
                        return Err(("fraction", *fraction as f64, "in (0.0, 1.0]"));
                    }
                }
                OptimizerConfig::MultiStep { num_steps, .. } => {
                    if *num_steps == 0 {
                        return Err(("num_steps", 0.0, "> 0"));
                    }
                }
            }
        }
        return Ok(());
    }
}

impl Serialize for OptimizerConfig {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        return OptimizerConfig::serialize(self, serializer);
    }
}

impl<'de> Deserialize<'de> for OptimizerConfig {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Name(String),
            #[serde(deserialize_with = "OptimizerConfig::deserialize")]
            Spec(OptimizerConfig),
        }
        match Raw::deserialize(deserializer)? {
            Raw::Spec(optimizer) => Ok(optimizer),
            Raw::Name(name) if name == "adam" => Ok(OptimizerConfig::adam(DEFAULT_LEARNING_RATE)),
            Raw::Name(name) => Err(de::Error::custom(format!(
                "unknown optimizer {name:?}, expected \"adam\" or an optimizer spec"
            ))),
        }
    }
}

/// Optimizer of the baseline. A bare number keeps the main optimizer and
/// weights the baseline loss instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BaselineOptimizer {
    LossWeight(f32),
    Optimizer(OptimizerConfig),
}

impl BaselineOptimizer {
    pub fn optimizer(&self) -> Option<&OptimizerConfig> {
        match self {
            BaselineOptimizer::Optimizer(optimizer) => Some(optimizer),
            BaselineOptimizer::LossWeight(_) => None,
        }
    }
}

impl From<OptimizerConfig> for BaselineOptimizer {
    fn from(optimizer: OptimizerConfig) -> Self {
        return BaselineOptimizer::Optimizer(optimizer);
    }
}
