use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

/// Number of future rewards summed into a return. Serialized as `"episode"`
/// or a step count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Horizon {
    /// Until the end of the episode.
    Episode,
    Steps(usize),
}

impl Serialize for Horizon {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Horizon::Episode => serializer.serialize_str("episode"),
            Horizon::Steps(n) => serializer.serialize_u64(*n as u64),
        }
    }
}

impl<'de> Deserialize<'de> for Horizon {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Steps(usize),
            Name(String),
        }
        match Raw::deserialize(deserializer)? {
            Raw::Steps(n) => Ok(Horizon::Steps(n)),
            Raw::Name(name) if name == "episode" => Ok(Horizon::Episode),
            Raw::Name(name) => Err(de::Error::custom(format!(
                "unknown horizon {name:?}, expected \"episode\" or a step count"
            ))),
        }
    }
}

impl Horizon {
    /// Horizon in timesteps for episodes bounded by `max_episode_timesteps`.
    /// Step horizons longer than an episode are clamped to it.
    pub fn clamp_to(&self, max_episode_timesteps: usize) -> usize {
        match self {
            Horizon::Episode => max_episode_timesteps,
            Horizon::Steps(steps) => (*steps).min(max_episode_timesteps),
        }
    }
}

/// When the value beyond the horizon is estimated by the baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HorizonEstimate {
    /// When the experience is stored, with the pre-update baseline.
    Early,
    /// At update time, with the current baseline.
    Late,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardEstimationConfig {
    pub horizon: Horizon,
    #[serde(default = "default_discount")]
    pub discount: f32,
    /// `None` sums rewards over the horizon only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimate_horizon: Option<HorizonEstimate>,
    /// Estimate action values instead of state values.
    #[serde(default)]
    pub estimate_actions: bool,
    /// Estimate the value of real terminal states.
    #[serde(default)]
    pub estimate_terminal: bool,
    /// Subtract the baseline estimate from the return.
    #[serde(default)]
    pub estimate_advantage: bool,
}

fn default_discount() -> f32 {
    1.0
}

impl RewardEstimationConfig {
    pub fn new(horizon: Horizon) -> Self {
        return Self {
            horizon,
            discount: default_discount(),
            estimate_horizon: None,
            estimate_actions: false,
            estimate_terminal: false,
            estimate_advantage: false,
        };
    }

    pub fn with_discount(mut self, discount: f32) -> Self {
        self.discount = discount;
        self
    }

    pub fn with_estimate_horizon(mut self, estimate: HorizonEstimate) -> Self {
        self.estimate_horizon = Some(estimate);
        self
    }

    pub fn with_estimate_actions(mut self, estimate_actions: bool) -> Self {
        self.estimate_actions = estimate_actions;
        self
    }

    pub fn with_estimate_terminal(mut self, estimate_terminal: bool) -> Self {
        self.estimate_terminal = estimate_terminal;
        self
    }

    pub fn with_estimate_advantage(mut self, estimate_advantage: bool) -> Self {
        self.estimate_advantage = estimate_advantage;
        self
    }

    /// Whether any estimate needs a value baseline.
    pub fn requires_baseline(&self) -> bool {
        return self.estimate_horizon.is_some()
            || self.estimate_actions
            || self.estimate_terminal
            || self.estimate_advantage;
    }
}

impl Default for RewardEstimationConfig {
    fn default() -> Self {
        return Self::new(Horizon::Episode);
    }
}
