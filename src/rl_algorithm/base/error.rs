use thiserror::Error;

use crate::rl_env::EnvError;

/// Violations of the configuration contract, found either while compiling an
/// agent spec or while an engine checks the compiled model config.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("critic_optimizer is given but critic_network is not")]
    CriticOptimizerWithoutNetwork,
    #[error("critic_network is given but critic_optimizer is not")]
    CriticNetworkWithoutOptimizer,
    #[error("{name} = {value} is out of range, expected {expected}")]
    OutOfRange {
        name: &'static str,
        value: f64,
        expected: &'static str,
    },
    #[error("invalid {kind} spec: {reason}")]
    InvalidSpec { kind: &'static str, reason: String },
    #[error("memory capacity {capacity} is below the required {required} timesteps")]
    MemoryTooSmall { capacity: usize, required: usize },
    #[error(
        "required memory for batch_size={batch_size} and max_episode_timesteps={max_episode_timesteps} overflows"
    )]
    CapacityOverflow {
        batch_size: usize,
        max_episode_timesteps: usize,
    },
    #[error("max_episode_timesteps is required when {0}")]
    MissingMaxEpisodeTimesteps(&'static str),
    #[error("estimate_actions requires a dedicated baseline_optimizer")]
    ActionValueWithoutOptimizer,
    #[error("estimate_actions is not supported for bounded action {0} with a beta distribution")]
    ActionValueForBetaAction(String),
}

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("environment error: {0}")]
    Env(#[from] EnvError),
    #[error("engine error: {0}")]
    EngineError(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl EngineError {
    /// The configuration violation behind this error, if any.
    pub fn config_error(&self) -> Option<&ConfigError> {
        match self {
            EngineError::Config(err) => Some(err),
            _ => None,
        }
    }
}
