pub mod rl_algorithm;
pub mod rl_env;
pub mod utils;

pub use rl_algorithm::base::{ConfigError, DryRunEngine, EngineError, ModelConfig, TrainingEngine};
pub use rl_algorithm::ppo::{PpoConfig, ProximalPolicyOptimization};
