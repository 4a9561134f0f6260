pub mod artifacts;
pub mod config;
pub mod error;
pub mod memory;
pub mod model;
pub mod objective;
pub mod on_policy_runner;
pub mod optimizer;
pub mod policy;
pub mod preprocessing;
pub mod reward_estimation;
pub mod update;

pub use config::{Exploration, ModelConfig};
pub use error::{ConfigError, EngineError};
pub use memory::MemoryConfig;
pub use model::{TrainingEngine, UpdateReport};
pub use objective::{ObjectiveConfig, ValueTarget};
pub use on_policy_runner::{check_model_config, run_episodes, DryRunEngine, RunSummary};
pub use optimizer::{BaselineOptimizer, OptimizerConfig};
pub use policy::{DistributionsConfig, FloatDistribution, NetworkSpec, PolicyConfig};
pub use reward_estimation::{Horizon, HorizonEstimate, RewardEstimationConfig};
pub use update::{UpdateConfig, UpdateFrequency, UpdateUnit};
