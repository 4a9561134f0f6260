use burn::config::Config;

use crate::rl_algorithm::base::artifacts::{RecorderConfig, SaverConfig, SummarizerConfig};
use crate::rl_algorithm::base::preprocessing::PreprocessingConfig;
use crate::rl_algorithm::base::{BaselineOptimizer, Exploration, NetworkSpec, UpdateFrequency};
use crate::rl_env::SpaceSpecs;

/// Hyperparameters of a PPO agent, exactly as the user gave them.
#[derive(Config, Debug, PartialEq)]
pub struct PpoConfig {
    pub states: SpaceSpecs,
    pub actions: SpaceSpecs,
    /// Upper bound for the number of timesteps per episode.
    pub max_episode_timesteps: usize,
    /// Number of episodes per update batch.
    pub batch_size: usize,

    #[config(default = "NetworkSpec::default()")]
    pub network: NetworkSpec,

    /// Memory capacity in timesteps, the engine's minimum when absent.
    pub memory: Option<usize>,

    /// Defaults to `batch_size`.
    pub update_frequency: Option<UpdateFrequency>,
    #[config(default = 3e-4)]
    pub learning_rate: f32,
    /// Fraction of batch timesteps used per optimization step.
    #[config(default = 0.33)]
    pub subsampling_fraction: f32,
    #[config(default = 10)]
    pub optimization_steps: usize,

    #[config(default = 0.2)]
    pub likelihood_ratio_clipping: f32,
    #[config(default = 0.99)]
    pub discount: f32,
    /// Only has an effect together with `critic_network`.
    #[config(default = false)]
    pub estimate_terminal: bool,

    /// The main policy doubles as critic when absent.
    pub critic_network: Option<NetworkSpec>,
    /// Required exactly when `critic_network` is given.
    pub critic_optimizer: Option<BaselineOptimizer>,

    pub preprocessing: Option<PreprocessingConfig>,

    #[config(default = "Exploration::Global(0.0)")]
    pub exploration: Exploration,
    #[config(default = 0.0)]
    pub variable_noise: f32,

    #[config(default = 0.0)]
    pub l2_regularization: f32,
    #[config(default = 0.0)]
    pub entropy_regularization: f32,

    #[config(default = "String::from(\"agent\")")]
    pub name: String,
    pub device: Option<String>,
    #[config(default = 1)]
    pub parallel_interactions: usize,
    pub seed: Option<u64>,
    pub execution: Option<serde_json::Value>,
    pub saver: Option<SaverConfig>,
    pub summarizer: Option<SummarizerConfig>,
    pub recorder: Option<RecorderConfig>,
    pub config: Option<serde_json::Value>,
}
