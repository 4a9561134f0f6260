use burn::config::Config;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::artifacts::{RecorderConfig, SaverConfig, SummarizerConfig};
use super::memory::MemoryConfig;
use super::objective::ObjectiveConfig;
use super::optimizer::{BaselineOptimizer, OptimizerConfig};
use super::policy::PolicyConfig;
use super::preprocessing::PreprocessingConfig;
use super::reward_estimation::RewardEstimationConfig;
use super::update::UpdateConfig;
use crate::rl_env::SpaceSpecs;

/// Exploration noise, either for all actions or per action name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Exploration {
    Global(f32),
    PerAction(BTreeMap<String, f32>),
}

impl Exploration {
    pub fn for_action(&self, name: &str) -> f32 {
        match self {
            Exploration::Global(value) => *value,
            Exploration::PerAction(values) => values.get(name).copied().unwrap_or(0.0),
        }
    }
}

impl Default for Exploration {
    fn default() -> Self {
        return Exploration::Global(0.0);
    }
}

/// Everything a training engine is constructed from.
///
/// Without a baseline policy the main policy also provides the value
/// estimates, and without a baseline optimizer the main optimizer trains it.
#[derive(Config, Debug, PartialEq)]
pub struct ModelConfig {
    pub states: SpaceSpecs,
    pub actions: SpaceSpecs,
    pub policy: PolicyConfig,
    pub memory: MemoryConfig,
    pub update: UpdateConfig,
    pub optimizer: OptimizerConfig,
    pub objective: ObjectiveConfig,
    pub reward_estimation: RewardEstimationConfig,
    pub max_episode_timesteps: Option<usize>,
    pub baseline_policy: Option<PolicyConfig>,
    pub baseline_optimizer: Option<BaselineOptimizer>,
    pub baseline_objective: Option<ObjectiveConfig>,
    #[config(default = 1)]
    pub parallel_interactions: usize,
    #[config(default = true)]
    pub buffer_observe: bool,
    #[config(default = "String::from(\"agent\")")]
    pub name: String,
    pub device: Option<String>,
    pub seed: Option<u64>,
    pub preprocessing: Option<PreprocessingConfig>,
    #[config(default = "Exploration::Global(0.0)")]
    pub exploration: Exploration,
    #[config(default = 0.0)]
    pub variable_noise: f32,
    #[config(default = 0.0)]
    pub l2_regularization: f32,
    #[config(default = 0.0)]
    pub entropy_regularization: f32,
    pub execution: Option<serde_json::Value>,
    pub saver: Option<SaverConfig>,
    pub summarizer: Option<SummarizerConfig>,
    pub recorder: Option<RecorderConfig>,
    pub config: Option<serde_json::Value>,
}

impl ModelConfig {
    /// The policy providing value estimates.
    pub fn value_policy(&self) -> &PolicyConfig {
        return self.baseline_policy.as_ref().unwrap_or(&self.policy);
    }

    /// The optimizer training the value estimates, if it is a dedicated one.
    pub fn dedicated_baseline_optimizer(&self) -> Option<&OptimizerConfig> {
        return self
            .baseline_optimizer
            .as_ref()
            .and_then(|optimizer| optimizer.optimizer());
    }
}
