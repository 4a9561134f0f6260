#![allow(dead_code)]

use rl_agent_config::rl_algorithm::base::{
    run_episodes, BaselineOptimizer, DryRunEngine, EngineError, MemoryConfig, ModelConfig,
    NetworkSpec, ObjectiveConfig, OptimizerConfig, PolicyConfig, RewardEstimationConfig,
    RunSummary, TrainingEngine, UpdateConfig,
};
use rl_agent_config::rl_env::config::EnvConfig;
use rl_agent_config::rl_env::unittest_env::UnittestEnvironment;
use rl_agent_config::utils::{RngStream, SeedContext};
use tracing::info;

/// Per-scenario changes to the base agent.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub reward_estimation: Option<RewardEstimationConfig>,
    pub baseline_policy: Option<PolicyConfig>,
    pub baseline_objective: Option<ObjectiveConfig>,
    pub baseline_optimizer: Option<BaselineOptimizer>,
    /// Drop the Beta-distributed bounded action from the action space.
    pub exclude_bounded_action: bool,
}

/// A group of scenarios sharing one base agent, each run through a short
/// act/observe cycle on the unittest environment.
pub struct UnittestBase {
    pub policy: PolicyConfig,
    pub update: UpdateConfig,
    pub objective: ObjectiveConfig,
    pub optimizer: OptimizerConfig,
    pub require_observe: bool,
    pub num_episodes: usize,
    pub max_episode_timesteps: usize,
    name: Option<String>,
    num_tests: usize,
}

impl UnittestBase {
    pub fn new(policy: PolicyConfig, update: UpdateConfig, objective: ObjectiveConfig) -> Self {
        Self {
            policy,
            update,
            objective,
            optimizer: adam(),
            require_observe: false,
            num_episodes: 3,
            max_episode_timesteps: 5,
            name: None,
            num_tests: 0,
        }
    }

    pub fn start_tests(&mut self, name: &str) {
        self.name = Some(name.to_string());
        self.num_tests = 0;
        info!("{name}:");
    }

    pub fn model_config(&self, overrides: &Overrides) -> ModelConfig {
        let mut actions = UnittestEnvironment::default_actions();
        if overrides.exclude_bounded_action {
            actions.remove("bounded_action");
        }
        let reward_estimation = overrides.reward_estimation.clone().unwrap_or_default();
        ModelConfig {
            max_episode_timesteps: Some(self.max_episode_timesteps),
            baseline_policy: overrides.baseline_policy.clone(),
            baseline_objective: overrides.baseline_objective.clone(),
            baseline_optimizer: overrides.baseline_optimizer.clone(),
            seed: Some(self.num_tests as u64),
            ..ModelConfig::new(
                UnittestEnvironment::default_states(),
                actions,
                self.policy.clone(),
                MemoryConfig::default(),
                self.update.clone(),
                self.optimizer.clone(),
                self.objective.clone(),
                reward_estimation,
            )
        }
    }

    pub fn unittest(&mut self, overrides: Overrides) -> Result<RunSummary, EngineError> {
        self.num_tests += 1;
        let config = self.model_config(&overrides);
        let seeds = SeedContext::new(config.seed);
        let env_config = EnvConfig::new().with_max_episode_timesteps(self.max_episode_timesteps);
        let mut env = UnittestEnvironment::new(
            config.states.clone(),
            config.actions.clone(),
            env_config,
            seeds.rng(RngStream::Environment),
        )?;
        let mut engine = DryRunEngine::create(config, seeds)?;

        let num_episodes = if self.require_observe { self.num_episodes } else { 1 };
        let result = run_episodes(&mut engine, &mut env, num_episodes);
        info!(
            "{} #{}: {}",
            self.name.as_deref().unwrap_or("unnamed"),
            self.num_tests,
            if result.is_ok() { "ok" } else { "failed" }
        );
        result
    }
}

pub fn adam() -> OptimizerConfig {
    OptimizerConfig::adam(1e-3)
}

pub fn auto_network(size: usize, internal_rnn: Option<usize>) -> NetworkSpec {
    let network = NetworkSpec::auto(size, 1);
    match internal_rnn {
        Some(horizon) => network.with_internal_rnn(horizon),
        None => network,
    }
}
