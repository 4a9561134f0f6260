use tracing::{debug, info, warn};

use super::config::PpoConfig;
use crate::rl_algorithm::base::{
    ConfigError, EngineError, MemoryConfig, ModelConfig, ObjectiveConfig, OptimizerConfig,
    PolicyConfig, RewardEstimationConfig, TrainingEngine, UpdateConfig, Horizon, HorizonEstimate,
};
use crate::utils::SeedContext;

/// Key identifying this agent type in a serialized agent spec.
pub const AGENT_KEY: &str = "ppo";

impl PpoConfig {
    /// Compiles the hyperparameters into the model config an engine is built from.
    pub fn to_model_config(&self) -> Result<ModelConfig, ConfigError> {
        let policy = PolicyConfig::new(self.network.clone()).with_temperature(1.0);
        let memory = MemoryConfig::recent(self.memory);
        let mut update = UpdateConfig::episodes(self.batch_size);
        if let Some(frequency) = self.update_frequency {
            update = update.with_frequency(frequency);
        }
        let optimizer = OptimizerConfig::adam(self.learning_rate)
            .subsampling_step(self.subsampling_fraction)
            .multi_step(self.optimization_steps);
        let objective = ObjectiveConfig::clipped_ratio(self.likelihood_ratio_clipping);

        let (reward_estimation, baseline_policy, baseline_objective) = match &self.critic_network {
            None => {
                if self.critic_optimizer.is_some() {
                    return Err(ConfigError::CriticOptimizerWithoutNetwork);
                }
                if self.estimate_terminal {
                    warn!("estimate_terminal has no effect without critic_network");
                }
                let reward_estimation =
                    RewardEstimationConfig::new(Horizon::Episode).with_discount(self.discount);
                (reward_estimation, None, None)
            }
            Some(critic_network) => {
                if self.critic_optimizer.is_none() {
                    return Err(ConfigError::CriticNetworkWithoutOptimizer);
                }
                let reward_estimation = RewardEstimationConfig::new(Horizon::Episode)
                    .with_discount(self.discount)
                    .with_estimate_horizon(HorizonEstimate::Early)
                    .with_estimate_terminal(self.estimate_terminal)
                    .with_estimate_advantage(true);
                (
                    reward_estimation,
                    Some(PolicyConfig::new(critic_network.clone())),
                    Some(ObjectiveConfig::state_value()),
                )
            }
        };
        debug!("optimizer={:?}", optimizer);
        debug!("reward_estimation={:?}", reward_estimation);

        return Ok(ModelConfig {
            max_episode_timesteps: Some(self.max_episode_timesteps),
            baseline_policy,
            baseline_optimizer: self.critic_optimizer.clone(),
            baseline_objective,
            parallel_interactions: self.parallel_interactions,
            buffer_observe: true,
            name: self.name.clone(),
            device: self.device.clone(),
            seed: self.seed,
            preprocessing: self.preprocessing.clone(),
            exploration: self.exploration.clone(),
            variable_noise: self.variable_noise,
            l2_regularization: self.l2_regularization,
            entropy_regularization: self.entropy_regularization,
            execution: self.execution.clone(),
            saver: self.saver.clone(),
            summarizer: self.summarizer.clone(),
            recorder: self.recorder.clone(),
            config: self.config.clone(),
            ..ModelConfig::new(
                self.states.clone(),
                self.actions.clone(),
                policy,
                memory,
                update,
                optimizer,
                objective,
                reward_estimation,
            )
        });
    }
}

/// [Proximal Policy Optimization](https://arxiv.org/abs/1707.06347) agent.
///
/// Keeps the hyperparameters it was created from and the engine built from them.
pub struct ProximalPolicyOptimization<E: TrainingEngine> {
    spec: PpoConfig,
    engine: E,
}

impl<E: TrainingEngine> ProximalPolicyOptimization<E> {
    pub fn new(spec: PpoConfig) -> Result<Self, EngineError> {
        let model_config = spec.to_model_config()?;
        let seeds = SeedContext::new(spec.seed);
        let engine = E::create(model_config, seeds)?;
        info!(
            "created {} agent {} (batch_size={}, critic={})",
            AGENT_KEY,
            spec.name,
            spec.batch_size,
            spec.critic_network.is_some()
        );
        return Ok(Self { spec, engine });
    }

    pub fn spec(&self) -> &PpoConfig {
        return &self.spec;
    }

    pub fn engine(&self) -> &E {
        return &self.engine;
    }

    pub fn engine_mut(&mut self) -> &mut E {
        return &mut self.engine;
    }

    pub fn into_engine(self) -> E {
        return self.engine;
    }

    /// The agent spec as JSON, led by the agent key.
    pub fn spec_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        let mut object = serde_json::Map::new();
        object.insert("agent".to_string(), AGENT_KEY.into());
        if let serde_json::Value::Object(fields) = serde_json::to_value(&self.spec)? {
            object.extend(fields);
        }
        return Ok(serde_json::Value::Object(object));
    }
}
