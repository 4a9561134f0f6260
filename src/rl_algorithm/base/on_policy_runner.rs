use rand::rngs::StdRng;
use std::collections::VecDeque;
use tracing::{debug, info, trace};

use super::config::ModelConfig;
use super::error::{ConfigError, EngineError};
use super::memory::minimum_capacity;
use super::model::{TrainingEngine, UpdateReport};
use super::objective::ObjectiveConfig;
use super::optimizer::BaselineOptimizer;
use super::policy::{FloatDistribution, PolicyConfig};
use super::update::{UpdateFrequency, UpdateUnit};
use crate::rl_env::unittest_env::random_value;
use crate::rl_env::{Environment, SpaceValues, Terminal};
use crate::utils::{RngStream, SeedContext};

/// Settings derived while checking a model config.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedModel {
    /// Memory capacity in timesteps, `None` when unbounded.
    pub memory_capacity: Option<usize>,
    /// Reward horizon in timesteps after clamping to the episode bound.
    pub horizon: Option<usize>,
}

fn out_of_range(name: &'static str, value: f64, expected: &'static str) -> ConfigError {
    return ConfigError::OutOfRange {
        name,
        value,
        expected,
    };
}

fn check_non_negative(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if !(value >= 0.0) {
        return Err(out_of_range(name, value as f64, ">= 0.0"));
    }
    return Ok(());
}

fn check_policy(policy: &PolicyConfig) -> Result<(), ConfigError> {
    policy.network.check().map_err(|reason| ConfigError::InvalidSpec {
        kind: "network",
        reason,
    })?;
    check_non_negative("temperature", policy.temperature)?;
    return Ok(());
}

fn check_objective(objective: &ObjectiveConfig) -> Result<(), ConfigError> {
    if let ObjectiveConfig::PolicyGradient {
        clipping_value: Some(clipping_value),
        ..
    } = objective
    {
        if !(*clipping_value > 0.0) {
            return Err(out_of_range("clipping_value", *clipping_value as f64, "> 0.0"));
        }
    }
    return Ok(());
}

/// Checks a model config the way a training engine does on construction.
pub fn check_model_config(config: &ModelConfig) -> Result<ResolvedModel, ConfigError> {
    for (kind, specs) in [("state", &config.states), ("action", &config.actions)] {
        if specs.is_empty() {
            return Err(ConfigError::InvalidSpec {
                kind,
                reason: "no components".to_string(),
            });
        }
        for (name, spec) in specs {
            spec.check(name)
                .map_err(|reason| ConfigError::InvalidSpec { kind, reason })?;
        }
    }

    check_policy(&config.policy)?;
    if let Some(baseline_policy) = &config.baseline_policy {
        check_policy(baseline_policy)?;
    }

    let update = &config.update;
    if update.batch_size == 0 {
        return Err(out_of_range("batch_size", 0.0, "> 0"));
    }
    if update.frequency == Some(UpdateFrequency::Every(0)) {
        return Err(out_of_range("update_frequency", 0.0, "> 0"));
    }

    let optimizers = std::iter::once(&config.optimizer).chain(config.dedicated_baseline_optimizer());
    for optimizer in optimizers {
        optimizer
            .check()
            .map_err(|(name, value, expected)| out_of_range(name, value, expected))?;
    }
    if let Some(BaselineOptimizer::LossWeight(weight)) = &config.baseline_optimizer {
        check_non_negative("baseline loss weight", *weight)?;
    }

    check_objective(&config.objective)?;
    if let Some(baseline_objective) = &config.baseline_objective {
        check_objective(baseline_objective)?;
    }

    let discount = config.reward_estimation.discount;
    if !(0.0..=1.0).contains(&discount) {
        return Err(out_of_range("discount", discount as f64, "in [0.0, 1.0]"));
    }
    check_non_negative("variable_noise", config.variable_noise)?;
    check_non_negative("l2_regularization", config.l2_regularization)?;
    check_non_negative("entropy_regularization", config.entropy_regularization)?;
    for name in config.actions.keys() {
        check_non_negative("exploration", config.exploration.for_action(name))?;
    }
    if config.parallel_interactions == 0 {
        return Err(out_of_range("parallel_interactions", 0.0, "> 0"));
    }
    if config.max_episode_timesteps == Some(0) {
        return Err(out_of_range("max_episode_timesteps", 0.0, "> 0"));
    }

    let required_capacity = match config.max_episode_timesteps {
        Some(max_timesteps) => {
            let required = match update.unit {
                UpdateUnit::Episodes => minimum_capacity(update.batch_size, max_timesteps),
                UpdateUnit::Timesteps => update.batch_size.checked_add(max_timesteps),
            };
            let required = required.ok_or(ConfigError::CapacityOverflow {
                batch_size: update.batch_size,
                max_episode_timesteps: max_timesteps,
            })?;
            Some(required)
        }
        None => None,
    };
    let memory_capacity = match (config.memory.capacity(), required_capacity) {
        (Some(capacity), Some(required)) if capacity < required => {
            return Err(ConfigError::MemoryTooSmall { capacity, required });
        }
        (Some(capacity), _) => Some(capacity),
        (None, Some(required)) => Some(required),
        (None, None) => {
            return Err(ConfigError::MissingMaxEpisodeTimesteps(
                "memory has no capacity",
            ));
        }
    };

    let reward_estimation = &config.reward_estimation;
    if reward_estimation.estimate_actions {
        if config.dedicated_baseline_optimizer().is_none() {
            return Err(ConfigError::ActionValueWithoutOptimizer);
        }
        let value_policy = config.value_policy();
        for (name, action) in &config.actions {
            if action.is_bounded_float()
                && value_policy.distributions.float_distribution(action) == FloatDistribution::Beta
            {
                return Err(ConfigError::ActionValueForBetaAction(name.clone()));
            }
        }
    }

    let horizon = config.max_episode_timesteps.map(|max_timesteps| {
        let horizon = reward_estimation.horizon.clamp_to(max_timesteps);
        debug!(
            "horizon {:?} resolved to {} timesteps",
            reward_estimation.horizon, horizon
        );
        horizon
    });

    return Ok(ResolvedModel {
        memory_capacity,
        horizon,
    });
}

/// Reference engine: checks the configuration, acts randomly within the
/// action specs and schedules updates, without training anything.
pub struct DryRunEngine {
    config: ModelConfig,
    resolved: ResolvedModel,
    rng: StdRng,
    awaiting_observe: bool,
    timesteps: usize,
    episodes: usize,
    updates: usize,
    episode_timesteps: usize,
    /// Lengths of the episodes since the last update.
    batch_episodes: VecDeque<usize>,
    timesteps_since_update: usize,
}

impl DryRunEngine {
    pub fn resolved(&self) -> &ResolvedModel {
        return &self.resolved;
    }

    pub fn timesteps(&self) -> usize {
        return self.timesteps;
    }

    pub fn episodes(&self) -> usize {
        return self.episodes;
    }

    pub fn updates(&self) -> usize {
        return self.updates;
    }

    fn buffered_timesteps(&self) -> usize {
        let timesteps = match self.config.update.unit {
            UpdateUnit::Episodes => self.batch_episodes.iter().sum(),
            UpdateUnit::Timesteps => self.timesteps_since_update,
        };
        return match self.resolved.memory_capacity {
            Some(capacity) => timesteps.min(capacity),
            None => timesteps,
        };
    }

    fn update_due(&self, episode_end: bool) -> bool {
        let update = &self.config.update;
        let Some(frequency) = update.effective_frequency() else {
            return false;
        };
        match update.unit {
            UpdateUnit::Episodes => {
                episode_end
                    && self.episodes >= update.batch_size
                    && self.batch_episodes.len() >= frequency
            }
            UpdateUnit::Timesteps => {
                self.timesteps >= update.batch_size && self.timesteps_since_update >= frequency
            }
        }
    }

    fn run_update(&mut self) -> UpdateReport {
        let timesteps = self.buffered_timesteps();
        let optimizer = &self.config.optimizer;
        let subsampled_timesteps =
            ((timesteps as f32 * optimizer.subsampling_fraction()).ceil() as usize).max(1);
        self.updates += 1;
        self.batch_episodes.clear();
        self.timesteps_since_update = 0;
        let report = UpdateReport {
            update: self.updates,
            timesteps,
            subsampled_timesteps,
            optimization_steps: optimizer.num_steps(),
        };
        info!(
            "update={} timesteps={} subsampled={} steps={}",
            report.update, report.timesteps, report.subsampled_timesteps, report.optimization_steps
        );
        return report;
    }
}

impl TrainingEngine for DryRunEngine {
    fn create(config: ModelConfig, seeds: SeedContext) -> Result<Self, EngineError> {
        let resolved = check_model_config(&config)?;
        debug!("{} resolved {:?}", config.name, resolved);
        return Ok(Self {
            config,
            resolved,
            rng: seeds.rng(RngStream::Engine),
            awaiting_observe: false,
            timesteps: 0,
            episodes: 0,
            updates: 0,
            episode_timesteps: 0,
            batch_episodes: VecDeque::new(),
            timesteps_since_update: 0,
        });
    }

    fn config(&self) -> &ModelConfig {
        return &self.config;
    }

    fn act(&mut self, states: &SpaceValues) -> Result<SpaceValues, EngineError> {
        if self.awaiting_observe {
            return Err(EngineError::EngineError(
                "act called twice without observe".into(),
            ));
        }
        for (name, spec) in &self.config.states {
            let value = states
                .get(name)
                .ok_or_else(|| EngineError::EngineError(format!("state {name} is missing").into()))?;
            spec.check_value(name, value)
                .map_err(|reason| EngineError::EngineError(reason.into()))?;
        }
        let mut actions = SpaceValues::new();
        for (name, spec) in &self.config.actions {
            actions.insert(name.clone(), random_value(spec, &mut self.rng));
        }
        self.awaiting_observe = true;
        return Ok(actions);
    }

    fn observe(
        &mut self,
        reward: f32,
        terminal: Terminal,
    ) -> Result<Option<UpdateReport>, EngineError> {
        if !self.awaiting_observe {
            return Err(EngineError::EngineError("observe called before act".into()));
        }
        self.awaiting_observe = false;
        self.timesteps += 1;
        self.timesteps_since_update += 1;
        self.episode_timesteps += 1;
        trace!("timestep={} reward={} terminal={:?}", self.timesteps, reward, terminal);

        if let Some(max_timesteps) = self.config.max_episode_timesteps {
            if self.episode_timesteps > max_timesteps {
                return Err(EngineError::EngineError(
                    format!("episode exceeded max_episode_timesteps={max_timesteps}").into(),
                ));
            }
        }

        let episode_end = terminal.is_episode_end();
        if episode_end {
            self.episodes += 1;
            self.batch_episodes.push_back(self.episode_timesteps);
            self.episode_timesteps = 0;
        }
        if self.update_due(episode_end) {
            return Ok(Some(self.run_update()));
        }
        return Ok(None);
    }
}

/// Outcome of `run_episodes`.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub episodes: usize,
    pub timesteps: usize,
    pub updates: Vec<UpdateReport>,
    pub episode_rewards: Vec<f32>,
}

/// Runs `num_episodes` full act/observe episodes of `engine` on `env`.
pub fn run_episodes<E: TrainingEngine, V: Environment>(
    engine: &mut E,
    env: &mut V,
    num_episodes: usize,
) -> Result<RunSummary, EngineError> {
    let mut summary = RunSummary {
        episodes: 0,
        timesteps: 0,
        updates: Vec::new(),
        episode_rewards: Vec::with_capacity(num_episodes),
    };
    for _ in 0..num_episodes {
        let mut states = env.reset()?;
        let mut episode_reward = 0.0;
        loop {
            let actions = engine.act(&states)?;
            let step = env.execute(&actions)?;
            summary.timesteps += 1;
            episode_reward += step.reward;
            if let Some(report) = engine.observe(step.reward, step.terminal)? {
                summary.updates.push(report);
            }
            if step.terminal.is_episode_end() {
                break;
            }
            states = step.states;
        }
        summary.episodes += 1;
        summary.episode_rewards.push(episode_reward);
    }
    return Ok(summary);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rl_algorithm::base::memory::MemoryConfig;
    use crate::rl_algorithm::base::optimizer::OptimizerConfig;
    use crate::rl_algorithm::base::policy::{DistributionsConfig, NetworkSpec};
    use crate::rl_algorithm::base::reward_estimation::{
        Horizon, HorizonEstimate, RewardEstimationConfig,
    };
    use crate::rl_algorithm::base::update::UpdateConfig;
    use crate::rl_env::config::EnvConfig;
    use crate::rl_env::unittest_env::UnittestEnvironment;
    use crate::rl_env::{SpaceSpecs, TensorSpec};

    fn model_config() -> ModelConfig {
        let mut config = ModelConfig::new(
            UnittestEnvironment::default_states(),
            UnittestEnvironment::default_actions(),
            PolicyConfig::new(NetworkSpec::auto(8, 1)),
            MemoryConfig::default(),
            UpdateConfig::episodes(2),
            OptimizerConfig::adam(1e-3).subsampling_step(0.5).multi_step(3),
            ObjectiveConfig::policy_gradient(),
            RewardEstimationConfig::default(),
        );
        config.max_episode_timesteps = Some(5);
        config
    }

    fn env(seed: u64) -> UnittestEnvironment {
        UnittestEnvironment::new(
            UnittestEnvironment::default_states(),
            UnittestEnvironment::default_actions(),
            EnvConfig::new(),
            SeedContext::new(Some(seed)).rng(RngStream::Environment),
        )
        .unwrap()
    }

    #[test]
    fn test_minimum_memory() {
        let resolved = check_model_config(&model_config()).unwrap();
        assert_eq!(resolved.memory_capacity, Some(15));
        assert_eq!(resolved.horizon, Some(5));
    }

    #[test]
    fn test_memory_too_small() {
        let config = ModelConfig {
            memory: MemoryConfig::recent(Some(10)),
            ..model_config()
        };
        assert_eq!(
            check_model_config(&config),
            Err(ConfigError::MemoryTooSmall {
                capacity: 10,
                required: 15
            })
        );
    }

    #[test]
    fn test_unbounded_memory_needs_episode_bound() {
        let config = ModelConfig {
            max_episode_timesteps: None,
            ..model_config()
        };
        assert!(matches!(
            check_model_config(&config),
            Err(ConfigError::MissingMaxEpisodeTimesteps(_))
        ));
    }

    #[test]
    fn test_capacity_overflow() {
        let config = ModelConfig {
            max_episode_timesteps: Some(10_000_000_000),
            update: UpdateConfig::episodes(10_000_000_000),
            memory: MemoryConfig::recent(Some(100)),
            ..model_config()
        };
        assert_eq!(
            check_model_config(&config),
            Err(ConfigError::CapacityOverflow {
                batch_size: 10_000_000_000,
                max_episode_timesteps: 10_000_000_000
            })
        );

        let config = ModelConfig {
            max_episode_timesteps: Some(usize::MAX),
            update: UpdateConfig {
                unit: UpdateUnit::Timesteps,
                batch_size: 2,
                frequency: None,
            },
            ..model_config()
        };
        assert!(matches!(
            check_model_config(&config),
            Err(ConfigError::CapacityOverflow { batch_size: 2, .. })
        ));
    }

    #[test]
    fn test_horizon_clamped() {
        let config = ModelConfig {
            reward_estimation: RewardEstimationConfig::new(Horizon::Steps(10)),
            ..model_config()
        };
        assert_eq!(check_model_config(&config).unwrap().horizon, Some(5));
    }

    #[test]
    fn test_out_of_range() {
        let config = ModelConfig {
            reward_estimation: RewardEstimationConfig::default().with_discount(1.5),
            ..model_config()
        };
        assert!(matches!(
            check_model_config(&config),
            Err(ConfigError::OutOfRange { name: "discount", .. })
        ));

        let config = ModelConfig {
            objective: ObjectiveConfig::clipped_ratio(0.0),
            ..model_config()
        };
        assert!(matches!(
            check_model_config(&config),
            Err(ConfigError::OutOfRange { name: "clipping_value", .. })
        ));
    }

    #[test]
    fn test_invalid_action_spec() {
        let config = ModelConfig {
            actions: SpaceSpecs::from([("a".to_string(), TensorSpec::float(&[0]))]),
            ..model_config()
        };
        assert!(matches!(
            check_model_config(&config),
            Err(ConfigError::InvalidSpec { kind: "action", .. })
        ));

        let config = ModelConfig {
            actions: SpaceSpecs::from([(
                "wide".to_string(),
                TensorSpec::bounded_float(&[1], -3e38, 3e38),
            )]),
            ..model_config()
        };
        assert!(matches!(
            check_model_config(&config),
            Err(ConfigError::InvalidSpec { kind: "action", .. })
        ));
    }

    #[test]
    fn test_action_value_requires_optimizer() {
        let reward_estimation = RewardEstimationConfig::new(Horizon::Steps(2))
            .with_estimate_horizon(HorizonEstimate::Early)
            .with_estimate_actions(true);
        let config = ModelConfig {
            reward_estimation,
            baseline_policy: Some(
                PolicyConfig::new(NetworkSpec::auto(7, 1))
                    .with_distributions(DistributionsConfig::float(FloatDistribution::Gaussian)),
            ),
            ..model_config()
        };
        assert_eq!(
            check_model_config(&config),
            Err(ConfigError::ActionValueWithoutOptimizer)
        );

        let weighted = ModelConfig {
            baseline_optimizer: Some(BaselineOptimizer::LossWeight(1.0)),
            ..config.clone()
        };
        assert_eq!(
            check_model_config(&weighted),
            Err(ConfigError::ActionValueWithoutOptimizer)
        );

        let dedicated = ModelConfig {
            baseline_optimizer: Some(OptimizerConfig::adam(1e-3).into()),
            ..config
        };
        assert!(check_model_config(&dedicated).is_ok());
    }

    #[test]
    fn test_action_value_rejects_beta() {
        let config = ModelConfig {
            reward_estimation: RewardEstimationConfig::new(Horizon::Steps(2))
                .with_estimate_horizon(HorizonEstimate::Late)
                .with_estimate_actions(true),
            baseline_optimizer: Some(OptimizerConfig::adam(1e-3).into()),
            ..model_config()
        };
        assert_eq!(
            check_model_config(&config),
            Err(ConfigError::ActionValueForBetaAction(
                "bounded_action".to_string()
            ))
        );
    }

    #[test]
    fn test_updates_every_batch() {
        let mut engine = DryRunEngine::create(model_config(), SeedContext::new(Some(0))).unwrap();
        let mut env = env(0);
        let summary = run_episodes(&mut engine, &mut env, 6).unwrap();
        assert_eq!(summary.episodes, 6);
        assert_eq!(summary.updates.len(), 3);
        assert_eq!(engine.updates(), 3);
        assert_eq!(engine.timesteps(), summary.timesteps);
        for report in &summary.updates {
            assert_eq!(report.optimization_steps, 3);
            assert!(report.timesteps >= 2 && report.timesteps <= 10);
            assert_eq!(
                report.subsampled_timesteps,
                (report.timesteps as f32 * 0.5).ceil() as usize
            );
        }
    }

    #[test]
    fn test_never_update() {
        let mut config = model_config();
        config.update = UpdateConfig::episodes(1).with_frequency(UpdateFrequency::Never);
        let mut engine = DryRunEngine::create(config, SeedContext::new(Some(0))).unwrap();
        let summary = run_episodes(&mut engine, &mut env(1), 3).unwrap();
        assert!(summary.updates.is_empty());
    }

    #[test]
    fn test_act_observe_order() {
        let mut engine = DryRunEngine::create(model_config(), SeedContext::new(Some(0))).unwrap();
        assert!(engine.observe(0.0, Terminal::Continue).is_err());
        let states = env(2).reset().unwrap();
        engine.act(&states).unwrap();
        assert!(engine.act(&states).is_err());
    }

    #[test]
    fn test_seeded_actions_repeat() {
        let states = env(3).reset().unwrap();
        let mut a = DryRunEngine::create(model_config(), SeedContext::new(Some(9))).unwrap();
        let mut b = DryRunEngine::create(model_config(), SeedContext::new(Some(9))).unwrap();
        assert_eq!(a.act(&states).unwrap(), b.act(&states).unwrap());
    }
}
