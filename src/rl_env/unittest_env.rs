use rand::rngs::StdRng;
use rand::Rng;
use rand_distr::{Distribution, Normal};
use tracing::trace;

use super::config::EnvConfig;
use super::env::{Environment, StepInfo, Terminal};
use super::errors::EnvError;
use super::spaces::{SpaceSpecs, SpaceValues, TensorSpec, TensorValue, ValueType};

/// Synthetic environment producing random states and rewards for the given
/// specs. Episodes last a random number of timesteps within the configured bounds.
pub struct UnittestEnvironment {
    states: SpaceSpecs,
    actions: SpaceSpecs,
    config: EnvConfig,
    rng: StdRng,
    reward_normal: Normal<f32>,
    timestep: usize,
    episode_length: Option<usize>,
}

impl UnittestEnvironment {
    pub fn new(
        states: SpaceSpecs,
        actions: SpaceSpecs,
        config: EnvConfig,
        rng: StdRng,
    ) -> Result<Self, EnvError> {
        if config.min_timesteps == 0 || config.min_timesteps > config.max_episode_timesteps {
            return Err(EnvError::EnvError(
                format!(
                    "episode bounds [{}, {}] are empty",
                    config.min_timesteps, config.max_episode_timesteps
                )
                .into(),
            ));
        }
        let reward_normal =
            Normal::new(0.0, config.reward_std).map_err(|err| EnvError::EnvError(Box::new(err)))?;
        return Ok(Self {
            states,
            actions,
            config,
            rng,
            reward_normal,
            timestep: 0,
            episode_length: None,
        });
    }

    /// The default spaces: one component of every value type, plus a bounded float.
    pub fn default_states() -> SpaceSpecs {
        return SpaceSpecs::from([
            ("bool_state".to_string(), TensorSpec::bool(&[1])),
            ("int_state".to_string(), TensorSpec::int(&[2], 4)),
            ("float_state".to_string(), TensorSpec::float(&[1, 1, 2])),
            (
                "bounded_state".to_string(),
                TensorSpec::bounded_float(&[1], -0.5, 0.5),
            ),
        ]);
    }

    pub fn default_actions() -> SpaceSpecs {
        return SpaceSpecs::from([
            ("bool_action".to_string(), TensorSpec::bool(&[1])),
            ("int_action".to_string(), TensorSpec::int(&[2], 3)),
            ("float_action".to_string(), TensorSpec::float(&[1, 1])),
            (
                "bounded_action".to_string(),
                TensorSpec::bounded_float(&[2], -0.5, 0.5),
            ),
        ]);
    }

    fn random_states(&mut self) -> SpaceValues {
        let mut states = SpaceValues::new();
        for (name, spec) in &self.states {
            states.insert(name.clone(), random_value(spec, &mut self.rng));
        }
        return states;
    }
}

/// Uniform random value within `spec`. Floats missing a bound are standard normal, clamped.
pub fn random_value<R: Rng>(spec: &TensorSpec, rng: &mut R) -> TensorValue {
    let size = spec.size();
    match spec.dtype {
        ValueType::Bool => TensorValue::Bool((0..size).map(|_| rng.random_bool(0.5)).collect()),
        ValueType::Int => {
            let num_values = spec.num_values.unwrap_or(1).max(1) as i64;
            TensorValue::Int((0..size).map(|_| rng.random_range(0..num_values)).collect())
        }
        ValueType::Float => match (spec.min_value, spec.max_value) {
            (Some(min), Some(max)) => {
                TensorValue::Float((0..size).map(|_| rng.random_range(min..=max)).collect())
            }
            (min, max) => {
                let min = min.unwrap_or(f32::NEG_INFINITY);
                let max = max.unwrap_or(f32::INFINITY);
                TensorValue::Float(
                    (0..size)
                        .map(|_| {
                            let value: f32 = rand_distr::StandardNormal.sample(rng);
                            value.clamp(min, max)
                        })
                        .collect(),
                )
            }
        },
    }
}

impl Environment for UnittestEnvironment {
    fn states(&self) -> &SpaceSpecs {
        return &self.states;
    }

    fn actions(&self) -> &SpaceSpecs {
        return &self.actions;
    }

    fn max_episode_timesteps(&self) -> Option<usize> {
        return Some(self.config.max_episode_timesteps);
    }

    fn reset(&mut self) -> Result<SpaceValues, EnvError> {
        self.timestep = 0;
        let length = self
            .rng
            .random_range(self.config.min_timesteps..=self.config.max_episode_timesteps);
        self.episode_length = Some(length);
        trace!("reset, episode_length={}", length);
        return Ok(self.random_states());
    }

    fn execute(&mut self, actions: &SpaceValues) -> Result<StepInfo, EnvError> {
        let episode_length = self.episode_length.ok_or(EnvError::NotReset)?;
        for (name, spec) in &self.actions {
            let value = actions
                .get(name)
                .ok_or_else(|| EnvError::InvalidAction(format!("{name}: missing")))?;
            spec.check_value(name, value).map_err(EnvError::InvalidAction)?;
        }
        if let Some(name) = actions.keys().find(|name| !self.actions.contains_key(*name)) {
            return Err(EnvError::InvalidAction(format!("{name}: unknown action")));
        }

        self.timestep += 1;
        let terminal = if self.timestep < episode_length {
            Terminal::Continue
        } else if self.timestep < self.config.max_episode_timesteps {
            Terminal::Terminated
        } else {
            Terminal::Truncated
        };
        if terminal.is_episode_end() {
            self.episode_length = None;
        }
        let reward = self.reward_normal.sample(&mut self.rng);
        return Ok(StepInfo {
            states: self.random_states(),
            reward,
            terminal,
        });
    }
}
