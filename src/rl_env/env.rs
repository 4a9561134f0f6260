use super::errors::EnvError;
use super::spaces::{SpaceSpecs, SpaceValues};

#[derive(Debug, Clone, PartialEq)]
pub struct StepInfo {
    pub states: SpaceValues,
    pub reward: f32,
    pub terminal: Terminal,
}

/// How an episode ended, if it did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminal {
    Continue,
    /// Real terminal state.
    Terminated,
    /// Cut off by the timestep bound.
    Truncated,
}

impl Terminal {
    pub fn is_episode_end(&self) -> bool {
        return *self != Terminal::Continue;
    }
}

pub trait Environment {
    fn states(&self) -> &SpaceSpecs;
    fn actions(&self) -> &SpaceSpecs;
    fn max_episode_timesteps(&self) -> Option<usize>;

    fn reset(&mut self) -> Result<SpaceValues, EnvError>;
    fn execute(&mut self, actions: &SpaceValues) -> Result<StepInfo, EnvError>;
}
