use super::config::ModelConfig;
use super::error::EngineError;
use crate::rl_env::{SpaceValues, Terminal};
use crate::utils::SeedContext;

/// Summary of one update performed by an engine.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateReport {
    pub update: usize,
    /// Timesteps in the update batch.
    pub timesteps: usize,
    /// Timesteps used per optimization step.
    pub subsampled_timesteps: usize,
    pub optimization_steps: usize,
}

/// The training engine an agent hands its compiled configuration to.
pub trait TrainingEngine: Sized {
    /// Builds the engine. Called exactly once per agent.
    fn create(config: ModelConfig, seeds: SeedContext) -> Result<Self, EngineError>;

    fn config(&self) -> &ModelConfig;

    fn act(&mut self, states: &SpaceValues) -> Result<SpaceValues, EngineError>;

    /// Records the outcome of the last action. Returns a report when this
    /// observation triggered an update.
    fn observe(
        &mut self,
        reward: f32,
        terminal: Terminal,
    ) -> Result<Option<UpdateReport>, EngineError>;
}
