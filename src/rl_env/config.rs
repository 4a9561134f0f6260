use burn::config::Config;

/// Episode length bounds of the synthetic unittest environment.
#[derive(Config, Debug)]
pub struct EnvConfig {
    #[config(default = 1)]
    pub min_timesteps: usize,
    #[config(default = 5)]
    pub max_episode_timesteps: usize,
    /// Standard deviation of the Gaussian reward.
    #[config(default = 1.0)]
    pub reward_std: f32,
}

impl Default for EnvConfig {
    fn default() -> Self {
        return Self::new();
    }
}
