pub mod config;
pub mod ppo_agent;

pub use config::PpoConfig;
pub use ppo_agent::{ProximalPolicyOptimization, AGENT_KEY};
