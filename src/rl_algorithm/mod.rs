pub mod base;
pub mod ppo;
