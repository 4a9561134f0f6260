use serde::{Deserialize, Serialize};

/// Experience memory the engine keeps between updates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MemoryConfig {
    /// Keeps the most recent timesteps. Without a capacity the engine sizes
    /// it to the minimum that fits an update batch.
    Recent {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        capacity: Option<usize>,
    },
}

impl MemoryConfig {
    pub fn recent(capacity: Option<usize>) -> Self {
        return MemoryConfig::Recent { capacity };
    }

    pub fn capacity(&self) -> Option<usize> {
        match self {
            MemoryConfig::Recent { capacity } => *capacity,
        }
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        return MemoryConfig::recent(None);
    }
}

/// Timesteps needed to hold `batch_size + 1` episodes of at most
/// `max_episode_timesteps` each, `None` if that does not fit in `usize`.
pub fn minimum_capacity(batch_size: usize, max_episode_timesteps: usize) -> Option<usize> {
    return batch_size
        .checked_add(1)
        .and_then(|episodes| episodes.checked_mul(max_episode_timesteps));
}
