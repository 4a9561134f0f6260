use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateUnit {
    Timesteps,
    Episodes,
}

/// How often to update, in `UpdateUnit`s. Serialized as `"never"` or a count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateFrequency {
    Never,
    Every(usize),
}

impl Serialize for UpdateFrequency {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            UpdateFrequency::Never => serializer.serialize_str("never"),
            UpdateFrequency::Every(n) => serializer.serialize_u64(*n as u64),
        }
    }
}

impl<'de> Deserialize<'de> for UpdateFrequency {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Count(usize),
            Name(String),
        }
        match Raw::deserialize(deserializer)? {
            Raw::Count(n) => Ok(UpdateFrequency::Every(n)),
            Raw::Name(name) if name == "never" => Ok(UpdateFrequency::Never),
            Raw::Name(name) => Err(de::Error::custom(format!(
                "unknown update frequency {name:?}, expected \"never\" or a count"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateConfig {
    pub unit: UpdateUnit,
    pub batch_size: usize,
    /// Defaults to `batch_size` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<UpdateFrequency>,
}

impl UpdateConfig {
    pub fn episodes(batch_size: usize) -> Self {
        return Self {
            unit: UpdateUnit::Episodes,
            batch_size,
            frequency: None,
        };
    }

    pub fn with_frequency(mut self, frequency: UpdateFrequency) -> Self {
        self.frequency = Some(frequency);
        self
    }

    /// Frequency in units, `None` when updates are disabled.
    pub fn effective_frequency(&self) -> Option<usize> {
        match self.frequency {
            None => Some(self.batch_size),
            Some(UpdateFrequency::Every(n)) => Some(n),
            Some(UpdateFrequency::Never) => None,
        }
    }
}
