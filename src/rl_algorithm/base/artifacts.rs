//! Saver, summarizer and recorder settings. These are passed through to the
//! engine unchanged; only their defaults live here.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LoadCheckpoint {
    Enabled(bool),
    Filename(String),
}

/// Periodic checkpointing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaverConfig {
    pub directory: String,
    /// Defaults to the agent name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    /// Seconds between saves.
    #[serde(default = "default_saver_frequency")]
    pub frequency: u64,
    #[serde(default = "default_load")]
    pub load: LoadCheckpoint,
    #[serde(rename = "max-checkpoints", default = "default_max_entries")]
    pub max_checkpoints: usize,
}

fn default_saver_frequency() -> u64 {
    600
}

fn default_load() -> LoadCheckpoint {
    LoadCheckpoint::Enabled(true)
}

fn default_max_entries() -> usize {
    5
}

impl SaverConfig {
    pub fn new(directory: impl Into<String>) -> Self {
        return Self {
            directory: directory.into(),
            filename: None,
            frequency: default_saver_frequency(),
            load: default_load(),
            max_checkpoints: default_max_entries(),
        };
    }

    pub fn filename_or<'a>(&'a self, agent_name: &'a str) -> &'a str {
        return self.filename.as_deref().unwrap_or(agent_name);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SummaryLabels {
    /// `"all"` labels except histograms.
    All(String),
    Labels(Vec<String>),
}

/// Timesteps between summaries, for all labels or per label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SummaryFrequency {
    Every(u64),
    PerLabel(BTreeMap<String, u64>),
}

impl SummaryFrequency {
    /// Frequency of `label`, `None` when the label is not summarized periodically.
    pub fn for_label(&self, label: &str) -> Option<u64> {
        match self {
            SummaryFrequency::Every(frequency) => Some(*frequency),
            SummaryFrequency::PerLabel(frequencies) => frequencies.get(label).copied(),
        }
    }
}

/// TensorBoard summaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummarizerConfig {
    pub directory: String,
    /// Timesteps between act-summaries, every timestep when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<SummaryFrequency>,
    /// Seconds between writer flushes.
    #[serde(default = "default_flush")]
    pub flush: u64,
    #[serde(rename = "max-summaries", default = "default_max_entries")]
    pub max_summaries: usize,
    #[serde(default = "default_labels")]
    pub labels: SummaryLabels,
}

fn default_flush() -> u64 {
    10
}

fn default_labels() -> SummaryLabels {
    SummaryLabels::Labels(vec!["graph".to_string()])
}

impl SummarizerConfig {
    pub fn new(directory: impl Into<String>) -> Self {
        return Self {
            directory: directory.into(),
            frequency: None,
            flush: default_flush(),
            max_summaries: default_max_entries(),
            labels: default_labels(),
        };
    }
}

/// Experience trace recording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecorderConfig {
    pub directory: String,
    /// Episodes between recorded traces.
    #[serde(default = "default_recorder_frequency")]
    pub frequency: u64,
    /// Episodes to skip before recording.
    #[serde(default)]
    pub start: u64,
    /// All traces are kept when absent.
    #[serde(rename = "max-traces", default, skip_serializing_if = "Option::is_none")]
    pub max_traces: Option<usize>,
}

fn default_recorder_frequency() -> u64 {
    1
}

impl RecorderConfig {
    pub fn new(directory: impl Into<String>) -> Self {
        return Self {
            directory: directory.into(),
            frequency: default_recorder_frequency(),
            start: 0,
            max_traces: None,
        };
    }

    /// Whether the episode with index `episode` is recorded.
    pub fn records_episode(&self, episode: u64) -> bool {
        return episode >= self.start && (episode - self.start) % self.frequency.max(1) == 0;
    }
}
