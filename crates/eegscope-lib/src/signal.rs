use crate::channels::ChannelName;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One timestamped row of channel values.
///
/// Serializes flat, e.g. `{"timestamp": 0.0, "FP1": 1.5, "FP2": 2.5}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub timestamp: f64,
    #[serde(flatten)]
    pub channels: BTreeMap<ChannelName, f64>,
}

impl Sample {
    pub fn new(timestamp: f64) -> Self {
        Self {
            timestamp,
            channels: BTreeMap::new(),
        }
    }

    /// Builder-style insert, mostly for tests and fixtures.
    pub fn with(mut self, channel: &str, value: f64) -> Self {
        if let Some(name) = ChannelName::normalize(channel) {
            self.channels.insert(name, value);
        }
        self
    }

    pub fn value(&self, channel: &str) -> Option<f64> {
        self.channels.get(channel).copied()
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}

/// Channel labels of a recording, taken from its first sample.
pub fn channel_labels(samples: &[Sample]) -> Vec<String> {
    samples
        .first()
        .map(|sample| {
            sample
                .channels
                .keys()
                .map(|name| name.as_str().to_string())
                .collect()
        })
        .unwrap_or_default()
}

pub fn last_timestamp(samples: &[Sample]) -> Option<f64> {
    samples.last().map(|sample| sample.timestamp)
}
