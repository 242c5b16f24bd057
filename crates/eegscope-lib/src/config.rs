use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How a sample's timestamp is obtained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimePolicy {
    /// Read it from a time-like column.
    #[default]
    Labeled,
    /// Row index times the sampling interval; every column is a channel.
    Synthetic,
}

/// What to do when none of the discovered channels is a known EEG label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChannelCheck {
    Off,
    /// Log a warning and accept the recording.
    #[default]
    Warn,
    /// Reject with `IngestError::UnrecognizedChannels`.
    Enforce,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IngestConfig {
    pub time_policy: TimePolicy,
    /// Spacing between synthetic timestamps.
    pub sampling_interval: f64,
    pub channel_check: ChannelCheck,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            time_policy: TimePolicy::Labeled,
            sampling_interval: 1.0,
            channel_check: ChannelCheck::Warn,
        }
    }
}

impl IngestConfig {
    pub fn synthetic(sampling_interval: f64) -> Self {
        Self {
            time_policy: TimePolicy::Synthetic,
            sampling_interval,
            ..Self::default()
        }
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: IngestConfig = toml::from_str(text).context("parsing ingest config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_toml_str(&text).with_context(|| format!("in {}", path.display()))
    }

    pub fn validate(&self) -> Result<()> {
        if !self.sampling_interval.is_finite() || self.sampling_interval <= 0.0 {
            bail!(
                "sampling_interval must be a positive number, got {}",
                self.sampling_interval
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_file_gives_defaults() {
        let config = IngestConfig::from_toml_str("").unwrap();
        assert_eq!(config, IngestConfig::default());
    }

    #[test]
    fn parses_all_fields() {
        let config = IngestConfig::from_toml_str(
            "time_policy = \"synthetic\"\nsampling_interval = 4.0\nchannel_check = \"enforce\"\n",
        )
        .unwrap();
        assert_eq!(config.time_policy, TimePolicy::Synthetic);
        assert_eq!(config.sampling_interval, 4.0);
        assert_eq!(config.channel_check, ChannelCheck::Enforce);
    }

    #[test]
    fn rejects_bad_interval_and_unknown_keys() {
        assert!(IngestConfig::from_toml_str("sampling_interval = 0.0").is_err());
        assert!(IngestConfig::from_toml_str("sampling_interval = -2.0").is_err());
        assert!(IngestConfig::from_toml_str("delimiter = \";\"").is_err());
    }

    #[test]
    fn loads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "channel_check = \"off\"").unwrap();
        let config = IngestConfig::load(file.path()).unwrap();
        assert_eq!(config.channel_check, ChannelCheck::Off);
        assert_eq!(config.time_policy, TimePolicy::Labeled);
    }
}
