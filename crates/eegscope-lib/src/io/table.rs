//! Row-to-sample assembly shared by the delimited and spreadsheet ingestors.

use super::cell::Cell;
use crate::channels::ChannelName;
use crate::config::{ChannelCheck, IngestConfig, TimePolicy};
use crate::error::IngestError;
use crate::signal::{channel_labels, Sample};
use log::{info, warn};

/// Labels the reference montage is expected to share at least one of.
pub const EXPECTED_CHANNELS: [&str; 21] = [
    "FP1", "FP2", "F3", "F4", "F7", "F8", "T7", "T8", "C3", "C4", "T3", "T4", "P7", "P8", "P3",
    "P4", "O1", "O2", "FZ", "CZ", "PZ",
];

/// Samples of one source along with its channel columns in file order and
/// the number of data rows read, including rows that produced no sample.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub samples: Vec<Sample>,
    pub columns: Vec<ChannelName>,
    pub rows: usize,
}

impl Table {
    /// Channels of the first sample, in column order.
    pub fn channel_order(&self) -> Vec<String> {
        let Some(first) = self.samples.first() else {
            return Vec::new();
        };
        self.columns
            .iter()
            .filter(|name| first.channels.contains_key(*name))
            .map(|name| name.as_str().to_string())
            .collect()
    }
}

/// Which source column feeds the timestamp and which feed channels.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ColumnLayout {
    time: Option<usize>,
    channels: Vec<(ChannelName, usize)>,
}

impl ColumnLayout {
    /// Build the layout from normalized headers.
    ///
    /// Columns without a header are skipped. When several columns normalize
    /// to the same name the last one wins, before any cell is coerced. A
    /// time column takes every column sharing its name out of the channels.
    pub(crate) fn new(headers: &[Option<ChannelName>], time_name: Option<&ChannelName>) -> Self {
        let mut time = None;
        let mut channels: Vec<(ChannelName, usize)> = Vec::new();
        for (idx, header) in headers.iter().enumerate() {
            let Some(name) = header else { continue };
            if Some(name) == time_name {
                time = Some(idx);
                continue;
            }
            match channels.iter_mut().find(|(existing, _)| existing == name) {
                Some(slot) => slot.1 = idx,
                None => channels.push((name.clone(), idx)),
            }
        }
        Self { time, channels }
    }

    #[cfg(test)]
    pub(crate) fn channel_columns(&self) -> &[(ChannelName, usize)] {
        &self.channels
    }

    /// Channel names in the order their columns first appear.
    pub(crate) fn channel_names(&self) -> Vec<ChannelName> {
        self.channels.iter().map(|(name, _)| name.clone()).collect()
    }

    /// Sample for data row `index`, or `None` when no cell coerces.
    pub(crate) fn sample(&self, row: &[Cell], index: usize, config: &IngestConfig) -> Option<Sample> {
        let fallback = index as f64;
        let timestamp = match config.time_policy {
            TimePolicy::Synthetic => fallback * config.sampling_interval,
            TimePolicy::Labeled => self
                .time
                .and_then(|col| row.get(col))
                .and_then(Cell::timestamp)
                .unwrap_or(fallback),
        };
        let mut sample = Sample::new(timestamp);
        for (name, col) in &self.channels {
            if let Some(value) = row.get(*col).and_then(Cell::coerce) {
                sample.channels.insert(name.clone(), value);
            }
        }
        if sample.is_empty() {
            None
        } else {
            Some(sample)
        }
    }
}

/// Apply the post-conditions common to every ingestor.
///
/// The vocabulary check only runs for labeled time; synthetic time is meant
/// for arbitrary tabular data.
pub(crate) fn finalize(
    samples: Vec<Sample>,
    layout: &ColumnLayout,
    rows: usize,
    config: &IngestConfig,
    source: &str,
) -> Result<Table, IngestError> {
    if samples.is_empty() {
        return Err(IngestError::NoValidData);
    }
    let found = channel_labels(&samples);
    let matching: Vec<&str> = EXPECTED_CHANNELS
        .iter()
        .copied()
        .filter(|expected| found.iter().any(|name| name == expected))
        .collect();
    if matching.is_empty() && config.time_policy == TimePolicy::Labeled {
        match config.channel_check {
            ChannelCheck::Off => {}
            ChannelCheck::Warn => warn!(
                "{}: none of the columns [{}] is a recognized EEG channel",
                source,
                found.join(", ")
            ),
            ChannelCheck::Enforce => {
                return Err(IngestError::UnrecognizedChannels {
                    found,
                    expected: EXPECTED_CHANNELS.iter().map(|s| s.to_string()).collect(),
                })
            }
        }
    }
    info!(
        "{}: parsed {} data points with channels: {}",
        source,
        samples.len(),
        found.join(", ")
    );
    Ok(Table {
        samples,
        columns: layout.channel_names(),
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(raw: &[&str]) -> Vec<Option<ChannelName>> {
        raw.iter().map(|h| ChannelName::normalize(h)).collect()
    }

    fn row(cells: &[&str]) -> Vec<Cell> {
        cells.iter().map(|c| Cell::text(c)).collect()
    }

    #[test]
    fn layout_skips_headerless_columns() {
        let hs = headers(&["Time", "", "Fp1"]);
        let time = ChannelName::normalize("TIME");
        let layout = ColumnLayout::new(&hs, time.as_ref());
        assert_eq!(layout.time, Some(0));
        assert_eq!(layout.channel_columns().len(), 1);
        assert_eq!(layout.channel_columns()[0].1, 2);
    }

    #[test]
    fn last_duplicate_column_wins_even_when_blank() {
        let hs = headers(&["Fp1", "FP-1"]);
        let layout = ColumnLayout::new(&hs, None);
        let config = IngestConfig::default();
        let sample = layout.sample(&row(&["1", "2"]), 0, &config).unwrap();
        assert_eq!(sample.value("FP1"), Some(2.0));
        assert!(layout.sample(&row(&["1", ""]), 0, &config).is_none());
    }

    #[test]
    fn timestamp_falls_back_to_row_index() {
        let hs = headers(&["Time", "Cz"]);
        let time = ChannelName::normalize("TIME");
        let layout = ColumnLayout::new(&hs, time.as_ref());
        let config = IngestConfig::default();
        let sample = layout.sample(&row(&["?", "4"]), 7, &config).unwrap();
        assert_eq!(sample.timestamp, 7.0);
    }

    #[test]
    fn synthetic_policy_scales_index() {
        let hs = headers(&["Cz"]);
        let layout = ColumnLayout::new(&hs, None);
        let config = IngestConfig::synthetic(4.0);
        let sample = layout.sample(&row(&["1"]), 3, &config).unwrap();
        assert_eq!(sample.timestamp, 12.0);
    }

    #[test]
    fn finalize_enforces_vocabulary_when_asked() {
        let samples = vec![Sample::new(0.0).with("A", 1.0)];
        let layout = ColumnLayout::new(&headers(&["A"]), None);
        let mut config = IngestConfig::default();
        assert!(finalize(samples.clone(), &layout, 1, &config, "t").is_ok());
        config.channel_check = ChannelCheck::Enforce;
        match finalize(samples, &layout, 1, &config, "t") {
            Err(IngestError::UnrecognizedChannels { found, expected }) => {
                assert_eq!(found, vec!["A"]);
                assert_eq!(expected.len(), EXPECTED_CHANNELS.len());
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(matches!(
            finalize(Vec::new(), &layout, 0, &config, "t"),
            Err(IngestError::NoValidData)
        ));
    }

    #[test]
    fn synthetic_time_skips_vocabulary_check() {
        let samples = vec![Sample::new(0.0).with("A", 1.0)];
        let layout = ColumnLayout::new(&headers(&["A"]), None);
        let config = IngestConfig {
            channel_check: ChannelCheck::Enforce,
            ..IngestConfig::synthetic(1.0)
        };
        let table = finalize(samples, &layout, 1, &config, "t").unwrap();
        assert_eq!(table.samples.len(), 1);
    }

    #[test]
    fn channel_order_follows_columns() {
        let hs = headers(&["Time", "O1", "Fp1", "Ecg", "Cz"]);
        let time = ChannelName::normalize("TIME");
        let layout = ColumnLayout::new(&hs, time.as_ref());
        let config = IngestConfig::default();
        let samples: Vec<Sample> = [row(&["0", "1", "2", "3", ""]), row(&["1", "1", "2", "3", "4"])]
            .iter()
            .enumerate()
            .filter_map(|(i, r)| layout.sample(r, i, &config))
            .collect();
        let table = finalize(samples, &layout, 2, &config, "t").unwrap();
        assert_eq!(table.channel_order(), vec!["O1", "FP1", "ECG"]);
        assert_eq!(table.rows, 2);
    }
}
