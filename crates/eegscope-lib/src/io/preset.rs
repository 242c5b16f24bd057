//! Server-hosted example recordings. These files carry no header row: column
//! `i` is the `i`-th entry of `STANDARD_CHANNELS` and the timestamp is the row
//! index. Every non-empty line counts as a row, even one whose cells are all
//! blank or unreadable.

use super::cell::Cell;
use super::table::{finalize, ColumnLayout, Table};
use crate::channels::ChannelName;
use crate::config::{ChannelCheck, IngestConfig};
use crate::error::IngestError;
use ::csv::ReaderBuilder;
use std::path::Path;

/// Column order of the preset recordings.
pub const STANDARD_CHANNELS: [&str; 19] = [
    "FP1", "FP2", "F3", "F4", "F7", "F8", "T3", "T4", "C3", "C4", "T5", "T6", "P3", "P4", "O1",
    "O2", "FZ", "CZ", "PZ",
];

pub const PRESET_COUNT: usize = 36;

/// Preset ids `s00` .. `s35`.
pub fn preset_ids() -> Vec<String> {
    (0..PRESET_COUNT).map(|i| format!("s{:02}", i)).collect()
}

pub fn preset_file_name(id: &str) -> Result<String, IngestError> {
    if preset_ids().iter().any(|known| known == id) {
        Ok(format!("{}.csv", id))
    } else {
        Err(IngestError::UnknownPreset(id.to_string()))
    }
}

pub fn parse_preset(text: &str) -> Result<Table, IngestError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());
    let headers: Vec<Option<ChannelName>> = STANDARD_CHANNELS
        .iter()
        .map(|name| ChannelName::normalize(name))
        .collect();
    let layout = ColumnLayout::new(&headers, None);
    let config = IngestConfig {
        channel_check: ChannelCheck::Off,
        ..IngestConfig::synthetic(1.0)
    };
    let mut samples = Vec::new();
    let mut index = 0;
    for record in reader.records() {
        let record = record?;
        let cells: Vec<Cell> = record.iter().map(Cell::text).collect();
        if let Some(sample) = layout.sample(&cells, index, &config) {
            samples.push(sample);
        }
        index += 1;
    }
    finalize(samples, &layout, index, &config, "preset")
}

/// Read and parse `<dir>/<id>.csv`.
pub fn load_preset(dir: &Path, id: &str) -> Result<Table, IngestError> {
    let path = dir.join(preset_file_name(id)?);
    let text = std::fs::read_to_string(&path).map_err(|source| IngestError::Io {
        path: path.clone(),
        source,
    })?;
    parse_preset(&text)
}
