//! Turning an upload or preset pick into the state a viewer needs, and making
//! sure a slow load cannot overwrite a newer one.

use crate::channels::{organize, ChannelSelection, DetectedChannels};
use crate::config::IngestConfig;
use crate::display::DisplayWindow;
use crate::error::IngestError;
use crate::io::preset::{self, STANDARD_CHANNELS};
use crate::io::{self, file_extension, Table};
use crate::signal::Sample;
use log::{debug, warn};
use serde::Serialize;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// Everything derived from one successfully ingested recording.
#[derive(Debug, Clone, Serialize)]
pub struct LoadedRecording {
    pub source: String,
    pub samples: Vec<Sample>,
    pub detected: DetectedChannels,
    pub window: DisplayWindow,
    pub selection: ChannelSelection,
}

impl LoadedRecording {
    /// The picker lists the first sample's channels in file column order.
    pub fn from_upload(source: &str, table: Table) -> Self {
        let detected = organize(&table.channel_order());
        Self {
            source: source.to_string(),
            window: DisplayWindow::from_samples(&table.samples),
            selection: ChannelSelection::all(&detected.available),
            detected,
            samples: table.samples,
        }
    }

    /// The window spans every row of the file, including rows that gave no sample.
    pub fn from_preset(id: &str, table: Table) -> Self {
        let detected = organize(&STANDARD_CHANNELS);
        Self {
            source: format!("{}.csv", id),
            window: DisplayWindow::for_preset(table.rows),
            selection: ChannelSelection::all(&detected.available),
            detected,
            samples: table.samples,
        }
    }
}

/// Route an upload to the ingestor matching its extension.
pub fn load_upload(
    bytes: &[u8],
    file_name: &str,
    mime: &str,
    config: &IngestConfig,
) -> Result<LoadedRecording, IngestError> {
    let table = match file_extension(file_name).as_deref() {
        Some("xlsx" | "xls") => io::parse_spreadsheet_table(bytes, config)?,
        Some("csv") => io::parse_delimited_table(bytes, file_name, mime, config)?,
        other => {
            return Err(IngestError::UnsupportedFormat(format!(
                "'{}' ({}); upload a CSV or Excel file",
                file_name,
                other.map(|ext| format!(".{}", ext)).unwrap_or_else(|| "no extension".into())
            )))
        }
    };
    Ok(LoadedRecording::from_upload(file_name, table))
}

pub fn load_preset_recording(dir: &Path, id: &str) -> Result<LoadedRecording, IngestError> {
    let table = preset::load_preset(dir, id)?;
    Ok(LoadedRecording::from_preset(id, table))
}

/// Handle for one load started through a [`LoadSession`].
#[derive(Debug)]
pub struct LoadTicket {
    generation: u64,
}

impl LoadTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug)]
pub enum LoadOutcome {
    /// The recording is now the current one.
    Published,
    /// The load failed while still current; the current recording was cleared.
    Failed(IngestError),
    /// A newer load was started meanwhile; the result was dropped.
    Stale,
}

/// Holds the current recording. Each load takes a ticket; only the latest
/// ticket may publish, whatever order loads finish in.
#[derive(Debug, Default)]
pub struct LoadSession {
    generation: AtomicU64,
    current: Mutex<Option<Arc<LoadedRecording>>>,
}

impl LoadSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self) -> LoadTicket {
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        debug!("load #{} started", generation);
        LoadTicket { generation }
    }

    pub fn is_latest(&self, ticket: &LoadTicket) -> bool {
        self.generation.load(Ordering::Acquire) == ticket.generation
    }

    pub fn complete(
        &self,
        ticket: LoadTicket,
        result: Result<LoadedRecording, IngestError>,
    ) -> LoadOutcome {
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        if !self.is_latest(&ticket) {
            warn!(
                "dropping result of load #{}; load #{} is newer",
                ticket.generation,
                self.generation.load(Ordering::Acquire)
            );
            return LoadOutcome::Stale;
        }
        match result {
            Ok(recording) => {
                *current = Some(Arc::new(recording));
                LoadOutcome::Published
            }
            Err(err) => {
                *current = None;
                LoadOutcome::Failed(err)
            }
        }
    }

    pub fn current(&self) -> Option<Arc<LoadedRecording>> {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
