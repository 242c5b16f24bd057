use super::cell::Cell;
use super::table::{finalize, ColumnLayout, Table};
use super::{file_extension, is_spreadsheet_extension};
use crate::channels::ChannelName;
use crate::config::{IngestConfig, TimePolicy};
use crate::error::IngestError;
use crate::signal::Sample;
use ::csv::ReaderBuilder;
use log::debug;

/// MIME types accepted for delimited uploads (browsers label CSV as Excel at times).
pub const CSV_MIME_TYPES: [&str; 3] = ["text/csv", "application/vnd.ms-excel", "application/csv"];

/// Normalized headers recognised as the time column.
pub const CSV_TIME_HEADERS: [&str; 4] = ["TIMESTAMP", "TIME", "MS", "MILLISECONDS"];

/// Ingest an uploaded delimited-text file.
pub fn parse_delimited(
    bytes: &[u8],
    file_name: &str,
    mime: &str,
    config: &IngestConfig,
) -> Result<Vec<Sample>, IngestError> {
    parse_delimited_table(bytes, file_name, mime, config).map(|table| table.samples)
}

/// Like [`parse_delimited`], keeping the column order and row count.
///
/// Checks run in order: empty content, spreadsheet extension, then MIME type
/// and extension together.
pub fn parse_delimited_table(
    bytes: &[u8],
    file_name: &str,
    mime: &str,
    config: &IngestConfig,
) -> Result<Table, IngestError> {
    if bytes.is_empty() {
        return Err(IngestError::EmptyFile);
    }
    let extension = file_extension(file_name);
    if is_spreadsheet_extension(extension.as_deref()) {
        return Err(IngestError::UnsupportedFormat(
            "Excel files are not read as text; save the file as CSV or load it as a spreadsheet"
                .into(),
        ));
    }
    if !CSV_MIME_TYPES.contains(&mime) && extension.as_deref() != Some("csv") {
        return Err(IngestError::InvalidType {
            mime: mime.to_string(),
        });
    }
    let text = std::str::from_utf8(bytes)
        .map_err(|err| IngestError::Malformed(format!("{} is not UTF-8 text: {}", file_name, err)))?;
    debug!("{}: {} bytes of delimited text", file_name, bytes.len());
    parse_csv_text_named(text, config, file_name)
}

/// Parse comma-delimited text whose first row holds the headers.
pub fn parse_csv_text(text: &str, config: &IngestConfig) -> Result<Vec<Sample>, IngestError> {
    parse_csv_text_named(text, config, "csv").map(|table| table.samples)
}

fn parse_csv_text_named(
    text: &str,
    config: &IngestConfig,
    source: &str,
) -> Result<Table, IngestError> {
    let text = text.trim_start_matches('\u{FEFF}');
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());
    let headers: Vec<Option<ChannelName>> =
        reader.headers()?.iter().map(ChannelName::normalize).collect();

    let time_name = match config.time_policy {
        TimePolicy::Labeled => Some(find_time_header(&headers).ok_or_else(|| {
            IngestError::MissingTimestampColumn {
                columns: headers.iter().flatten().map(|h| h.to_string()).collect(),
            }
        })?),
        TimePolicy::Synthetic => None,
    };
    let layout = ColumnLayout::new(&headers, time_name.as_ref());

    let mut samples = Vec::new();
    let mut index = 0;
    for record in reader.records() {
        let record = record?;
        let cells: Vec<Cell> = record.iter().map(Cell::text).collect();
        if cells.iter().all(Cell::is_blank) {
            continue;
        }
        if let Some(sample) = layout.sample(&cells, index, config) {
            samples.push(sample);
        }
        index += 1;
    }
    debug!("{}: {} of {} rows kept", source, samples.len(), index);
    finalize(samples, &layout, index, config, source)
}

fn find_time_header(headers: &[Option<ChannelName>]) -> Option<ChannelName> {
    headers
        .iter()
        .flatten()
        .find(|name| CSV_TIME_HEADERS.contains(&name.as_str()))
        .cloned()
}
