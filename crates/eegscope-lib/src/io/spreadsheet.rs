use super::cell::Cell;
use super::table::{finalize, ColumnLayout, Table};
use crate::channels::ChannelName;
use crate::config::{IngestConfig, TimePolicy};
use crate::error::IngestError;
use crate::signal::Sample;
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use log::debug;
use std::io::Cursor;

/// Substrings that mark a header as the time column.
pub const SHEET_TIME_MARKERS: [&str; 3] = ["TIME", "INDEX", "SAMPLE"];
/// Headers that mark the time column only on an exact match.
pub const SHEET_TIME_HEADERS: [&str; 2] = ["MS", "SEC"];

impl From<&Data> for Cell {
    fn from(value: &Data) -> Self {
        match value {
            Data::Int(v) => Cell::Number(*v as f64),
            Data::Float(v) => Cell::Number(*v),
            // Date and time formats only change how the stored serial number displays.
            Data::DateTime(dt) => Cell::Number(dt.as_f64()),
            Data::String(s) => Cell::Text(s.clone()),
            Data::Empty => Cell::Empty,
            _ => Cell::Other,
        }
    }
}

/// Ingest the first sheet of an `.xlsx`/`.xls` workbook. Other sheets are ignored.
pub fn parse_spreadsheet(bytes: &[u8], config: &IngestConfig) -> Result<Vec<Sample>, IngestError> {
    parse_spreadsheet_table(bytes, config).map(|table| table.samples)
}

/// Like [`parse_spreadsheet`], keeping the column order and row count.
pub fn parse_spreadsheet_table(bytes: &[u8], config: &IngestConfig) -> Result<Table, IngestError> {
    if bytes.is_empty() {
        return Err(IngestError::EmptyFile);
    }
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    let range = match workbook.worksheet_range_at(0) {
        Some(range) => range?,
        None => return Err(IngestError::EmptyOrHeaderOnly),
    };
    debug!("first sheet spans {:?}", range.get_size());
    let rows: Vec<Vec<Cell>> = range
        .rows()
        .map(|row| row.iter().map(Cell::from).collect())
        .collect();
    sheet_table(&rows, config)
}

/// Ingest a sheet already decoded into rows; row 0 holds the headers.
pub fn parse_sheet_rows(rows: &[Vec<Cell>], config: &IngestConfig) -> Result<Vec<Sample>, IngestError> {
    sheet_table(rows, config).map(|table| table.samples)
}

fn sheet_table(rows: &[Vec<Cell>], config: &IngestConfig) -> Result<Table, IngestError> {
    let Some((header_row, data_rows)) = rows.split_first() else {
        return Err(IngestError::EmptyOrHeaderOnly);
    };
    if data_rows.is_empty() {
        return Err(IngestError::EmptyOrHeaderOnly);
    }
    let headers: Vec<Option<ChannelName>> = header_row
        .iter()
        .map(|cell| cell.label().and_then(|label| ChannelName::normalize(&label)))
        .collect();
    let time_name = match config.time_policy {
        TimePolicy::Labeled => find_time_header(&headers),
        TimePolicy::Synthetic => None,
    };
    if config.time_policy == TimePolicy::Labeled && time_name.is_none() {
        debug!("no time column found, using row index as timestamp");
    }
    let layout = ColumnLayout::new(&headers, time_name.as_ref());
    let samples: Vec<Sample> = data_rows
        .iter()
        .enumerate()
        .filter_map(|(index, row)| layout.sample(row, index, config))
        .collect();
    finalize(samples, &layout, data_rows.len(), config, "spreadsheet")
}

fn is_time_header(name: &str) -> bool {
    SHEET_TIME_MARKERS.iter().any(|marker| name.contains(marker))
        || SHEET_TIME_HEADERS.contains(&name)
}

fn find_time_header(headers: &[Option<ChannelName>]) -> Option<ChannelName> {
    headers
        .iter()
        .flatten()
        .find(|name| is_time_header(name.as_str()))
        .cloned()
}
