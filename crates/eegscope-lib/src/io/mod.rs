//! Format-specific ingestors. Each one turns raw file content into the same
//! `Vec<Sample>` shape, or a [`Table`] that also keeps the column order.

pub mod cell;
pub mod csv;
pub mod preset;
pub mod spreadsheet;
mod table;

pub use self::csv::{parse_csv_text, parse_delimited, parse_delimited_table};
pub use self::preset::{load_preset, parse_preset};
pub use self::spreadsheet::{parse_sheet_rows, parse_spreadsheet, parse_spreadsheet_table};
pub use self::table::{Table, EXPECTED_CHANNELS};

/// Lower-cased extension of a declared file name, if it has one.
pub fn file_extension(file_name: &str) -> Option<String> {
    let (_, ext) = file_name.rsplit_once('.')?;
    Some(ext.to_ascii_lowercase())
}

pub(crate) fn is_spreadsheet_extension(ext: Option<&str>) -> bool {
    matches!(ext, Some("xlsx" | "xls"))
}
