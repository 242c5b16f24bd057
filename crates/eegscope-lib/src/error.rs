use std::path::PathBuf;
use thiserror::Error;

/// Terminal failure of one ingestion attempt. Messages are shown to the user as-is.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("the file is empty; select a file that contains data")]
    EmptyFile,
    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),
    #[error("invalid file type '{mime}'; upload a CSV file")]
    InvalidType { mime: String },
    #[error(
        "no timestamp column found; the file needs a column named Time or Timestamp (columns: {})",
        .columns.join(", ")
    )]
    MissingTimestampColumn { columns: Vec<String> },
    #[error("the spreadsheet is empty or has no data rows")]
    EmptyOrHeaderOnly,
    #[error("no valid data points found; the EEG channel columns must contain numeric values")]
    NoValidData,
    #[error(
        "no recognized EEG channels found. Your file contains these columns: {}\n\nExpected channel names should include some of: {}",
        .found.join(", "),
        .expected.join(", ")
    )]
    UnrecognizedChannels {
        found: Vec<String>,
        expected: Vec<String>,
    },
    #[error("failed to read delimited text: {0}")]
    Malformed(String),
    #[error("failed to read the spreadsheet: {0}")]
    Workbook(String),
    #[error("unknown preset recording '{0}'")]
    UnknownPreset(String),
    #[error("failed to read {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<csv::Error> for IngestError {
    fn from(err: csv::Error) -> Self {
        IngestError::Malformed(err.to_string())
    }
}

impl From<calamine::Error> for IngestError {
    fn from(err: calamine::Error) -> Self {
        IngestError::Workbook(err.to_string())
    }
}
