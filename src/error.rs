use std::path::PathBuf;

use thiserror::Error;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, ConvertError>;

/// Everything that can abort the conversion of an input file.
///
/// None of these are recoverable at row level: a single bad row invalidates
/// the whole output of its file.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A row is shorter than a column the format needs.
    #[error("{file}: row {row} has {len} cells, column {column} is missing")]
    MalformedRow {
        file: String,
        row: usize,
        column: usize,
        len: usize,
    },

    /// A date cell does not match the pattern of its format.
    #[error("{file}: row {row}: date '{value}' does not match '{format}'")]
    InvalidDate {
        file: String,
        row: usize,
        value: String,
        format: String,
    },

    /// No output file can be derived for the given input.
    #[error("cannot derive an output file for {0}")]
    UnsupportedOutput(PathBuf),

    /// The input encoding could not be detected and none was configured.
    #[error("cannot detect the text encoding of {0}")]
    EncodingDetection(PathBuf),
}

/// Where a row came from, for error reporting
#[derive(Debug, Clone, Copy)]
pub struct RowLocation<'a> {
    pub file: &'a str,
    /// 0-based index of the row in its input stream
    pub row: usize,
}

impl<'a> RowLocation<'a> {
    pub fn new(file: &'a str, row: usize) -> Self {
        RowLocation { file, row }
    }

    pub fn malformed(&self, column: usize, len: usize) -> ConvertError {
        ConvertError::MalformedRow {
            file: self.file.to_string(),
            row: self.row,
            column,
            len,
        }
    }

    pub fn invalid_date(&self, value: &str, format: &str) -> ConvertError {
        ConvertError::InvalidDate {
            file: self.file.to_string(),
            row: self.row,
            value: value.to_string(),
            format: format.to_string(),
        }
    }
}
