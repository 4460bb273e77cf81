//! Import pipeline errors.

use thiserror::Error;

use super::imports_model::DataKind;

/// Errors that abort an upload batch. Per-row reference misses are recorded
/// as skips instead and never surface here.
#[derive(Error, Debug)]
pub enum ImportError {
    /// The batch is not one workbook or exactly four flat files.
    #[error("Invalid upload batch: {0}")]
    InvalidBatch(String),

    #[error("File '{0}' exceeds the {1} byte upload limit")]
    FileTooLarge(String, usize),

    /// A file or sheet name matched none of the data kinds.
    #[error("Cannot determine the data type of '{0}'")]
    UnresolvedKind(String),

    /// One or more required kinds had no sheet in the batch.
    #[error("Missing required data: {0}")]
    MissingKinds(String),

    #[error("Invalid {kind} row {row}: {message}")]
    RowParse {
        kind: DataKind,
        row: usize,
        message: String,
    },

    #[error("Failed to read CSV data: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to read workbook: {0}")]
    Workbook(#[from] calamine::XlsxError),
}
