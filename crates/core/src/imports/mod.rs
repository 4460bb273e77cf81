//! Imports module - upload batch validation, decoding, and ingestion.

mod imports_constants;
mod imports_errors;
mod imports_model;
mod imports_service;
mod imports_tabular;
mod imports_traits;

pub use imports_constants::*;
pub use imports_errors::ImportError;
pub use imports_model::{
    AssetRow, ClientRow, DataKind, KindImportResult, PortfolioRow, SkippedRows, TierRow,
    UploadFile, WriteStrategy,
};
pub use imports_service::ImportService;
pub use imports_tabular::{read_csv, read_workbook, Sheet};
pub use imports_traits::ImportServiceTrait;

#[cfg(test)]
mod imports_model_tests;
