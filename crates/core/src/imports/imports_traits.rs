//! Trait boundary for the import pipeline.

use crate::errors::Result;

use super::imports_model::{KindImportResult, UploadFile};

/// Ingests upload batches. Object-safe so the HTTP layer can hold it behind
/// an `Arc<dyn ...>`.
pub trait ImportServiceTrait: Send + Sync {
    /// Validate, decode, and ingest one batch atomically, returning per-kind
    /// results in processing order.
    fn import_batch(&self, files: &[UploadFile]) -> Result<Vec<KindImportResult>>;
}
