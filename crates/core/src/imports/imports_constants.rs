//! Upload batch limits and file type markers.

/// Largest accepted size for a single uploaded file, in bytes (4.5 MiB).
pub const MAX_UPLOAD_FILE_BYTES: usize = 4_718_592;

/// A flat-file batch must carry exactly one file per data kind.
pub const CSV_BATCH_FILE_COUNT: usize = 4;

pub const CSV_EXTENSION: &str = "csv";
pub const XLSX_EXTENSION: &str = "xlsx";
