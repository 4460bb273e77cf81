//! Shared helpers for integration tests.

use std::sync::Arc;

use tempfile::TempDir;
use wealthbill_core::db::{create_pool, run_migrations, DbPool};
use wealthbill_core::imports::UploadFile;

/// Builds a migrated pool backed by a SQLite file in a temp directory.
/// The `TempDir` must be kept alive for the duration of the test.
pub fn test_pool() -> (Arc<DbPool>, TempDir) {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let db_path = temp_dir.path().join("test.db");
    let pool = create_pool(&db_path.to_string_lossy()).expect("Failed to create pool");
    run_migrations(&pool).expect("Failed to run migrations");
    (pool, temp_dir)
}

pub fn csv_file(name: &str, contents: &str) -> UploadFile {
    UploadFile::new(name, contents.as_bytes().to_vec())
}

/// A minimal complete batch: one tier band, one client, one portfolio, one
/// asset worth 500,000 CAD.
pub fn happy_batch() -> Vec<UploadFile> {
    vec![
        csv_file(
            "billing_tier.csv",
            "external_tier_id,portfolio_aum_min,portfolio_aum_max,fee_percentage\n\
             T1,0,1000000,0.01\n",
        ),
        csv_file(
            "client_billing.csv",
            "external_client_id,client_name,province,country,billing_tier_id\n\
             C1,Jane Doe,ON,Canada,T1\n",
        ),
        csv_file(
            "portfolio.csv",
            "external_client_id,external_portfolio_id,currency\n\
             C1,P1,CAD\n",
        ),
        csv_file(
            "asset.csv",
            "date,external_portfolio_id,asset_id,asset_value,currency\n\
             2024-03-31,P1,A1,500000,CAD\n",
        ),
    ]
}
