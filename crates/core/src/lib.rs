//! Wealthbill Core - billing data ingestion and fee aggregation.
//!
//! This crate ingests spreadsheet/CSV exports of a wealth-management firm's
//! billing tiers, clients, portfolios and assets into SQLite under a single
//! all-or-nothing transaction per upload batch, and computes the firm/client/
//! portfolio fee aggregations served by the dashboard API.

pub mod assets;
pub mod billing;
pub mod clients;
pub mod db;
pub mod errors;
pub mod imports;
pub mod portfolios;
pub mod schema;
pub mod tiers;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
