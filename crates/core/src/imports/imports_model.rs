//! Upload batch domain models: data kinds, decoded rows, and results.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::imports_errors::ImportError;

/// The four data kinds an upload batch must supply, listed in dependency
/// order: every kind follows the kinds its rows reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataKind {
    BillingTier,
    ClientBilling,
    Portfolio,
    Asset,
}

impl DataKind {
    pub const ALL: [DataKind; 4] = [
        DataKind::BillingTier,
        DataKind::ClientBilling,
        DataKind::Portfolio,
        DataKind::Asset,
    ];

    pub fn canonical_name(&self) -> &'static str {
        match self {
            DataKind::BillingTier => "billing_tier",
            DataKind::ClientBilling => "client_billing",
            DataKind::Portfolio => "portfolio",
            DataKind::Asset => "asset",
        }
    }

    /// Resolve a file or sheet name: the first kind in `ALL` whose canonical
    /// name is a case-insensitive substring of the input, or `None`.
    pub fn resolve(name: &str) -> Option<DataKind> {
        let lowered = name.to_lowercase();
        DataKind::ALL
            .into_iter()
            .find(|kind| lowered.contains(kind.canonical_name()))
    }

    /// Tiers are re-importable and upsert on their external code; the other
    /// kinds insert fresh rows only and rely on UNIQUE constraints to reject
    /// duplicates.
    pub fn write_strategy(&self) -> WriteStrategy {
        match self {
            DataKind::BillingTier => WriteStrategy::Upsert,
            DataKind::ClientBilling | DataKind::Portfolio | DataKind::Asset => {
                WriteStrategy::InsertOnly
            }
        }
    }
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical_name())
    }
}

/// Per-kind write policy applied by the ingestor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStrategy {
    Upsert,
    InsertOnly,
}

/// An uploaded file as received at the boundary.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    pub fn extension(&self) -> Option<&str> {
        self.name.rsplit_once('.').map(|(_, ext)| ext)
    }
}

/// One fee band row from a tier sheet. A tier code repeats once per band.
#[derive(Debug, Clone)]
pub struct TierRow {
    pub external_tier_id: String,
    pub portfolio_aum_min: Decimal,
    pub portfolio_aum_max: Decimal,
    pub fee_percentage: Decimal,
}

impl TierRow {
    pub fn from_row(row: usize, cells: &[String]) -> Result<Self, ImportError> {
        let kind = DataKind::BillingTier;
        Ok(Self {
            external_tier_id: required_cell(kind, row, cells, 0, "external_tier_id")?.to_string(),
            portfolio_aum_min: decimal_cell(kind, row, cells, 1, "portfolio_aum_min")?,
            portfolio_aum_max: decimal_cell(kind, row, cells, 2, "portfolio_aum_max")?,
            fee_percentage: decimal_cell(kind, row, cells, 3, "fee_percentage")?,
        })
    }
}

/// One client row: identity, display fields, and the external code of the
/// billing tier it should be attached to.
#[derive(Debug, Clone)]
pub struct ClientRow {
    pub external_client_id: String,
    pub client_name: String,
    pub province: String,
    pub country: String,
    pub billing_tier_id: String,
}

impl ClientRow {
    pub fn from_row(row: usize, cells: &[String]) -> Result<Self, ImportError> {
        let kind = DataKind::ClientBilling;
        Ok(Self {
            external_client_id: required_cell(kind, row, cells, 0, "external_client_id")?
                .to_string(),
            client_name: required_cell(kind, row, cells, 1, "client_name")?.to_string(),
            province: required_cell(kind, row, cells, 2, "province")?.to_string(),
            country: required_cell(kind, row, cells, 3, "country")?.to_string(),
            billing_tier_id: required_cell(kind, row, cells, 4, "billing_tier_id")?.to_string(),
        })
    }
}

/// One portfolio row: the owning client's external code, the portfolio's own
/// external code, and its currency.
#[derive(Debug, Clone)]
pub struct PortfolioRow {
    pub external_client_id: String,
    pub external_portfolio_id: String,
    pub currency: String,
}

impl PortfolioRow {
    pub fn from_row(row: usize, cells: &[String]) -> Result<Self, ImportError> {
        let kind = DataKind::Portfolio;
        Ok(Self {
            external_client_id: required_cell(kind, row, cells, 0, "external_client_id")?
                .to_string(),
            external_portfolio_id: required_cell(kind, row, cells, 1, "external_portfolio_id")?
                .to_string(),
            currency: required_cell(kind, row, cells, 2, "currency")?.to_string(),
        })
    }
}

/// One asset valuation row.
#[derive(Debug, Clone)]
pub struct AssetRow {
    pub date: NaiveDate,
    pub external_portfolio_id: String,
    pub asset_id: String,
    pub asset_value: Decimal,
    pub currency: String,
}

impl AssetRow {
    pub fn from_row(row: usize, cells: &[String]) -> Result<Self, ImportError> {
        let kind = DataKind::Asset;
        Ok(Self {
            date: date_cell(kind, row, cells, 0, "date")?,
            external_portfolio_id: required_cell(kind, row, cells, 1, "external_portfolio_id")?
                .to_string(),
            asset_id: required_cell(kind, row, cells, 2, "asset_id")?.to_string(),
            asset_value: decimal_cell(kind, row, cells, 3, "asset_value")?,
            currency: required_cell(kind, row, cells, 4, "currency")?.to_string(),
        })
    }
}

/// Rows not inserted because their reference did not resolve. Each id is the
/// row's natural identifier annotated with the missing dependency.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkippedRows {
    pub count: usize,
    pub ids: Vec<String>,
}

impl SkippedRows {
    pub fn push(&mut self, id: String) {
        self.ids.push(id);
        self.count += 1;
    }
}

/// Outcome of ingesting one data kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KindImportResult {
    pub kind: DataKind,
    pub processed: usize,
    pub skipped: SkippedRows,
}

fn required_cell<'a>(
    kind: DataKind,
    row: usize,
    cells: &'a [String],
    index: usize,
    name: &str,
) -> Result<&'a str, ImportError> {
    let value = cells.get(index).map(|cell| cell.trim()).unwrap_or("");
    if value.is_empty() {
        return Err(ImportError::RowParse {
            kind,
            row,
            message: format!("missing required column '{name}'"),
        });
    }
    Ok(value)
}

/// Parse a numeric cell, tolerating currency formatting such as `$1,250.00`.
fn decimal_cell(
    kind: DataKind,
    row: usize,
    cells: &[String],
    index: usize,
    name: &str,
) -> Result<Decimal, ImportError> {
    let raw = required_cell(kind, row, cells, index, name)?;
    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | ' '))
        .collect();
    Decimal::from_str(&cleaned).map_err(|e| ImportError::RowParse {
        kind,
        row,
        message: format!("column '{name}' has invalid number '{raw}': {e}"),
    })
}

/// Parse a date cell, accepting ISO `YYYY-MM-DD` and `M/D/YYYY`.
fn date_cell(
    kind: DataKind,
    row: usize,
    cells: &[String],
    index: usize,
    name: &str,
) -> Result<NaiveDate, ImportError> {
    let raw = required_cell(kind, row, cells, index, name)?;
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%m/%d/%Y"))
        .map_err(|e| ImportError::RowParse {
            kind,
            row,
            message: format!("column '{name}' has invalid date '{raw}': {e}"),
        })
}
