//! Asset valuation domain models.

use chrono::{NaiveDate, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

/// An asset valuation as stored: one instrument inside a portfolio with its
/// market value on the valuation date. `asset_value` and `date` are TEXT
/// columns holding a decimal string and an ISO date.
#[derive(Debug, Clone, Queryable, Insertable)]
#[diesel(table_name = crate::schema::assets)]
pub struct AssetDB {
    pub id: String,
    pub portfolio_id: String,
    pub asset_id: String,
    pub asset_value: String,
    pub currency: String,
    pub date: String,
    pub created_at: String,
}

impl AssetDB {
    pub fn new(
        portfolio_id: &str,
        asset_id: &str,
        asset_value: Decimal,
        currency: &str,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            portfolio_id: portfolio_id.to_string(),
            asset_id: asset_id.to_string(),
            asset_value: asset_value.to_string(),
            currency: currency.to_string(),
            date: date.format("%Y-%m-%d").to_string(),
            created_at: Utc::now().to_rfc3339(),
        }
    }
}
