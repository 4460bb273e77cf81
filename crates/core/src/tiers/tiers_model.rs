//! Billing tier domain models.

use std::str::FromStr;

use chrono::Utc;
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A billing tier as stored. The external tier code is the identity carried
/// by source files; `id` is the internal join key referenced by clients and
/// fee bands.
#[derive(Debug, Clone, Queryable, Insertable)]
#[diesel(table_name = crate::schema::billing_tiers)]
pub struct BillingTierDB {
    pub id: String,
    pub external_tier_id: String,
    pub created_at: String,
}

impl BillingTierDB {
    pub fn new(external_tier_id: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            external_tier_id: external_tier_id.to_string(),
            created_at: Utc::now().to_rfc3339(),
        }
    }
}

/// One AUM band of a tier's fee schedule as stored. Monetary bounds and the
/// rate are TEXT columns holding decimal strings.
#[derive(Debug, Clone, Queryable, Insertable)]
#[diesel(table_name = crate::schema::billing_tier_ranges)]
pub struct TierRangeDB {
    pub id: String,
    pub billing_tier_id: String,
    pub portfolio_aum_min: String,
    pub portfolio_aum_max: String,
    pub fee_percentage: String,
    pub created_at: String,
}

impl TierRangeDB {
    pub fn new(
        billing_tier_id: &str,
        portfolio_aum_min: Decimal,
        portfolio_aum_max: Decimal,
        fee_percentage: Decimal,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            billing_tier_id: billing_tier_id.to_string(),
            portfolio_aum_min: portfolio_aum_min.to_string(),
            portfolio_aum_max: portfolio_aum_max.to_string(),
            fee_percentage: fee_percentage.to_string(),
            created_at: Utc::now().to_rfc3339(),
        }
    }
}

/// A fee band in domain form: AUM in `[portfolio_aum_min, portfolio_aum_max)`
/// billed at `fee_percentage`, a decimal fraction (0.0125 means 1.25%).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TierRange {
    pub portfolio_aum_min: Decimal,
    pub portfolio_aum_max: Decimal,
    pub fee_percentage: Decimal,
}

impl From<TierRangeDB> for TierRange {
    fn from(db: TierRangeDB) -> Self {
        Self {
            portfolio_aum_min: Decimal::from_str(&db.portfolio_aum_min).unwrap_or_default(),
            portfolio_aum_max: Decimal::from_str(&db.portfolio_aum_max).unwrap_or_default(),
            fee_percentage: Decimal::from_str(&db.fee_percentage).unwrap_or_default(),
        }
    }
}
