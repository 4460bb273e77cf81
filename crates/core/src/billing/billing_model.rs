//! Billing aggregation response models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::tiers::TierRange;

/// Firm-wide totals across every client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirmTotals {
    pub firm_aum_cad: Decimal,
    pub firm_revenue_cad: Decimal,
    /// Revenue divided by AUM; zero when the firm has no AUM.
    pub firm_average_fee_rate: Decimal,
    pub num_clients: i64,
    pub num_portfolios: i64,
}

/// One client's AUM and fees. The fee rate is taken from the band of the
/// client's tier containing the client's total AUM.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientTotals {
    pub client_id: String,
    pub external_client_id: String,
    pub client_name: String,
    pub total_aum_cad: Decimal,
    pub total_fees_cad: Decimal,
    pub effective_fee_rate: Decimal,
}

/// One portfolio's share of its owner's billing. The rate comes from the
/// owning client's band, chosen by the client's total AUM, applied to the
/// portfolio's own AUM.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioTotals {
    pub portfolio_id: String,
    pub external_portfolio_id: String,
    pub total_aum_cad: Decimal,
    pub total_fees_cad: Decimal,
    pub effective_fee_rate: Decimal,
}

/// A tier definition with its fee bands ordered by minimum AUM.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TierWithRanges {
    pub external_tier_id: String,
    pub ranges: Vec<TierRange>,
}

/// One asset valuation with the external id of its portfolio.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetHolding {
    pub external_portfolio_id: String,
    pub asset_id: String,
    pub asset_value: Decimal,
    pub currency: String,
    pub date: String,
}
