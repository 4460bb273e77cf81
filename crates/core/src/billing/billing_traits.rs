//! Trait boundary for billing aggregation reads.

use crate::errors::Result;

use super::billing_model::{
    AssetHolding, ClientTotals, FirmTotals, PortfolioTotals, TierWithRanges,
};

/// Read-only billing computations over the imported dataset, plus the one
/// destructive operation that wipes it.
pub trait BillingServiceTrait: Send + Sync {
    /// True when at least one client, one portfolio, and one asset exist.
    fn has_data(&self) -> Result<bool>;

    fn get_firm_totals(&self) -> Result<FirmTotals>;

    fn get_client_totals(&self) -> Result<Vec<ClientTotals>>;

    /// One client's totals addressed by external client id; `None` when the
    /// client is unknown.
    fn get_client_totals_by_external_id(&self, external_id: &str)
        -> Result<Option<ClientTotals>>;

    /// Per-portfolio totals for one client, sorted by AUM descending; `None`
    /// when the client is unknown.
    fn get_portfolio_totals_for_client(
        &self,
        external_id: &str,
    ) -> Result<Option<Vec<PortfolioTotals>>>;

    fn get_asset_holdings(&self) -> Result<Vec<AssetHolding>>;

    fn get_tiers(&self) -> Result<Vec<TierWithRanges>>;

    /// Delete every imported row, child tables first, in one transaction.
    fn reset_all_data(&self) -> Result<()>;
}
