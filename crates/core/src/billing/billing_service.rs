//! Billing aggregation over the imported dataset.
//!
//! Values are summed and billed with `rust_decimal` end to end; nothing here
//! goes through floats. Fees follow the band rule: the rate of the first
//! band of the client's tier (ordered by minimum) containing the client's
//! total AUM, applied as `fee = aum * rate`.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

use log::info;
use rust_decimal::Decimal;

use crate::assets::{AssetDB, AssetRepository};
use crate::clients::ClientRepository;
use crate::db::{get_connection, DbPool, DbTransactionExecutor};
use crate::errors::Result;
use crate::portfolios::PortfolioRepository;
use crate::tiers::{TierRange, TierRepository};

use super::billing_model::{
    AssetHolding, ClientTotals, FirmTotals, PortfolioTotals, TierWithRanges,
};
use super::billing_traits::BillingServiceTrait;

pub struct BillingService {
    pool: Arc<DbPool>,
    tier_repository: TierRepository,
    client_repository: ClientRepository,
    portfolio_repository: PortfolioRepository,
    asset_repository: AssetRepository,
}

impl BillingService {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self {
            pool,
            tier_repository: TierRepository::new(),
            client_repository: ClientRepository::new(),
            portfolio_repository: PortfolioRepository::new(),
            asset_repository: AssetRepository::new(),
        }
    }

    /// Fee bands grouped by internal tier id, each group ordered by minimum
    /// AUM so band selection can scan front to back.
    fn ranges_by_tier(
        &self,
        conn: &mut diesel::SqliteConnection,
    ) -> Result<HashMap<String, Vec<TierRange>>> {
        let mut map: HashMap<String, Vec<TierRange>> = HashMap::new();
        for range in self.tier_repository.list_ranges(conn)? {
            map.entry(range.billing_tier_id.clone())
                .or_default()
                .push(TierRange::from(range));
        }
        for ranges in map.values_mut() {
            ranges.sort_by(|a, b| a.portfolio_aum_min.cmp(&b.portfolio_aum_min));
        }
        Ok(map)
    }

    fn compute_client_totals(
        &self,
        conn: &mut diesel::SqliteConnection,
    ) -> Result<Vec<ClientTotals>> {
        let clients = self.client_repository.list(conn)?;
        let portfolios = self.portfolio_repository.list(conn)?;
        let assets = self.asset_repository.list(conn)?;
        let ranges = self.ranges_by_tier(conn)?;

        let portfolio_aum = aum_by_portfolio(&assets);
        let mut client_aum: HashMap<String, Decimal> = HashMap::new();
        for portfolio in &portfolios {
            let aum = portfolio_aum
                .get(&portfolio.id)
                .copied()
                .unwrap_or_default();
            *client_aum
                .entry(portfolio.client_id.clone())
                .or_insert(Decimal::ZERO) += aum;
        }

        let totals = clients
            .into_iter()
            .map(|client| {
                let aum = client_aum.get(&client.id).copied().unwrap_or_default();
                let rate = ranges
                    .get(&client.billing_tier_id)
                    .map(|tier_ranges| band_rate(tier_ranges, aum))
                    .unwrap_or(Decimal::ZERO);
                ClientTotals {
                    client_id: client.id,
                    external_client_id: client.external_client_id,
                    client_name: client.client_name,
                    total_aum_cad: aum,
                    total_fees_cad: aum * rate,
                    effective_fee_rate: rate,
                }
            })
            .collect();
        Ok(totals)
    }
}

impl BillingServiceTrait for BillingService {
    fn has_data(&self) -> Result<bool> {
        let mut conn = get_connection(&self.pool)?;
        let clients = self.client_repository.count(&mut conn)?;
        let portfolios = self.portfolio_repository.count(&mut conn)?;
        let assets = self.asset_repository.count(&mut conn)?;
        Ok(clients > 0 && portfolios > 0 && assets > 0)
    }

    fn get_firm_totals(&self) -> Result<FirmTotals> {
        let mut conn = get_connection(&self.pool)?;
        let client_totals = self.compute_client_totals(&mut conn)?;
        let num_portfolios = self.portfolio_repository.count(&mut conn)?;

        let firm_aum: Decimal = client_totals.iter().map(|c| c.total_aum_cad).sum();
        let firm_revenue: Decimal = client_totals.iter().map(|c| c.total_fees_cad).sum();
        let average_rate = if firm_aum.is_zero() {
            Decimal::ZERO
        } else {
            firm_revenue / firm_aum
        };

        Ok(FirmTotals {
            firm_aum_cad: firm_aum,
            firm_revenue_cad: firm_revenue,
            firm_average_fee_rate: average_rate,
            num_clients: client_totals.len() as i64,
            num_portfolios,
        })
    }

    fn get_client_totals(&self) -> Result<Vec<ClientTotals>> {
        let mut conn = get_connection(&self.pool)?;
        self.compute_client_totals(&mut conn)
    }

    fn get_client_totals_by_external_id(
        &self,
        external_id: &str,
    ) -> Result<Option<ClientTotals>> {
        let mut conn = get_connection(&self.pool)?;
        let Some(client) = self
            .client_repository
            .find_by_external_id(&mut conn, external_id)?
        else {
            return Ok(None);
        };

        let portfolios = self.portfolio_repository.list_by_client(&mut conn, &client.id)?;
        let portfolio_ids: Vec<String> = portfolios.iter().map(|p| p.id.clone()).collect();
        let assets = self
            .asset_repository
            .list_by_portfolios(&mut conn, &portfolio_ids)?;
        let ranges = self.ranges_by_tier(&mut conn)?;

        let aum: Decimal = assets
            .iter()
            .map(|asset| Decimal::from_str(&asset.asset_value).unwrap_or_default())
            .sum();
        let rate = ranges
            .get(&client.billing_tier_id)
            .map(|tier_ranges| band_rate(tier_ranges, aum))
            .unwrap_or(Decimal::ZERO);

        Ok(Some(ClientTotals {
            client_id: client.id,
            external_client_id: client.external_client_id,
            client_name: client.client_name,
            total_aum_cad: aum,
            total_fees_cad: aum * rate,
            effective_fee_rate: rate,
        }))
    }

    fn get_portfolio_totals_for_client(
        &self,
        external_id: &str,
    ) -> Result<Option<Vec<PortfolioTotals>>> {
        let mut conn = get_connection(&self.pool)?;
        let Some(client) = self
            .client_repository
            .find_by_external_id(&mut conn, external_id)?
        else {
            return Ok(None);
        };

        let portfolios = self.portfolio_repository.list_by_client(&mut conn, &client.id)?;
        let portfolio_ids: Vec<String> = portfolios.iter().map(|p| p.id.clone()).collect();
        let assets = self
            .asset_repository
            .list_by_portfolios(&mut conn, &portfolio_ids)?;
        let ranges = self.ranges_by_tier(&mut conn)?;

        let portfolio_aum = aum_by_portfolio(&assets);
        let client_aum: Decimal = portfolio_ids
            .iter()
            .map(|id| portfolio_aum.get(id).copied().unwrap_or_default())
            .sum();
        // The band is chosen once from the client's total AUM, then applied
        // to each portfolio's own AUM.
        let rate = ranges
            .get(&client.billing_tier_id)
            .map(|tier_ranges| band_rate(tier_ranges, client_aum))
            .unwrap_or(Decimal::ZERO);

        let mut totals: Vec<PortfolioTotals> = portfolios
            .into_iter()
            .map(|portfolio| {
                let aum = portfolio_aum
                    .get(&portfolio.id)
                    .copied()
                    .unwrap_or_default();
                PortfolioTotals {
                    portfolio_id: portfolio.id,
                    external_portfolio_id: portfolio.external_portfolio_id,
                    total_aum_cad: aum,
                    total_fees_cad: aum * rate,
                    effective_fee_rate: rate,
                }
            })
            .collect();
        totals.sort_by(|a, b| b.total_aum_cad.cmp(&a.total_aum_cad));

        Ok(Some(totals))
    }

    fn get_asset_holdings(&self) -> Result<Vec<AssetHolding>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = self.asset_repository.list_with_portfolio(&mut conn)?;
        Ok(rows
            .into_iter()
            .map(|(asset, external_portfolio_id)| AssetHolding {
                external_portfolio_id,
                asset_id: asset.asset_id,
                asset_value: Decimal::from_str(&asset.asset_value).unwrap_or_default(),
                currency: asset.currency,
                date: asset.date,
            })
            .collect())
    }

    fn get_tiers(&self) -> Result<Vec<TierWithRanges>> {
        let mut conn = get_connection(&self.pool)?;
        let tiers = self.tier_repository.list(&mut conn)?;
        let mut ranges = self.ranges_by_tier(&mut conn)?;
        Ok(tiers
            .into_iter()
            .map(|tier| TierWithRanges {
                external_tier_id: tier.external_tier_id,
                ranges: ranges.remove(&tier.id).unwrap_or_default(),
            })
            .collect())
    }

    fn reset_all_data(&self) -> Result<()> {
        self.pool.execute(|conn| {
            self.asset_repository.delete_all(conn)?;
            self.portfolio_repository.delete_all(conn)?;
            self.client_repository.delete_all(conn)?;
            self.tier_repository.delete_all(conn)?;
            Ok(())
        })?;
        info!("All billing data reset");
        Ok(())
    }
}

/// Total asset value per portfolio id.
fn aum_by_portfolio(assets: &[AssetDB]) -> HashMap<String, Decimal> {
    let mut map: HashMap<String, Decimal> = HashMap::new();
    for asset in assets {
        let value = Decimal::from_str(&asset.asset_value).unwrap_or_default();
        *map.entry(asset.portfolio_id.clone()).or_insert(Decimal::ZERO) += value;
    }
    map
}

/// Rate of the first band containing the AUM (`min <= aum < max`), or zero
/// when no band does. Expects bands ordered by minimum.
fn band_rate(ranges: &[TierRange], aum: Decimal) -> Decimal {
    ranges
        .iter()
        .find(|range| range.portfolio_aum_min <= aum && aum < range.portfolio_aum_max)
        .map(|range| range.fee_percentage)
        .unwrap_or(Decimal::ZERO)
}
