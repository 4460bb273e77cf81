//! Diesel-backed storage for asset valuations.

use diesel::prelude::*;

use crate::errors::Result;
use crate::schema::{assets, portfolios};

use super::assets_model::AssetDB;

pub struct AssetRepository;

impl AssetRepository {
    pub fn new() -> Self {
        AssetRepository
    }

    pub fn insert_batch(
        &self,
        conn: &mut SqliteConnection,
        new_assets: Vec<AssetDB>,
    ) -> Result<usize> {
        if new_assets.is_empty() {
            return Ok(0);
        }
        let inserted = diesel::insert_into(assets::table)
            .values(&new_assets)
            .execute(conn)?;
        Ok(inserted)
    }

    pub fn list(&self, conn: &mut SqliteConnection) -> Result<Vec<AssetDB>> {
        let rows = assets::table.load::<AssetDB>(conn)?;
        Ok(rows)
    }

    pub fn list_by_portfolios(
        &self,
        conn: &mut SqliteConnection,
        portfolio_ids: &[String],
    ) -> Result<Vec<AssetDB>> {
        if portfolio_ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = assets::table
            .filter(assets::portfolio_id.eq_any(portfolio_ids))
            .load::<AssetDB>(conn)?;
        Ok(rows)
    }

    /// Asset rows joined with the external id of the holding portfolio.
    pub fn list_with_portfolio(
        &self,
        conn: &mut SqliteConnection,
    ) -> Result<Vec<(AssetDB, String)>> {
        let rows = assets::table
            .inner_join(portfolios::table)
            .select((assets::all_columns, portfolios::external_portfolio_id))
            .order(portfolios::external_portfolio_id.asc())
            .load::<(AssetDB, String)>(conn)?;
        Ok(rows)
    }

    pub fn count(&self, conn: &mut SqliteConnection) -> Result<i64> {
        let total = assets::table.count().get_result(conn)?;
        Ok(total)
    }

    pub fn delete_all(&self, conn: &mut SqliteConnection) -> Result<usize> {
        let deleted = diesel::delete(assets::table).execute(conn)?;
        Ok(deleted)
    }
}
