//! Diesel-backed storage for portfolios.

use std::collections::HashMap;

use diesel::prelude::*;

use crate::errors::Result;
use crate::schema::portfolios;

use super::portfolios_model::PortfolioDB;

pub struct PortfolioRepository;

impl PortfolioRepository {
    pub fn new() -> Self {
        PortfolioRepository
    }

    pub fn insert_batch(
        &self,
        conn: &mut SqliteConnection,
        new_portfolios: Vec<PortfolioDB>,
    ) -> Result<usize> {
        if new_portfolios.is_empty() {
            return Ok(0);
        }
        let inserted = diesel::insert_into(portfolios::table)
            .values(&new_portfolios)
            .execute(conn)?;
        Ok(inserted)
    }

    /// Bulk map from external portfolio id to internal id.
    pub fn ids_by_external_id(
        &self,
        conn: &mut SqliteConnection,
        external_ids: &[String],
    ) -> Result<HashMap<String, String>> {
        let rows: Vec<(String, String)> = portfolios::table
            .filter(portfolios::external_portfolio_id.eq_any(external_ids))
            .select((portfolios::external_portfolio_id, portfolios::id))
            .load(conn)?;
        Ok(rows.into_iter().collect())
    }

    pub fn list(&self, conn: &mut SqliteConnection) -> Result<Vec<PortfolioDB>> {
        let rows = portfolios::table
            .order(portfolios::external_portfolio_id.asc())
            .load::<PortfolioDB>(conn)?;
        Ok(rows)
    }

    pub fn list_by_client(
        &self,
        conn: &mut SqliteConnection,
        client_id: &str,
    ) -> Result<Vec<PortfolioDB>> {
        let rows = portfolios::table
            .filter(portfolios::client_id.eq(client_id))
            .order(portfolios::external_portfolio_id.asc())
            .load::<PortfolioDB>(conn)?;
        Ok(rows)
    }

    pub fn count(&self, conn: &mut SqliteConnection) -> Result<i64> {
        let total = portfolios::table.count().get_result(conn)?;
        Ok(total)
    }

    pub fn delete_all(&self, conn: &mut SqliteConnection) -> Result<usize> {
        let deleted = diesel::delete(portfolios::table).execute(conn)?;
        Ok(deleted)
    }
}
