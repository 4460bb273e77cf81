//! Diesel-backed storage for billing tiers and their fee bands.

use std::collections::HashMap;

use diesel::prelude::*;
use diesel::upsert::excluded;

use crate::errors::Result;
use crate::schema::{billing_tier_ranges, billing_tiers};

use super::tiers_model::{BillingTierDB, TierRangeDB};

pub struct TierRepository;

impl TierRepository {
    pub fn new() -> Self {
        TierRepository
    }

    /// Insert-or-keep each external tier code and return the code to
    /// internal id mapping for the whole set. Re-importing a code reuses
    /// the existing row, so client references stay stable across batches.
    pub fn upsert_tiers(
        &self,
        conn: &mut SqliteConnection,
        external_ids: &[String],
    ) -> Result<HashMap<String, String>> {
        for external_id in external_ids {
            let tier = BillingTierDB::new(external_id);
            diesel::insert_into(billing_tiers::table)
                .values(&tier)
                .on_conflict(billing_tiers::external_tier_id)
                .do_update()
                .set(billing_tiers::external_tier_id.eq(excluded(billing_tiers::external_tier_id)))
                .execute(conn)?;
        }
        self.ids_by_external_id(conn, external_ids)
    }

    /// Bulk map from external tier code to internal id.
    pub fn ids_by_external_id(
        &self,
        conn: &mut SqliteConnection,
        external_ids: &[String],
    ) -> Result<HashMap<String, String>> {
        let rows: Vec<(String, String)> = billing_tiers::table
            .filter(billing_tiers::external_tier_id.eq_any(external_ids))
            .select((billing_tiers::external_tier_id, billing_tiers::id))
            .load(conn)?;
        Ok(rows.into_iter().collect())
    }

    pub fn insert_ranges(
        &self,
        conn: &mut SqliteConnection,
        ranges: Vec<TierRangeDB>,
    ) -> Result<usize> {
        if ranges.is_empty() {
            return Ok(0);
        }
        let inserted = diesel::insert_into(billing_tier_ranges::table)
            .values(&ranges)
            .execute(conn)?;
        Ok(inserted)
    }

    pub fn list(&self, conn: &mut SqliteConnection) -> Result<Vec<BillingTierDB>> {
        let tiers = billing_tiers::table
            .order(billing_tiers::external_tier_id.asc())
            .load::<BillingTierDB>(conn)?;
        Ok(tiers)
    }

    /// All fee bands, unordered. Bounds are stored as decimal strings, so
    /// callers sort numerically after parsing rather than relying on SQL.
    pub fn list_ranges(&self, conn: &mut SqliteConnection) -> Result<Vec<TierRangeDB>> {
        let ranges = billing_tier_ranges::table.load::<TierRangeDB>(conn)?;
        Ok(ranges)
    }

    pub fn count(&self, conn: &mut SqliteConnection) -> Result<i64> {
        let total = billing_tiers::table.count().get_result(conn)?;
        Ok(total)
    }

    /// Remove all tiers and their bands, bands first to satisfy the
    /// foreign key.
    pub fn delete_all(&self, conn: &mut SqliteConnection) -> Result<usize> {
        let mut deleted = diesel::delete(billing_tier_ranges::table).execute(conn)?;
        deleted += diesel::delete(billing_tiers::table).execute(conn)?;
        Ok(deleted)
    }
}
