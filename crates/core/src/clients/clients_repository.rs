//! Diesel-backed storage for clients.

use std::collections::HashMap;

use diesel::prelude::*;

use crate::errors::Result;
use crate::schema::clients;

use super::clients_model::ClientDB;

pub struct ClientRepository;

impl ClientRepository {
    pub fn new() -> Self {
        ClientRepository
    }

    pub fn insert_batch(
        &self,
        conn: &mut SqliteConnection,
        new_clients: Vec<ClientDB>,
    ) -> Result<usize> {
        if new_clients.is_empty() {
            return Ok(0);
        }
        let inserted = diesel::insert_into(clients::table)
            .values(&new_clients)
            .execute(conn)?;
        Ok(inserted)
    }

    /// Bulk map from external client id to internal id.
    pub fn ids_by_external_id(
        &self,
        conn: &mut SqliteConnection,
        external_ids: &[String],
    ) -> Result<HashMap<String, String>> {
        let rows: Vec<(String, String)> = clients::table
            .filter(clients::external_client_id.eq_any(external_ids))
            .select((clients::external_client_id, clients::id))
            .load(conn)?;
        Ok(rows.into_iter().collect())
    }

    pub fn list(&self, conn: &mut SqliteConnection) -> Result<Vec<ClientDB>> {
        let rows = clients::table
            .order(clients::external_client_id.asc())
            .load::<ClientDB>(conn)?;
        Ok(rows)
    }

    pub fn find_by_external_id(
        &self,
        conn: &mut SqliteConnection,
        external_id: &str,
    ) -> Result<Option<ClientDB>> {
        let row = clients::table
            .filter(clients::external_client_id.eq(external_id))
            .first::<ClientDB>(conn)
            .optional()?;
        Ok(row)
    }

    pub fn count(&self, conn: &mut SqliteConnection) -> Result<i64> {
        let total = clients::table.count().get_result(conn)?;
        Ok(total)
    }

    pub fn delete_all(&self, conn: &mut SqliteConnection) -> Result<usize> {
        let deleted = diesel::delete(clients::table).execute(conn)?;
        Ok(deleted)
    }
}
