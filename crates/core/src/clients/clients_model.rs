//! Client domain models.

use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;

/// A client as stored. `billing_tier_id` points at the internal tier id,
/// resolved from the external tier code during import.
#[derive(Debug, Clone, Queryable, Insertable)]
#[diesel(table_name = crate::schema::clients)]
pub struct ClientDB {
    pub id: String,
    pub external_client_id: String,
    pub client_name: String,
    pub province: String,
    pub country: String,
    pub billing_tier_id: String,
    pub created_at: String,
}

impl ClientDB {
    pub fn new(
        external_client_id: &str,
        client_name: &str,
        province: &str,
        country: &str,
        billing_tier_id: &str,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            external_client_id: external_client_id.to_string(),
            client_name: client_name.to_string(),
            province: province.to_string(),
            country: country.to_string(),
            billing_tier_id: billing_tier_id.to_string(),
            created_at: Utc::now().to_rfc3339(),
        }
    }
}
