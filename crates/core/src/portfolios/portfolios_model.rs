//! Portfolio domain models.

use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;

/// A portfolio as stored, linked to its owning client by internal id.
#[derive(Debug, Clone, Queryable, Insertable)]
#[diesel(table_name = crate::schema::portfolios)]
pub struct PortfolioDB {
    pub id: String,
    pub external_portfolio_id: String,
    pub client_id: String,
    pub currency: String,
    pub created_at: String,
}

impl PortfolioDB {
    pub fn new(external_portfolio_id: &str, client_id: &str, currency: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            external_portfolio_id: external_portfolio_id.to_string(),
            client_id: client_id.to_string(),
            currency: currency.to_string(),
            created_at: Utc::now().to_rfc3339(),
        }
    }
}
