use std::sync::Arc;

use crate::config::Config;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};
use wealthbill_core::{
    billing::{BillingService, BillingServiceTrait},
    db,
    imports::{ImportService, ImportServiceTrait},
};

pub struct AppState {
    pub import_service: Arc<dyn ImportServiceTrait>,
    pub billing_service: Arc<dyn BillingServiceTrait>,
}

pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true).with_line_number(true))
        .init();
}

pub fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    // Ensure DATABASE_URL aligns with WB_DB_PATH so core picks the right file
    std::env::set_var("DATABASE_URL", &config.db_path);
    let db_path = db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;

    let import_service: Arc<dyn ImportServiceTrait> = Arc::new(ImportService::new(pool.clone()));
    let billing_service: Arc<dyn BillingServiceTrait> = Arc::new(BillingService::new(pool));

    Ok(Arc::new(AppState {
        import_service,
        billing_service,
    }))
}
