use std::sync::Arc;

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};
use axum::{
    extract::{Path, State},
    routing::{delete, get},
    Json, Router,
};
use serde_json::json;
use tokio::task;
use wealthbill_core::billing::{
    AssetHolding, ClientTotals, FirmTotals, PortfolioTotals, TierWithRanges,
};

/// Billing reads run blocking diesel queries, so every handler hops to the
/// blocking pool instead of stalling the async executor.
async fn run_blocking<T, F>(f: F) -> ApiResult<T>
where
    T: Send + 'static,
    F: FnOnce() -> wealthbill_core::Result<T> + Send + 'static,
{
    let value = task::spawn_blocking(f)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to execute billing task: {}", e))??;
    Ok(value)
}

/// True once clients, portfolios and assets have all been imported.
async fn get_status(State(state): State<Arc<AppState>>) -> ApiResult<Json<bool>> {
    let service = state.billing_service.clone();
    let ready = run_blocking(move || service.has_data()).await?;
    Ok(Json(ready))
}

async fn get_firm_totals(State(state): State<Arc<AppState>>) -> ApiResult<Json<FirmTotals>> {
    let service = state.billing_service.clone();
    let totals = run_blocking(move || service.get_firm_totals()).await?;
    Ok(Json(totals))
}

async fn get_client_totals(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<ClientTotals>>> {
    let service = state.billing_service.clone();
    let totals = run_blocking(move || service.get_client_totals()).await?;
    Ok(Json(totals))
}

/// One client's totals addressed by external client id.
async fn get_client(
    Path(client_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<ClientTotals>> {
    let service = state.billing_service.clone();
    let totals =
        run_blocking(move || service.get_client_totals_by_external_id(&client_id)).await?;
    let totals = totals.ok_or(ApiError::NotFound)?;
    Ok(Json(totals))
}

/// Per-portfolio totals for one client, sorted by AUM descending.
async fn get_client_portfolios(
    Path(client_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<PortfolioTotals>>> {
    let service = state.billing_service.clone();
    let totals =
        run_blocking(move || service.get_portfolio_totals_for_client(&client_id)).await?;
    let totals = totals.ok_or(ApiError::NotFound)?;
    Ok(Json(totals))
}

async fn get_asset_holdings(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<AssetHolding>>> {
    let service = state.billing_service.clone();
    let holdings = run_blocking(move || service.get_asset_holdings()).await?;
    Ok(Json(holdings))
}

async fn get_tiers(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<TierWithRanges>>> {
    let service = state.billing_service.clone();
    let tiers = run_blocking(move || service.get_tiers()).await?;
    Ok(Json(tiers))
}

/// Wipe every imported row so a fresh batch can be loaded.
async fn reset_all_data(State(state): State<Arc<AppState>>) -> ApiResult<Json<serde_json::Value>> {
    let service = state.billing_service.clone();
    run_blocking(move || service.reset_all_data()).await?;
    Ok(Json(
        json!({ "message": "All data has been reset successfully" }),
    ))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/billing/status", get(get_status))
        .route("/billing/calculations/firm", get(get_firm_totals))
        .route("/billing/calculations/clients", get(get_client_totals))
        .route("/billing/calculations/client/{client_id}", get(get_client))
        .route(
            "/billing/calculations/clients/{client_id}/portfolios",
            get(get_client_portfolios),
        )
        .route("/billing/calculations/assets", get(get_asset_holdings))
        .route("/billing/tiers", get(get_tiers))
        .route("/billing/reset", delete(reset_all_data))
}
