use std::sync::Arc;

use crate::main_lib::AppState;
use axum::{routing::get, Json, Router};
use serde_json::json;

/// Liveness probe used by the dashboard to confirm the API is reachable.
async fn ping() -> Json<serde_json::Value> {
    Json(json!({ "status": "pong" }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/ping", get(ping))
}
