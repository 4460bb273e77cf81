mod billing;
mod health;
mod imports;

use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use wealthbill_core::imports::MAX_UPLOAD_FILE_BYTES;

use crate::{config::Config, main_lib::AppState};

pub fn app_router(state: Arc<AppState>, config: &Config) -> Router {
    let cors = if config.cors_allow.iter().any(|o| o == "*") {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins = config
            .cors_allow
            .iter()
            .map(|o| o.parse().unwrap())
            .collect::<Vec<_>>();
        CorsLayer::new().allow_origin(origins)
    };

    let api = Router::new()
        .merge(health::router())
        .merge(imports::router())
        .merge(billing::router());

    Router::new()
        .nest("/api", api)
        .with_state(state)
        .layer(cors)
        // Room for four files at the per-file ceiling plus multipart framing;
        // the per-file limit itself is enforced during batch validation.
        .layer(DefaultBodyLimit::max(8 * MAX_UPLOAD_FILE_BYTES))
        .layer(TraceLayer::new_for_http())
}
