use std::sync::Arc;

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};
use axum::{
    extract::{Multipart, State},
    routing::post,
    Json, Router,
};
use tokio::task;
use wealthbill_core::imports::{KindImportResult, UploadFile};

/// Accept an upload batch (one workbook or four flat files) as repeated
/// `files` multipart fields and ingest it in a single transaction.
async fn upload_batch(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> ApiResult<Json<Vec<KindImportResult>>> {
    let mut files: Vec<UploadFile> = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Failed to read multipart field: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();
        if name != "files" {
            continue;
        }
        let file_name = field.file_name().unwrap_or("").to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Failed to read file content: {}", e)))?;
        files.push(UploadFile::new(file_name, bytes.to_vec()));
    }

    let service = state.import_service.clone();
    let results = task::spawn_blocking(move || service.import_batch(&files))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to execute import task: {}", e))??;
    Ok(Json(results))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/upload", post(upload_batch))
}
