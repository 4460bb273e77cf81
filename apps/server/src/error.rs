use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use wealthbill_core::errors::Error as CoreError;
use wealthbill_core::imports::ImportError;

#[allow(dead_code)]
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Core(#[from] CoreError),
    #[error("Not Found")]
    NotFound,
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Internal(String),
    #[error("{0}")]
    Anyhow(#[from] anyhow::Error),
}

#[derive(Serialize)]
struct ErrorBody {
    code: u16,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, msg) = match &self {
            ApiError::Core(e) => (core_status(e), e.to_string()),
            ApiError::NotFound => (StatusCode::NOT_FOUND, self.to_string()),
            ApiError::BadRequest(reason) => (StatusCode::BAD_REQUEST, reason.clone()),
            ApiError::Internal(reason) => (StatusCode::INTERNAL_SERVER_ERROR, reason.clone()),
            ApiError::Anyhow(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
        };
        let body = Json(ErrorBody {
            code: status.as_u16(),
            message: msg,
        });
        (status, body).into_response()
    }
}

/// Batch-shape problems are the caller's fault and ingest failures are
/// unprocessable content. Re-importing a live external id surfaces the
/// unique constraint as a conflict.
fn core_status(err: &CoreError) -> StatusCode {
    if err.is_unique_violation() {
        return StatusCode::CONFLICT;
    }
    match err {
        CoreError::Import(e) => match e {
            ImportError::InvalidBatch(_) => StatusCode::BAD_REQUEST,
            ImportError::FileTooLarge(_, _) => StatusCode::PAYLOAD_TOO_LARGE,
            ImportError::UnresolvedKind(_)
            | ImportError::MissingKinds(_)
            | ImportError::RowParse { .. }
            | ImportError::Csv(_)
            | ImportError::Workbook(_) => StatusCode::UNPROCESSABLE_ENTITY,
        },
        CoreError::Validation(_) => StatusCode::BAD_REQUEST,
        CoreError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
