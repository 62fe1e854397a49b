//! API Error Handling
//!
//! Every failure is answered with a JSON body of the form `{"error": "..."}`,
//! which is what the real Mage API returns.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::store::StoreError;

/// API error type
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => {
                tracing::warn!("Rejected request: {}", msg);
                (StatusCode::BAD_REQUEST, msg)
            }
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::PipelineNotFound => ApiError::NotFound("Pipeline not found".to_string()),
            StoreError::BlockNotFound => ApiError::NotFound("Block not found".to_string()),
            StoreError::BlockContentNotFound => {
                ApiError::NotFound("Block content not found".to_string())
            }
            StoreError::AlreadyExists(uuid) => {
                ApiError::BadRequest(format!("{} already exists", uuid))
            }
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Fallback for routes the mock does not serve
pub async fn endpoint_not_found() -> ApiError {
    ApiError::NotFound("Endpoint not found".to_string())
}
