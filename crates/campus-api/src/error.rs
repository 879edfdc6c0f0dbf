//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("report error: {0}")]
  Report(#[from] campus_report::Error),
}

impl ApiError {
  pub fn store(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Store(Box::new(e))
  }
}

impl From<campus_core::Error> for ApiError {
  fn from(e: campus_core::Error) -> Self { Self::BadRequest(e.to_string()) }
}

impl From<validator::ValidationErrors> for ApiError {
  fn from(e: validator::ValidationErrors) -> Self { Self::BadRequest(e.to_string()) }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Store(e) => {
        tracing::error!(error = %e, "store operation failed");
        (StatusCode::INTERNAL_SERVER_ERROR, "internal server error".to_owned())
      }
      ApiError::Report(e) => {
        tracing::error!(error = %e, "report rendering failed");
        (StatusCode::INTERNAL_SERVER_ERROR, "failed to generate report".to_owned())
      }
    };
    (status, Json(json!({ "success": false, "message": message }))).into_response()
  }
}
