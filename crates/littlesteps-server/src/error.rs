//! HTTP error mapping: the shared error taxonomy to status codes, with
//! `message`-keyed JSON bodies.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use littlesteps_auth::AuthError;
use littlesteps_core::Error as CoreError;

/// Wrapper giving the shared error taxonomy an HTTP shape.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct ApiError(#[from] pub CoreError);

impl From<AuthError> for ApiError {
  fn from(e: AuthError) -> Self {
    ApiError(CoreError::Unauthorized(e.to_string()))
  }
}

impl From<littlesteps_store_sqlite::Error> for ApiError {
  fn from(e: littlesteps_store_sqlite::Error) -> Self {
    ApiError(CoreError::store(e))
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self.0 {
      CoreError::Unauthorized(m) => (StatusCode::UNAUTHORIZED, m.clone()),
      CoreError::Forbidden { .. } => {
        (StatusCode::FORBIDDEN, "access denied".to_owned())
      }
      CoreError::Validation(m) => (StatusCode::BAD_REQUEST, m.clone()),
      CoreError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      CoreError::Store(e) => {
        tracing::error!(error = %e, "store failure");
        (
          StatusCode::INTERNAL_SERVER_ERROR,
          "internal server error".to_owned(),
        )
      }
    };
    (status, Json(json!({ "message": message }))).into_response()
  }
}
