//! Bearer-token extractor for the HTTP layer.

use axum::{
  extract::FromRequestParts,
  http::{header, request::Parts},
};

use littlesteps_auth::{Caller, validate_bearer};
use littlesteps_core::Error as CoreError;

use crate::{AppState, error::ApiError};

/// Extracted, validated caller. Presence in a handler's signature means the
/// request carried a valid access token.
pub struct Authenticated(pub Caller);

impl FromRequestParts<AppState> for Authenticated {
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState,
  ) -> Result<Self, Self::Rejection> {
    let header_value = parts
      .headers
      .get(header::AUTHORIZATION)
      .and_then(|v| v.to_str().ok())
      .ok_or_else(|| {
        ApiError(CoreError::Unauthorized(
          "missing authorization header".to_owned(),
        ))
      })?;

    let caller =
      validate_bearer(header_value, state.config.jwt_secret.as_bytes())?;
    Ok(Authenticated(caller))
  }
}
