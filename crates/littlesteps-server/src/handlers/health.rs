//! Liveness check.

use axum::{Json, extract::State};
use serde_json::{Value, json};

use littlesteps_store_sqlite::SqliteStore;

use crate::{AppState, error::ApiError};

/// `GET /health` — 200 when the store is reachable.
pub async fn check(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
  SqliteStore::open(&state.config.database_url).await?;
  Ok(Json(json!({ "status": "ok" })))
}
