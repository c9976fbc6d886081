//! HTTP boundary for littlesteps.
//!
//! Exposes an axum [`Router`] over the record operations in
//! `littlesteps-api`. Mutation routes live under `/internal`, read routes
//! under `/data`; every route except `/health` requires a bearer access
//! token.

pub mod auth;
pub mod error;
pub mod handlers;

pub use error::ApiError;

use std::sync::Arc;

use axum::{
  Router,
  routing::{delete, get, post, put},
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use littlesteps_api::RequestContext;
use littlesteps_auth::Caller;
use littlesteps_store_sqlite::SqliteStore;

use handlers::{activities, children, health};

// ─── Configuration ───────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` with
/// `LITTLESTEPS_*` environment overrides.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:         String,
  pub port:         u16,
  /// SQLite path or URI (`file:...` forms are accepted).
  pub database_url: String,
  /// Secret shared with the token-issuing service.
  pub jwt_secret:   String,
}

// ─── Application state ───────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers. Store connections are
/// not part of it; each request opens its own and drops it on exit.
#[derive(Clone)]
pub struct AppState {
  pub config: Arc<ServerConfig>,
}

impl AppState {
  /// Open a store connection for this request scope and pair it with the
  /// caller. The connection closes when the context drops.
  pub async fn context(
    &self,
    caller: Caller,
  ) -> Result<RequestContext<SqliteStore>, ApiError> {
    let store = SqliteStore::open(&self.config.database_url).await?;
    Ok(RequestContext::new(caller, store))
  }
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build the service router.
pub fn router(state: AppState) -> Router {
  Router::new()
    // Mutations
    .route("/internal/children", post(children::create))
    .route("/internal/children/{id}", put(children::update))
    .route(
      "/internal/children/{id}/link-supervisor",
      put(children::link_supervisor),
    )
    .route("/internal/activities", post(activities::create))
    // Reads
    .route("/data/children", get(children::list))
    .route("/data/children/{id}", get(children::get_one))
    .route("/data/activities", get(activities::list))
    .route("/data/activities/{id}", delete(activities::delete_one))
    // Liveness
    .route("/health", get(health::check))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}
