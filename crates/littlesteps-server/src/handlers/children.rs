//! Handlers for child routes.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `POST`   | `/internal/children` | Parent-only; 201 with the new id |
//! | `PUT`    | `/internal/children/:id` | Partial merge of allowed fields |
//! | `PUT`    | `/internal/children/:id/link-supervisor` | Teacher-only, idempotent |
//! | `GET`    | `/data/children/:id` | Full document for authorized callers |
//! | `GET`    | `/data/children` | `{_id, name}` listing for the caller |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde_json::{Value, json};

use littlesteps_api::children::{
  self, CreateChildRequest, LinkSupervisorRequest,
};
use littlesteps_core::child::{Child, ChildSummary};

use crate::{AppState, auth::Authenticated, error::ApiError};

/// `POST /internal/children`
pub async fn create(
  State(state): State<AppState>,
  Authenticated(caller): Authenticated,
  Json(body): Json<CreateChildRequest>,
) -> Result<impl IntoResponse, ApiError> {
  let ctx = state.context(caller).await?;
  let id = children::create_child(&ctx, body).await?;
  Ok((
    StatusCode::CREATED,
    Json(json!({ "message": "child created", "child_id": id.to_string() })),
  ))
}

/// `PUT /internal/children/:id`
pub async fn update(
  State(state): State<AppState>,
  Authenticated(caller): Authenticated,
  Path(id): Path<String>,
  Json(payload): Json<Value>,
) -> Result<Json<Value>, ApiError> {
  let ctx = state.context(caller).await?;
  children::update_child(&ctx, &id, &payload).await?;
  Ok(Json(json!({ "message": "child updated" })))
}

/// `PUT /internal/children/:id/link-supervisor`
pub async fn link_supervisor(
  State(state): State<AppState>,
  Authenticated(caller): Authenticated,
  Path(id): Path<String>,
  Json(body): Json<LinkSupervisorRequest>,
) -> Result<Json<Value>, ApiError> {
  let ctx = state.context(caller).await?;
  children::link_supervisor(&ctx, &id, body).await?;
  Ok(Json(json!({ "message": "supervisor linked" })))
}

/// `GET /data/children/:id`
pub async fn get_one(
  State(state): State<AppState>,
  Authenticated(caller): Authenticated,
  Path(id): Path<String>,
) -> Result<Json<Child>, ApiError> {
  let ctx = state.context(caller).await?;
  Ok(Json(children::get_child(&ctx, &id).await?))
}

/// `GET /data/children`
pub async fn list(
  State(state): State<AppState>,
  Authenticated(caller): Authenticated,
) -> Result<Json<Vec<ChildSummary>>, ApiError> {
  let ctx = state.context(caller).await?;
  Ok(Json(children::list_children(&ctx).await?))
}
