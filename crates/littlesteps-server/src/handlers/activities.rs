//! Handlers for activity routes.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `POST`   | `/internal/activities` | Supervising teachers only; 201 |
//! | `GET`    | `/data/activities` | `?child_id&type&start_date&end_date` |
//! | `DELETE` | `/data/activities/:id` | Supervising teachers only |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde_json::{Value, json};

use littlesteps_api::activities::{
  self, CreateActivityRequest, ListActivitiesParams,
};
use littlesteps_core::activity::Activity;

use crate::{AppState, auth::Authenticated, error::ApiError};

/// `POST /internal/activities`
pub async fn create(
  State(state): State<AppState>,
  Authenticated(caller): Authenticated,
  Json(body): Json<CreateActivityRequest>,
) -> Result<impl IntoResponse, ApiError> {
  let ctx = state.context(caller).await?;
  let id = activities::create_activity(&ctx, body).await?;
  Ok((
    StatusCode::CREATED,
    Json(json!({ "message": "activity logged", "activity_id": id.to_string() })),
  ))
}

/// `GET /data/activities?child_id=<id>[&type=..][&start_date=..][&end_date=..]`
pub async fn list(
  State(state): State<AppState>,
  Authenticated(caller): Authenticated,
  Query(params): Query<ListActivitiesParams>,
) -> Result<Json<Vec<Activity>>, ApiError> {
  let ctx = state.context(caller).await?;
  Ok(Json(activities::list_activities(&ctx, params).await?))
}

/// `DELETE /data/activities/:id`
pub async fn delete_one(
  State(state): State<AppState>,
  Authenticated(caller): Authenticated,
  Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
  let ctx = state.context(caller).await?;
  activities::delete_activity(&ctx, &id).await?;
  Ok(Json(json!({ "message": "activity deleted" })))
}
