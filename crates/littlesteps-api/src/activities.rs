//! Activity record operations.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use littlesteps_core::{
  DATE_FORMAT, Error, RecordId, Result, Role,
  activity::{Activity, NewActivity},
  store::{ActivityFilter, CareStore},
};

use crate::{
  access::{self, require_child_access, require_role},
  context::RequestContext,
};

// ─── Create ──────────────────────────────────────────────────────────────────

/// Payload for activity creation. `logged_by` is always stamped from the
/// caller; a payload-supplied value is ignored by omission from this shape.
#[derive(Debug, Deserialize)]
pub struct CreateActivityRequest {
  pub child_id:   Option<String>,
  #[serde(rename = "type")]
  pub kind:       Option<String>,
  pub details:    Option<Value>,
  pub created_at: Option<DateTime<Utc>>,
}

/// Log an activity against a child. The caller must be a teacher supervising
/// that child.
pub async fn create_activity<S: CareStore>(
  ctx: &RequestContext<S>,
  req: CreateActivityRequest,
) -> Result<RecordId> {
  require_role(&ctx.caller, Role::Teacher, "activity creation")?;

  let child_ref = req
    .child_id
    .ok_or_else(|| Error::Validation("child_id is required".into()))?;
  let child: RecordId = child_ref.parse().map_err(|_| {
    Error::Validation(format!("invalid child reference: {child_ref:?}"))
  })?;
  let identity = access::caller_id(&ctx.caller)
    .ok_or_else(|| access::denied(&ctx.caller, format!("child {child_ref}")))?;

  let supervises = ctx
    .store
    .is_supervisor_of(identity, child)
    .await
    .unwrap_or(false);
  if !supervises {
    tracing::warn!(
      identity = %ctx.caller.subject,
      role = %ctx.caller.role,
      resource = %child_ref,
      "denied: not a supervisor of the child",
    );
    return Err(access::denied(&ctx.caller, format!("child {child_ref}")));
  }

  let new = NewActivity {
    child_id:   child,
    kind:       req
      .kind
      .ok_or_else(|| Error::Validation("type is required".into()))?,
    details:    req
      .details
      .ok_or_else(|| Error::Validation("details is required".into()))?,
    logged_by:  identity,
    created_at: req.created_at,
  };
  new.validate()?;

  let id = ctx.store.create_activity(new).await.map_err(Error::store)?;
  tracing::info!(activity = %id, child = %child, by = %ctx.caller.subject, "activity logged");
  Ok(id)
}

// ─── List ────────────────────────────────────────────────────────────────────

/// Query parameters for the activity listing.
#[derive(Debug, Default, Deserialize)]
pub struct ListActivitiesParams {
  pub child_id:   Option<String>,
  #[serde(rename = "type")]
  pub kind:       Option<String>,
  pub start_date: Option<String>,
  pub end_date:   Option<String>,
}

/// Activities for one child, newest first, optionally narrowed by type and
/// a `YYYY-MM-DD` date window. The window is inclusive of both dates, which
/// makes the upper bound `end_date + 1 day`, exclusive.
pub async fn list_activities<S: CareStore>(
  ctx: &RequestContext<S>,
  params: ListActivitiesParams,
) -> Result<Vec<Activity>> {
  let child_ref = params
    .child_id
    .ok_or_else(|| Error::Validation("child_id query parameter is required".into()))?;
  let child = require_child_access(&ctx.store, &ctx.caller, &child_ref).await?;

  let start = params
    .start_date
    .map(|raw| parse_day(&raw))
    .transpose()?
    .map(day_start);
  let end = params
    .end_date
    .map(|raw| parse_day(&raw))
    .transpose()?
    .map(|date| {
      date
        .succ_opt()
        .map(day_start)
        .ok_or_else(|| Error::Validation("end_date out of range".into()))
    })
    .transpose()?;

  let filter = ActivityFilter { kind: params.kind, start, end };
  ctx
    .store
    .list_activities(child, &filter)
    .await
    .map_err(Error::store)
}

fn parse_day(raw: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(raw, DATE_FORMAT)
    .map_err(|_| Error::Validation(format!("invalid date: {raw:?}")))
}

fn day_start(date: NaiveDate) -> DateTime<Utc> {
  date.and_time(NaiveTime::MIN).and_utc()
}

// ─── Delete ──────────────────────────────────────────────────────────────────

/// Remove one activity. Teacher-only, and the caller must supervise the
/// owning child; an unparseable or unknown id is not-found.
pub async fn delete_activity<S: CareStore>(
  ctx: &RequestContext<S>,
  activity_ref: &str,
) -> Result<()> {
  require_role(&ctx.caller, Role::Teacher, "activity deletion")?;

  let id: RecordId = activity_ref.parse().map_err(|_| {
    Error::NotFound(format!("activity {activity_ref} not found"))
  })?;
  let activity = ctx
    .store
    .get_activity(id)
    .await
    .map_err(Error::store)?
    .ok_or_else(|| Error::NotFound(format!("activity {activity_ref} not found")))?;

  let identity = access::caller_id(&ctx.caller).ok_or_else(|| {
    access::denied(&ctx.caller, format!("activity {activity_ref}"))
  })?;
  let supervises = ctx
    .store
    .is_supervisor_of(identity, activity.child_id)
    .await
    .unwrap_or(false);
  if !supervises {
    tracing::warn!(
      identity = %ctx.caller.subject,
      role = %ctx.caller.role,
      resource = %activity_ref,
      "denied: not a supervisor of the activity's child",
    );
    return Err(access::denied(&ctx.caller, format!("activity {activity_ref}")));
  }

  let removed = ctx
    .store
    .delete_activity(id)
    .await
    .map_err(Error::store)?;
  if !removed {
    return Err(Error::NotFound(format!("activity {activity_ref} not found")));
  }
  tracing::info!(activity = %id, by = %ctx.caller.subject, "activity deleted");
  Ok(())
}
