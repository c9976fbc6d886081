//! Child record operations.

use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;

use littlesteps_core::{
  DATE_FORMAT, Error, RecordId, Result, Role,
  child::{Child, ChildSummary, NewChild},
  store::CareStore,
  update::ChildUpdate,
};

use crate::{
  access::{self, require_child_access, require_role},
  context::RequestContext,
};

// ─── Create ──────────────────────────────────────────────────────────────────

/// Payload for child creation. The initial parent is the caller, never a
/// payload field.
#[derive(Debug, Deserialize)]
pub struct CreateChildRequest {
  pub name:     Option<String>,
  pub birthday: Option<String>,
  pub group:    Option<String>,
  #[serde(default)]
  pub allergies: Vec<String>,
  #[serde(default)]
  pub notes:    String,
}

/// Create a child with the calling parent as sole guardian.
pub async fn create_child<S: CareStore>(
  ctx: &RequestContext<S>,
  req: CreateChildRequest,
) -> Result<RecordId> {
  require_role(&ctx.caller, Role::Parent, "child creation")?;

  let name = req
    .name
    .filter(|n| !n.is_empty())
    .ok_or_else(|| Error::Validation("name is required".into()))?;
  let birthday = req
    .birthday
    .ok_or_else(|| Error::Validation("birthday is required".into()))?;
  let birthday = NaiveDate::parse_from_str(&birthday, DATE_FORMAT)
    .map_err(|_| Error::Validation(format!("invalid birthday: {birthday:?}")))?;
  let parent = ctx.caller.subject.parse().map_err(|_| {
    Error::Validation("caller subject is not a valid record reference".into())
  })?;

  let new = NewChild {
    name,
    birthday,
    group: req.group,
    allergies: req.allergies,
    notes: req.notes,
  };

  let id = ctx
    .store
    .create_child(new, parent)
    .await
    .map_err(Error::store)?;
  tracing::info!(child = %id, parent = %ctx.caller.subject, "child created");
  Ok(id)
}

// ─── Read ────────────────────────────────────────────────────────────────────

/// Fetch one child document; the caller must hold a qualifying relationship.
pub async fn get_child<S: CareStore>(
  ctx: &RequestContext<S>,
  child_ref: &str,
) -> Result<Child> {
  let id = require_child_access(&ctx.store, &ctx.caller, child_ref).await?;
  ctx
    .store
    .get_child(id)
    .await
    .map_err(Error::store)?
    .ok_or_else(|| Error::NotFound(format!("child {child_ref} not found")))
}

/// Children visible to the caller: guarded children for parents, supervised
/// children for teachers. Other roles see nothing, as a denial.
pub async fn list_children<S: CareStore>(
  ctx: &RequestContext<S>,
) -> Result<Vec<ChildSummary>> {
  let identity = access::caller_id(&ctx.caller)
    .ok_or_else(|| access::denied(&ctx.caller, "child listing"))?;

  match ctx.caller.role {
    Role::Parent => ctx.store.list_children_for_parent(identity).await,
    Role::Teacher => ctx.store.list_children_for_supervisor(identity).await,
    Role::Other(_) => {
      return Err(access::denied(&ctx.caller, "child listing"));
    }
  }
  .map_err(Error::store)
}

// ─── Update ──────────────────────────────────────────────────────────────────

/// Partial merge of the allow-listed fields `{name, birthday, group,
/// allergies, notes}`. Unknown keys are dropped; an update with none of the
/// allowed keys is a validation failure.
pub async fn update_child<S: CareStore>(
  ctx: &RequestContext<S>,
  child_ref: &str,
  payload: &Value,
) -> Result<()> {
  let id = require_child_access(&ctx.store, &ctx.caller, child_ref).await?;

  let update = ChildUpdate::from_payload(payload)?;
  if update.is_empty() {
    return Err(Error::Validation("no updatable fields in payload".into()));
  }

  let matched = ctx
    .store
    .update_child(id, update)
    .await
    .map_err(Error::store)?;
  if !matched {
    return Err(Error::NotFound(format!("child {child_ref} not found")));
  }
  tracing::info!(child = %id, by = %ctx.caller.subject, "child updated");
  Ok(())
}

// ─── Supervisor linking ──────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LinkSupervisorRequest {
  pub supervisor_id: Option<String>,
}

/// Idempotently add a supervisor to a child's supervision set. Teacher-only;
/// malformed references are validation failures, an unknown child is
/// not-found.
pub async fn link_supervisor<S: CareStore>(
  ctx: &RequestContext<S>,
  child_ref: &str,
  req: LinkSupervisorRequest,
) -> Result<()> {
  require_role(&ctx.caller, Role::Teacher, "supervisor linking")?;

  let child: RecordId = child_ref.parse().map_err(|_| {
    Error::Validation(format!("invalid child reference: {child_ref:?}"))
  })?;
  let supervisor_ref = req
    .supervisor_id
    .ok_or_else(|| Error::Validation("supervisor_id is required".into()))?;
  let supervisor: RecordId = supervisor_ref.parse().map_err(|_| {
    Error::Validation(format!("invalid supervisor reference: {supervisor_ref:?}"))
  })?;

  let existed = ctx
    .store
    .add_supervisor(child, supervisor)
    .await
    .map_err(Error::store)?;
  if !existed {
    return Err(Error::NotFound(format!("child {child_ref} not found")));
  }
  tracing::info!(child = %child, supervisor = %supervisor, "supervisor linked");
  Ok(())
}
