//! Authorization Engine — relationship-based access decisions.
//!
//! Parse failures and store lookup failures degrade to deny; denied
//! attempts are logged with identity, role, and resource so they can be
//! audited. Denial never reveals whether the resource exists.

use littlesteps_auth::Caller;
use littlesteps_core::{Error, RecordId, Result, Role, store::CareStore};

/// Build the `Forbidden` error for a denied attempt on `resource`.
pub(crate) fn denied(caller: &Caller, resource: impl Into<String>) -> Error {
  Error::Forbidden {
    identity: caller.subject.clone(),
    role:     caller.role.to_string(),
    resource: resource.into(),
  }
}

/// Require an exact role; any other role is a denial.
pub(crate) fn require_role(
  caller: &Caller,
  role: Role,
  resource: &str,
) -> Result<()> {
  if caller.role != role {
    tracing::warn!(
      identity = %caller.subject,
      role = %caller.role,
      resource,
      "denied: role not permitted",
    );
    return Err(denied(caller, resource));
  }
  Ok(())
}

/// The caller's identity as a record reference. `None` when the subject
/// claim is not a well-formed id; callers treat that as a denial.
pub(crate) fn caller_id(caller: &Caller) -> Option<RecordId> {
  match caller.subject.parse() {
    Ok(id) => Some(id),
    Err(_) => {
      tracing::warn!(
        identity = %caller.subject,
        "caller subject is not a well-formed record reference",
      );
      None
    }
  }
}

/// Whether `caller` may access the child referenced by `child_ref`.
///
/// Parents are checked against `parent_ids`, teachers against
/// `supervisor_ids`; every other role, unparseable reference, or store
/// fault is a deny.
pub async fn can_access_child<S: CareStore>(
  store: &S,
  caller: &Caller,
  child_ref: &str,
) -> bool {
  let Ok(child) = child_ref.parse::<RecordId>() else {
    tracing::warn!(
      identity = %caller.subject,
      resource = child_ref,
      "denied: unparseable child reference",
    );
    return false;
  };
  let Some(identity) = caller_id(caller) else {
    return false;
  };

  let membership = match caller.role {
    Role::Parent => store.is_parent_of(identity, child).await,
    Role::Teacher => store.is_supervisor_of(identity, child).await,
    Role::Other(_) => Ok(false),
  };

  match membership {
    Ok(allowed) => allowed,
    Err(e) => {
      tracing::warn!(
        identity = %caller.subject,
        role = %caller.role,
        resource = child_ref,
        error = %e,
        "denied: relationship lookup failed",
      );
      false
    }
  }
}

/// As [`can_access_child`], but turns a deny into the audit-carrying
/// `Forbidden` error and hands back the parsed child id on allow.
pub(crate) async fn require_child_access<S: CareStore>(
  store: &S,
  caller: &Caller,
  child_ref: &str,
) -> Result<RecordId> {
  if !can_access_child(store, caller, child_ref).await {
    tracing::warn!(
      identity = %caller.subject,
      role = %caller.role,
      resource = child_ref,
      "denied: no qualifying relationship",
    );
    return Err(denied(caller, format!("child {child_ref}")));
  }
  // Access was granted, so the reference parsed.
  child_ref
    .parse()
    .map_err(|_| denied(caller, format!("child {child_ref}")))
}
