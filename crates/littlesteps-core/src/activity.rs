//! Activity — a timestamped care event tied to one child.
//!
//! Activities are created by supervisors and never edited in place; the only
//! mutation is individual deletion. `created_at` is immutable once set.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result, id::RecordId};

/// Activity type tag requiring a non-empty `details.image_url`.
///
/// The tag set is open — "meal", "sleep", "behavior" and friends carry no
/// extra shape rules.
pub const KIND_DRAWING: &str = "drawing";

/// An activity record as persisted and exchanged with callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
  #[serde(rename = "_id")]
  pub id:         RecordId,
  pub child_id:   RecordId,
  #[serde(rename = "type")]
  pub kind:       String,
  pub details:    serde_json::Value,
  pub logged_by:  RecordId,
  pub created_at: DateTime<Utc>,
}

/// Input for activity creation. `child_id` and `logged_by` are already
/// resolved references; `created_at` is assigned at insertion when `None`.
#[derive(Debug, Clone)]
pub struct NewActivity {
  pub child_id:   RecordId,
  pub kind:       String,
  pub details:    serde_json::Value,
  pub logged_by:  RecordId,
  pub created_at: Option<DateTime<Utc>>,
}

impl NewActivity {
  /// Shape rules shared by the operations layer and the store:
  /// `details` must be a structured record, and drawings must carry a
  /// non-empty `image_url` inside it.
  pub fn validate(&self) -> Result<()> {
    if self.kind.is_empty() {
      return Err(Error::Validation("activity type must not be empty".into()));
    }
    let details = self
      .details
      .as_object()
      .ok_or_else(|| Error::Validation("details must be an object".into()))?;

    if self.kind == KIND_DRAWING {
      let has_url = details
        .get("image_url")
        .and_then(|v| v.as_str())
        .is_some_and(|s| !s.is_empty());
      if !has_url {
        return Err(Error::Validation(
          "drawing activities require a non-empty details.image_url".into(),
        ));
      }
    }
    Ok(())
  }
}
