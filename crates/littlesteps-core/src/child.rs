//! Child — a care subject with guardianship and supervision links.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::id::RecordId;

/// A child record as persisted and exchanged with callers.
///
/// `parent_ids` and `supervisor_ids` have set semantics: no duplicates, and
/// a child always has at least one parent after creation. Ids serialize in
/// their 24-hex exchange form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Child {
  #[serde(rename = "_id")]
  pub id:             RecordId,
  pub name:           String,
  pub birthday:       NaiveDate,
  pub group:          Option<String>,
  pub allergies:      Vec<String>,
  pub notes:          String,
  pub parent_ids:     Vec<RecordId>,
  pub supervisor_ids: Vec<RecordId>,
  pub created_at:     DateTime<Utc>,
}

/// Validated input for child creation. The initial parent is supplied
/// separately — it comes from the authenticated caller, not the payload.
#[derive(Debug, Clone)]
pub struct NewChild {
  pub name:      String,
  pub birthday:  NaiveDate,
  pub group:     Option<String>,
  pub allergies: Vec<String>,
  pub notes:     String,
}

/// Minimal projection returned by the per-caller listing queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChildSummary {
  #[serde(rename = "_id")]
  pub id:   RecordId,
  pub name: String,
}
