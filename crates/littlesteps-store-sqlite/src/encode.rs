//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as fixed-width RFC 3339 UTC strings (microsecond
//! precision, `Z` suffix) so lexicographic comparison in SQL matches
//! chronological order — the range filters and the `ORDER BY created_at
//! DESC` in `store.rs` rely on this. Id sets are stored as compact JSON
//! arrays of the 24-hex exchange form.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use littlesteps_core::{
  DATE_FORMAT, RecordId,
  activity::Activity,
  child::{Child, ChildSummary},
};

use crate::{Error, Result};

// ─── RecordId ────────────────────────────────────────────────────────────────

pub fn encode_id(id: RecordId) -> String { id.to_string() }

pub fn decode_id(s: &str) -> Result<RecordId> { Ok(s.parse()?) }

pub fn encode_ids(ids: &[RecordId]) -> Result<String> {
  let strings: Vec<String> = ids.iter().map(|id| id.to_string()).collect();
  Ok(serde_json::to_string(&strings)?)
}

pub fn decode_ids(s: &str) -> Result<Vec<RecordId>> {
  let strings: Vec<String> = serde_json::from_str(s)?;
  strings.iter().map(|s| decode_id(s)).collect()
}

// ─── Timestamps ──────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

pub fn encode_date(d: NaiveDate) -> String {
  d.format(DATE_FORMAT).to_string()
}

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, DATE_FORMAT)
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `children` row.
pub struct RawChild {
  pub child_id:       String,
  pub name:           String,
  pub birthday:       String,
  pub group_label:    Option<String>,
  pub allergies:      String,
  pub notes:          String,
  pub parent_ids:     String,
  pub supervisor_ids: String,
  pub created_at:     String,
}

impl RawChild {
  pub fn into_child(self) -> Result<Child> {
    Ok(Child {
      id:             decode_id(&self.child_id)?,
      name:           self.name,
      birthday:       decode_date(&self.birthday)?,
      group:          self.group_label,
      allergies:      serde_json::from_str(&self.allergies)?,
      notes:          self.notes,
      parent_ids:     decode_ids(&self.parent_ids)?,
      supervisor_ids: decode_ids(&self.supervisor_ids)?,
      created_at:     decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from an `activities` row.
pub struct RawActivity {
  pub activity_id: String,
  pub child_id:    String,
  pub kind:        String,
  pub details:     String,
  pub logged_by:   String,
  pub created_at:  String,
}

impl RawActivity {
  pub fn into_activity(self) -> Result<Activity> {
    Ok(Activity {
      id:         decode_id(&self.activity_id)?,
      child_id:   decode_id(&self.child_id)?,
      kind:       self.kind,
      details:    serde_json::from_str(&self.details)?,
      logged_by:  decode_id(&self.logged_by)?,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings for the `{_id, name}` listing projection.
pub struct RawSummary {
  pub child_id: String,
  pub name:     String,
}

impl RawSummary {
  pub fn into_summary(self) -> Result<ChildSummary> {
    Ok(ChildSummary {
      id:   decode_id(&self.child_id)?,
      name: self.name,
    })
  }
}
