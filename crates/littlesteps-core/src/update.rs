//! `ChildUpdate` — the closed set of fields a child update may touch.
//!
//! The update payload arrives as free-form JSON; only the allow-listed keys
//! are lifted into this struct and everything else is silently dropped.
//! Malformed values for an allowed key are a validation failure, not a drop.

use chrono::NaiveDate;
use serde_json::Value;

use crate::{DATE_FORMAT, Error, Result};

/// Partial update for a child record. `None` means "leave unchanged".
#[derive(Debug, Clone, Default)]
pub struct ChildUpdate {
  pub name:      Option<String>,
  pub birthday:  Option<NaiveDate>,
  pub group:     Option<String>,
  pub allergies: Option<Vec<String>>,
  pub notes:     Option<String>,
}

impl ChildUpdate {
  /// Build an update from a caller-supplied JSON object, keeping only the
  /// allow-listed keys `{name, birthday, group, allergies, notes}`.
  pub fn from_payload(payload: &Value) -> Result<Self> {
    let map = payload
      .as_object()
      .ok_or_else(|| Error::Validation("update payload must be an object".into()))?;

    let mut update = ChildUpdate::default();

    if let Some(v) = map.get("name") {
      let name = require_str(v, "name")?;
      if name.is_empty() {
        return Err(Error::Validation("name must not be empty".into()));
      }
      update.name = Some(name.to_owned());
    }
    if let Some(v) = map.get("birthday") {
      let raw = require_str(v, "birthday")?;
      let date = NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map_err(|_| Error::Validation(format!("invalid birthday: {raw:?}")))?;
      update.birthday = Some(date);
    }
    if let Some(v) = map.get("group") {
      update.group = Some(require_str(v, "group")?.to_owned());
    }
    if let Some(v) = map.get("allergies") {
      let items = v
        .as_array()
        .ok_or_else(|| Error::Validation("allergies must be an array".into()))?;
      let allergies = items
        .iter()
        .map(|item| require_str(item, "allergies entry").map(str::to_owned))
        .collect::<Result<Vec<_>>>()?;
      update.allergies = Some(allergies);
    }
    if let Some(v) = map.get("notes") {
      update.notes = Some(require_str(v, "notes")?.to_owned());
    }

    Ok(update)
  }

  /// True when no allow-listed field is present — the store must not be
  /// contacted for such an update.
  pub fn is_empty(&self) -> bool {
    self.name.is_none()
      && self.birthday.is_none()
      && self.group.is_none()
      && self.allergies.is_none()
      && self.notes.is_none()
  }
}

fn require_str<'a>(v: &'a Value, field: &str) -> Result<&'a str> {
  v.as_str()
    .ok_or_else(|| Error::Validation(format!("{field} must be a string")))
}
