//! Error type for `littlesteps-store-sqlite`.
//!
//! Raw `rusqlite` faults never cross the [`CareStore`] boundary untyped —
//! they are wrapped here and reclassified into the shared taxonomy by the
//! operations layer.
//!
//! [`CareStore`]: littlesteps_core::store::CareStore

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("corrupt record id in store: {0}")]
  Id(#[from] littlesteps_core::id::InvalidRecordId),

  #[error("date/time parse error: {0}")]
  DateParse(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
