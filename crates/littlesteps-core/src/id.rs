//! `RecordId` — the store's internal reference for an entity.
//!
//! Internally a 12-byte value; exchanged with callers only as the canonical
//! 24-hex-character string. Generated ids lead with the unix timestamp so
//! freshly created records sort roughly by creation time.

use std::{fmt, str::FromStr};

use chrono::Utc;
use rand_core::{OsRng, RngCore as _};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use thiserror::Error;

/// A string that did not parse as a 24-hex-character record id.
#[derive(Debug, Error)]
#[error("invalid record id: {0:?}")]
pub struct InvalidRecordId(pub String);

/// Opaque 12-byte entity reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId([u8; 12]);

impl RecordId {
  /// Generate a fresh id: 4 big-endian bytes of unix seconds followed by
  /// 8 random bytes.
  pub fn generate() -> Self {
    let mut bytes = [0u8; 12];
    let secs = Utc::now().timestamp().max(0) as u32;
    bytes[..4].copy_from_slice(&secs.to_be_bytes());
    OsRng.fill_bytes(&mut bytes[4..]);
    Self(bytes)
  }

  pub const fn from_bytes(bytes: [u8; 12]) -> Self { Self(bytes) }

  pub const fn as_bytes(&self) -> &[u8; 12] { &self.0 }
}

impl fmt::Display for RecordId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&hex::encode(self.0))
  }
}

impl FromStr for RecordId {
  type Err = InvalidRecordId;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    if s.len() != 24 {
      return Err(InvalidRecordId(s.to_owned()));
    }
    let raw = hex::decode(s).map_err(|_| InvalidRecordId(s.to_owned()))?;
    let mut bytes = [0u8; 12];
    bytes.copy_from_slice(&raw);
    Ok(Self(bytes))
  }
}

// Ids cross the serde boundary only in the 24-hex exchange form.

impl Serialize for RecordId {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(self)
  }
}

impl<'de> Deserialize<'de> for RecordId {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let s = String::deserialize(deserializer)?;
    s.parse().map_err(de::Error::custom)
  }
}
