//! The five-kind error taxonomy shared by every layer of the service.
//!
//! Every failure crossing a component boundary is one of these kinds, so the
//! HTTP layer can map them to status codes mechanically. Backend faults are
//! reclassified into [`Error::Store`] before they leave the store layer;
//! nothing below `rusqlite` ever reaches a caller raw.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// Credential missing, malformed, expired, wrong type, or badly signed.
  #[error("unauthorized: {0}")]
  Unauthorized(String),

  /// Credential valid, but the identity/role fails the access rule for the
  /// requested resource. Carries enough context to audit denied attempts.
  #[error("forbidden: {identity} (role {role}) denied on {resource}")]
  Forbidden {
    identity: String,
    role:     String,
    resource: String,
  },

  /// Caller-supplied data fails shape or required-field rules.
  #[error("validation failed: {0}")]
  Validation(String),

  /// A referenced entity does not exist (or its id does not parse into a
  /// valid reference — the two cases are deliberately collapsed).
  #[error("not found: {0}")]
  NotFound(String),

  /// The backing store is unreachable or an operation failed. The original
  /// cause is attached for diagnostics; never retried here.
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Wrap an arbitrary backend fault as a [`Error::Store`].
  pub fn store(cause: impl std::error::Error + Send + Sync + 'static) -> Self {
    Error::Store(Box::new(cause))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
