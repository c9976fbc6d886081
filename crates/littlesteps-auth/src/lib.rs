//! Credential Validator — bearer-token verification.
//!
//! Verifies HS256-signed access tokens against the secret shared with the
//! identity-issuing service and extracts the caller's identity and role.
//! Pure verification: no I/O, no external state. Every failure mode here is
//! `Unauthorized`-class at the service boundary.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD as B64;
use chrono::Utc;
use hmac::{Hmac, Mac};
use littlesteps_core::Role;
use serde::Deserialize;
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

// ─── Errors ──────────────────────────────────────────────────────────────────

/// A rejected credential. Each variant is a distinct reason, but all map to
/// the same `Unauthorized` kind at the service boundary.
#[derive(Debug, Error)]
pub enum AuthError {
  #[error("missing or malformed bearer credential")]
  MissingBearer,

  #[error("malformed token: {0}")]
  Malformed(String),

  #[error("unsupported signing algorithm: {0:?}")]
  UnsupportedAlgorithm(String),

  #[error("signature mismatch")]
  InvalidSignature,

  #[error("access token has expired")]
  Expired,

  #[error("invalid token type (expected access)")]
  WrongTokenType,

  #[error("token payload missing {0}")]
  MissingClaim(&'static str),
}

// ─── Caller ──────────────────────────────────────────────────────────────────

/// The authenticated subject asserted by a validated credential.
#[derive(Debug, Clone)]
pub struct Caller {
  /// Opaque identity string from the `sub` claim; resolved into a record
  /// reference only where an operation needs one.
  pub subject: String,
  pub role:    Role,
}

// ─── Wire shapes ─────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct Header {
  alg: String,
}

#[derive(Deserialize)]
struct Claims {
  sub:        Option<String>,
  role:       Option<String>,
  #[serde(rename = "type")]
  token_type: Option<String>,
  exp:        Option<i64>,
}

// ─── Validation ──────────────────────────────────────────────────────────────

/// Validate an `Authorization` header value. The value must carry the
/// `Bearer ` prefix; everything after it is the token.
pub fn validate_bearer(header_value: &str, secret: &[u8]) -> Result<Caller, AuthError> {
  let token = header_value
    .strip_prefix("Bearer ")
    .ok_or(AuthError::MissingBearer)?;
  validate_token(token, secret)
}

/// Validate a raw token string: structure, algorithm, signature, expiry,
/// token type, and the `sub`/`role` claims, in that order.
pub fn validate_token(token: &str, secret: &[u8]) -> Result<Caller, AuthError> {
  let mut segments = token.split('.');
  let (Some(header_b64), Some(payload_b64), Some(sig_b64), None) = (
    segments.next(),
    segments.next(),
    segments.next(),
    segments.next(),
  ) else {
    return Err(AuthError::Malformed("expected three segments".into()));
  };

  let header_raw = B64
    .decode(header_b64)
    .map_err(|e| AuthError::Malformed(e.to_string()))?;
  let header: Header = serde_json::from_slice(&header_raw)
    .map_err(|e| AuthError::Malformed(e.to_string()))?;
  if header.alg != "HS256" {
    return Err(AuthError::UnsupportedAlgorithm(header.alg));
  }

  // Signature covers `header.payload`; compared in constant time.
  let signature = B64
    .decode(sig_b64)
    .map_err(|e| AuthError::Malformed(e.to_string()))?;
  let mut mac = HmacSha256::new_from_slice(secret)
    .map_err(|_| AuthError::InvalidSignature)?;
  mac.update(header_b64.as_bytes());
  mac.update(b".");
  mac.update(payload_b64.as_bytes());
  mac
    .verify_slice(&signature)
    .map_err(|_| AuthError::InvalidSignature)?;

  let payload_raw = B64
    .decode(payload_b64)
    .map_err(|e| AuthError::Malformed(e.to_string()))?;
  let claims: Claims = serde_json::from_slice(&payload_raw)
    .map_err(|e| AuthError::Malformed(e.to_string()))?;

  let exp = claims.exp.ok_or(AuthError::MissingClaim("exp"))?;
  if exp <= Utc::now().timestamp() {
    return Err(AuthError::Expired);
  }

  // Refresh tokens are valid signatures but not valid here.
  match claims.token_type.as_deref() {
    Some("access") => {}
    _ => return Err(AuthError::WrongTokenType),
  }

  let subject = claims
    .sub
    .filter(|s| !s.is_empty())
    .ok_or(AuthError::MissingClaim("sub"))?;
  let role = claims
    .role
    .filter(|s| !s.is_empty())
    .ok_or(AuthError::MissingClaim("role"))?;

  Ok(Caller {
    subject,
    role: Role::parse(&role),
  })
}

// ─── Tests ───────────────────────────────────────────────────────────────────
