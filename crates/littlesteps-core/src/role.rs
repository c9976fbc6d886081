//! Caller roles asserted by a validated credential.

use std::fmt;

/// Coarse-grained caller category carried in the credential.
///
/// The credential validator only requires the claim to be non-empty; roles
/// outside the two known ones are preserved verbatim and denied by the
/// authorization rules rather than rejected at validation time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Role {
  Parent,
  /// A staff member with care-taking visibility ("supervisor").
  Teacher,
  Other(String),
}

impl Role {
  pub fn parse(s: &str) -> Self {
    match s {
      "parent" => Role::Parent,
      "teacher" => Role::Teacher,
      other => Role::Other(other.to_owned()),
    }
  }

  pub fn as_str(&self) -> &str {
    match self {
      Role::Parent => "parent",
      Role::Teacher => "teacher",
      Role::Other(s) => s,
    }
  }
}

impl fmt::Display for Role {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}
