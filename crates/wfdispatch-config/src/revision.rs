use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// A concrete branch, tag or commit-ish.
///
/// Only non-empty values can be constructed, so holding a `RevisionRef` means
/// the "use the default branch" case has already been resolved. The value is
/// never mutated afterwards; retrieval and dispatch receive the same one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RevisionRef(String);

impl RevisionRef {
  pub fn new(value: impl Into<String>) -> Result<Self, ConfigError> {
    let value = value.into();
    if value.trim().is_empty() {
      return Err(ConfigError::EmptyRevision);
    }
    Ok(Self(value))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl TryFrom<String> for RevisionRef {
  type Error = ConfigError;

  fn try_from(value: String) -> Result<Self, Self::Error> {
    Self::new(value)
  }
}

impl From<RevisionRef> for String {
  fn from(value: RevisionRef) -> Self {
    value.0
  }
}

impl fmt::Display for RevisionRef {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}
