use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable numeric identifier of a workflow definition.
pub type WorkflowId = u64;

/// Lifecycle state of a workflow definition as reported by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowState {
  Active,
  DeletedFromRepo,
  Disabled,
  Unknown,
}

impl WorkflowState {
  /// Map the remote service's state string.
  ///
  /// The service reports several flavours of disabled
  /// (`disabled_manually`, `disabled_inactivity`, `disabled_fork`); they
  /// collapse into `Disabled`.
  pub fn from_api(value: &str) -> Self {
    match value {
      "active" => Self::Active,
      "deleted" => Self::DeletedFromRepo,
      v if v.starts_with("disabled") => Self::Disabled,
      _ => Self::Unknown,
    }
  }
}

impl fmt::Display for WorkflowState {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let s = match self {
      Self::Active => "active",
      Self::DeletedFromRepo => "deleted",
      Self::Disabled => "disabled",
      Self::Unknown => "unknown",
    };
    f.write_str(s)
  }
}

/// One automation pipeline definition in a repository's catalog.
///
/// `id` is unique per repository. `name` is not: two definitions may share a
/// display name and must then be told apart by path or id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowDefinition {
  pub id: WorkflowId,
  pub name: String,
  /// Repository-relative path of the definition source,
  /// e.g. `.github/workflows/deploy.yml`.
  pub path: String,
  pub state: WorkflowState,
}

impl WorkflowDefinition {
  /// Final path segment, e.g. `deploy.yml`.
  pub fn file_name(&self) -> &str {
    self.path.rsplit('/').next().unwrap_or(&self.path)
  }
}
