//! Dispatch errors.

use wfdispatch_config::WorkflowId;
use wfdispatch_prompt::PromptError;
use wfdispatch_remote::RemoteError;
use wfdispatch_resolver::ResolveError;
use wfdispatch_workflow::{TriggerParseError, ValidationError};

/// Errors that end a dispatch invocation.
///
/// None of these are retried. Callers map each to an operator message and an
/// exit status.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
  /// Selector resolution failed. Match on the inner error to tell
  /// `SelectorRequired`, `AllCandidatesFiltered` and `SelectorNotFound` apart.
  #[error(transparent)]
  Resolve(ResolveError),

  #[error("unable to determine default branch for {repo}")]
  RevisionResolutionFailed {
    repo: String,
    #[source]
    source: RemoteError,
  },

  #[error("unable to fetch workflow file content for {path} at {revision}")]
  ContentRetrievalFailed {
    path: String,
    revision: String,
    #[source]
    source: RemoteError,
  },

  #[error("failed to decode workflow file {path} at {revision}: {message}")]
  ContentDecodeFailed {
    path: String,
    revision: String,
    message: String,
  },

  #[error("invalid workflow file {path}")]
  TriggerParse {
    path: String,
    #[source]
    source: TriggerParseError,
  },

  #[error("invalid inputs: {0}")]
  InputValidation(#[from] ValidationError),

  #[error("input prompt failed")]
  Prompt(#[source] PromptError),

  #[error("failed to create dispatch event for workflow {workflow_id}")]
  DispatchSubmissionFailed {
    workflow_id: WorkflowId,
    #[source]
    source: RemoteError,
  },

  /// The operator interrupted the run. Nothing was submitted.
  #[error("cancelled")]
  Cancelled,
}

impl From<ResolveError> for DispatchError {
  fn from(err: ResolveError) -> Self {
    match err {
      ResolveError::Prompt(PromptError::Interrupted) => Self::Cancelled,
      other => Self::Resolve(other),
    }
  }
}

impl From<PromptError> for DispatchError {
  fn from(err: PromptError) -> Self {
    match err {
      PromptError::Interrupted => Self::Cancelled,
      other => Self::Prompt(other),
    }
  }
}

impl DispatchError {
  /// The remote error behind this failure, if any.
  pub fn remote_source(&self) -> Option<&RemoteError> {
    match self {
      Self::Resolve(ResolveError::Catalog(source))
      | Self::RevisionResolutionFailed { source, .. }
      | Self::ContentRetrievalFailed { source, .. }
      | Self::DispatchSubmissionFailed { source, .. } => Some(source),
      _ => None,
    }
  }
}
