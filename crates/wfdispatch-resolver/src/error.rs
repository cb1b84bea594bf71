use thiserror::Error;
use wfdispatch_config::WorkflowState;
use wfdispatch_prompt::PromptError;
use wfdispatch_remote::RemoteError;

/// Errors that can occur while resolving a selector.
#[derive(Debug, Error)]
pub enum ResolveError {
  /// No selector and prompting is not possible.
  #[error("workflow ID, name or file name required when not running interactively")]
  SelectorRequired,

  /// The catalog had no entries left after applying the state filter.
  #[error("no workflows in states {states:?}")]
  AllCandidatesFiltered { states: Vec<WorkflowState> },

  /// Candidates exist but none matched.
  #[error("could not find any workflow named {selector:?}")]
  SelectorNotFound { selector: String },

  /// Listing the catalog failed.
  #[error("failed to list workflows")]
  Catalog(#[source] RemoteError),

  /// Interactive selection failed or was interrupted.
  #[error("workflow selection failed")]
  Prompt(#[from] PromptError),
}
