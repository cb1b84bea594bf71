//! Wfdispatch Remote
//!
//! Capability traits for the collaborators that live on the remote service.
//! The core never talks HTTP directly; it is handed implementations of these
//! traits. `wfdispatch-host-http` provides the REST-backed ones, tests provide
//! in-memory fakes.
//!
//! ```text
//! WorkflowCatalog   list(repo, states)                -> Vec<WorkflowDefinition>
//! BranchResolver    default_branch(repo)              -> String
//! ContentStore      get_file(repo, path, ref)         -> Vec<u8> (decoded)
//! DispatchEndpoint  create_dispatch_event(repo, req)  -> ()
//! ```

mod error;
mod request;

pub use error::RemoteError;
pub use request::DispatchRequest;

use async_trait::async_trait;
use wfdispatch_config::{RepoRef, RevisionRef, WorkflowDefinition, WorkflowState};

/// Lists the workflow definitions of a repository.
#[async_trait]
pub trait WorkflowCatalog: Send + Sync {
  /// Return every definition whose state is in `states`, in the service's
  /// canonical order. An empty `states` slice means no filtering.
  async fn list(
    &self,
    repo: &RepoRef,
    states: &[WorkflowState],
  ) -> Result<Vec<WorkflowDefinition>, RemoteError>;
}

/// Looks up a repository's default branch.
#[async_trait]
pub trait BranchResolver: Send + Sync {
  async fn default_branch(&self, repo: &RepoRef) -> Result<String, RemoteError>;
}

/// Reads file content at a revision.
///
/// Implementations undo any transport encoding and hand back raw bytes. A
/// payload that cannot be decoded is reported as [`RemoteError::Decode`].
#[async_trait]
pub trait ContentStore: Send + Sync {
  async fn get_file(
    &self,
    repo: &RepoRef,
    path: &str,
    revision: &RevisionRef,
  ) -> Result<Vec<u8>, RemoteError>;
}

/// Creates dispatch events.
///
/// This is a non-idempotent remote mutation. Implementations must not retry.
#[async_trait]
pub trait DispatchEndpoint: Send + Sync {
  async fn create_dispatch_event(
    &self,
    repo: &RepoRef,
    request: DispatchRequest,
  ) -> Result<(), RemoteError>;
}

/// Keep only the definitions whose state is allowed by `states`.
///
/// Shared by catalog implementations that filter client side.
pub fn filter_by_state(
  workflows: Vec<WorkflowDefinition>,
  states: &[WorkflowState],
) -> Vec<WorkflowDefinition> {
  if states.is_empty() {
    return workflows;
  }
  workflows
    .into_iter()
    .filter(|w| states.contains(&w.state))
    .collect()
}
