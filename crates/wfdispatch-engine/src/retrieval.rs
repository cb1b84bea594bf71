//! Definition retrieval.

use tracing::{debug, info};

use wfdispatch_config::{RepoRef, RevisionRef, WorkflowDefinition};
use wfdispatch_remote::{BranchResolver, ContentStore, RemoteError};

use crate::error::DispatchError;

/// Turn the operator's `--ref` into a concrete revision.
///
/// An absent or blank request falls back to the repository's default branch.
/// Call this once per invocation and pass the result to both
/// [`fetch_source`] and [`submit`](crate::submit).
pub async fn resolve_revision(
  branches: &dyn BranchResolver,
  repo: &RepoRef,
  requested: Option<&str>,
) -> Result<RevisionRef, DispatchError> {
  if let Some(revision) = requested.and_then(|r| RevisionRef::new(r).ok()) {
    return Ok(revision);
  }

  let failed = |source| DispatchError::RevisionResolutionFailed {
    repo: repo.full_name(),
    source,
  };

  let branch = branches.default_branch(repo).await.map_err(failed)?;
  let revision = RevisionRef::new(branch).map_err(|e| {
    failed(RemoteError::InvalidResponse {
      message: e.to_string(),
    })
  })?;

  info!(repo = %repo, revision = %revision, "using default branch");
  Ok(revision)
}

/// Fetch and decode the source text of `workflow` at `revision`.
///
/// Retrieval failures and decode failures are reported separately, both
/// naming the path and revision.
pub async fn fetch_source(
  store: &dyn ContentStore,
  repo: &RepoRef,
  workflow: &WorkflowDefinition,
  revision: &RevisionRef,
) -> Result<String, DispatchError> {
  let bytes = match store.get_file(repo, &workflow.path, revision).await {
    Ok(bytes) => bytes,
    Err(RemoteError::Decode { message }) => {
      return Err(DispatchError::ContentDecodeFailed {
        path: workflow.path.clone(),
        revision: revision.to_string(),
        message,
      });
    }
    Err(source) => {
      return Err(DispatchError::ContentRetrievalFailed {
        path: workflow.path.clone(),
        revision: revision.to_string(),
        source,
      });
    }
  };

  let source = String::from_utf8(bytes).map_err(|e| DispatchError::ContentDecodeFailed {
    path: workflow.path.clone(),
    revision: revision.to_string(),
    message: format!("not valid UTF-8: {}", e),
  })?;

  debug!(path = %workflow.path, revision = %revision, bytes = source.len(), "fetched workflow source");
  Ok(source)
}
