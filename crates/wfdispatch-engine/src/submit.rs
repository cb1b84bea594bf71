//! Dispatch submission.

use indexmap::IndexMap;
use tracing::info;

use wfdispatch_config::{RepoRef, RevisionRef, WorkflowId};
use wfdispatch_remote::{DispatchEndpoint, DispatchRequest};

use crate::error::DispatchError;

/// Build a [`DispatchRequest`] and submit it exactly once.
///
/// A non-success response is terminal. There is no retry: the remote side is
/// not idempotent and a second attempt could start a second run.
pub async fn submit(
  endpoint: &dyn DispatchEndpoint,
  repo: &RepoRef,
  workflow_id: WorkflowId,
  revision: &RevisionRef,
  inputs: IndexMap<String, String>,
) -> Result<(), DispatchError> {
  let request = DispatchRequest {
    workflow_id,
    revision: revision.clone(),
    inputs,
  };

  endpoint
    .create_dispatch_event(repo, request)
    .await
    .map_err(|source| DispatchError::DispatchSubmissionFailed {
      workflow_id,
      source,
    })?;

  info!(repo = %repo, workflow_id, revision = %revision, "created dispatch event");
  Ok(())
}
