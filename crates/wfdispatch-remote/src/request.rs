use indexmap::IndexMap;
use serde::Serialize;
use wfdispatch_config::{RevisionRef, WorkflowId};

/// Payload that starts a manually-triggered workflow run.
///
/// Built once from validated inputs and moved into
/// [`DispatchEndpoint::create_dispatch_event`](crate::DispatchEndpoint), so a
/// request can be submitted at most once.
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct DispatchRequest {
  /// Addressed through the url path, not the body.
  #[serde(skip)]
  pub workflow_id: WorkflowId,

  #[serde(rename = "ref")]
  pub revision: RevisionRef,

  /// Input values in declaration order.
  pub inputs: IndexMap<String, String>,
}
