//! The dispatch pipeline.

use std::future::Future;
use std::sync::Arc;

use indexmap::IndexMap;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use wfdispatch_config::{RepoRef, RevisionRef, WorkflowDefinition, WorkflowState};
use wfdispatch_prompt::Prompter;
use wfdispatch_remote::{BranchResolver, ContentStore, DispatchEndpoint, WorkflowCatalog};
use wfdispatch_resolver::{Resolver, StandardResolver};
use wfdispatch_workflow::{ParsedTrigger, build_input_form, parse_trigger_schema, validate};

use crate::error::DispatchError;
use crate::inputs::prompt_inputs;
use crate::retrieval::{fetch_source, resolve_revision};
use crate::submit::submit;

/// What one invocation should do.
#[derive(Debug, Clone)]
pub struct DispatchOptions {
  pub repo: RepoRef,
  /// Workflow id, path, file name or display name. Empty means "ask".
  pub selector: String,
  /// Branch, tag or commit-ish. `None` means the default branch.
  pub revision: Option<String>,
  /// Whether the operator can be prompted.
  pub interactive: bool,
  /// Input values supplied up front. When empty and `interactive` is set,
  /// the inputs are prompted for instead.
  pub inputs: IndexMap<String, String>,
  /// Catalog states a workflow must be in to be selectable.
  pub states: Vec<WorkflowState>,
}

impl DispatchOptions {
  pub fn new(repo: RepoRef, selector: impl Into<String>) -> Self {
    Self {
      repo,
      selector: selector.into(),
      revision: None,
      interactive: false,
      inputs: IndexMap::new(),
      states: vec![WorkflowState::Active],
    }
  }
}

/// How an invocation ended when nothing went wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
  /// A dispatch event was accepted by the remote service.
  Dispatched {
    workflow: WorkflowDefinition,
    revision: RevisionRef,
    inputs: IndexMap<String, String>,
  },
  /// The workflow has no manual dispatch trigger. Nothing was submitted.
  NotDispatchable {
    workflow: WorkflowDefinition,
    revision: RevisionRef,
  },
}

/// Runs dispatch invocations against a set of remote collaborators.
///
/// Holds no per-invocation state; every `run` starts from scratch.
pub struct DispatchRunner {
  resolver: Arc<dyn Resolver>,
  branches: Arc<dyn BranchResolver>,
  content: Arc<dyn ContentStore>,
  endpoint: Arc<dyn DispatchEndpoint>,
  prompter: Arc<dyn Prompter>,
}

impl DispatchRunner {
  pub fn new(
    resolver: Arc<dyn Resolver>,
    branches: Arc<dyn BranchResolver>,
    content: Arc<dyn ContentStore>,
    endpoint: Arc<dyn DispatchEndpoint>,
    prompter: Arc<dyn Prompter>,
  ) -> Self {
    Self {
      resolver,
      branches,
      content,
      endpoint,
      prompter,
    }
  }

  /// Wire a runner to one client that provides every remote capability.
  pub fn with_remote<R>(remote: Arc<R>, prompter: Arc<dyn Prompter>) -> Self
  where
    R: WorkflowCatalog + BranchResolver + ContentStore + DispatchEndpoint + 'static,
  {
    let resolver = Arc::new(StandardResolver::new(remote.clone(), prompter.clone()));
    Self::new(resolver, remote.clone(), remote.clone(), remote, prompter)
  }

  /// Run one invocation.
  ///
  /// Cancelling `cancel` at any point before submission aborts the run with
  /// [`DispatchError::Cancelled`] and nothing is sent.
  pub async fn run(
    &self,
    options: DispatchOptions,
    cancel: CancellationToken,
  ) -> Result<DispatchOutcome, DispatchError> {
    let repo = &options.repo;

    let workflow = cancellable(
      &cancel,
      self
        .resolver
        .resolve(repo, &options.selector, options.interactive, &options.states),
    )
    .await?;
    debug!(?workflow, "selected workflow");

    let revision = cancellable(
      &cancel,
      resolve_revision(self.branches.as_ref(), repo, options.revision.as_deref()),
    )
    .await?;

    let source = cancellable(
      &cancel,
      fetch_source(self.content.as_ref(), repo, &workflow, &revision),
    )
    .await?;

    let schema = match parse_trigger_schema(&source) {
      Ok(ParsedTrigger::Manual(schema)) => schema,
      Ok(ParsedTrigger::NoManualTrigger) => {
        info!(path = %workflow.path, "workflow has no manual dispatch trigger");
        return Ok(DispatchOutcome::NotDispatchable { workflow, revision });
      }
      Err(source) => {
        return Err(DispatchError::TriggerParse {
          path: workflow.path.clone(),
          source,
        });
      }
    };

    let submitted = if options.inputs.is_empty() && options.interactive && !schema.is_empty() {
      let form = build_input_form(&schema);
      cancellable(&cancel, prompt_inputs(&form, self.prompter.as_ref())).await?
    } else {
      options.inputs
    };

    let inputs = validate(&schema, &submitted)?;

    // last point of no return; the submission itself is not raced
    if cancel.is_cancelled() {
      return Err(DispatchError::Cancelled);
    }

    submit(
      self.endpoint.as_ref(),
      repo,
      workflow.id,
      &revision,
      inputs.clone(),
    )
    .await?;

    Ok(DispatchOutcome::Dispatched {
      workflow,
      revision,
      inputs,
    })
  }
}

/// Race `future` against `cancel`.
async fn cancellable<T, E>(
  cancel: &CancellationToken,
  future: impl Future<Output = Result<T, E>>,
) -> Result<T, DispatchError>
where
  E: Into<DispatchError>,
{
  tokio::select! {
    biased;
    _ = cancel.cancelled() => Err(DispatchError::Cancelled),
    result = future => result.map_err(Into::into),
  }
}
