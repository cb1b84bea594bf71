//! End-to-end dispatch pipeline runs against in-memory collaborators.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use indexmap::IndexMap;
use tokio_util::sync::CancellationToken;

use wfdispatch_config::{RepoRef, RevisionRef, WorkflowDefinition, WorkflowState};
use wfdispatch_engine::{DispatchError, DispatchOptions, DispatchOutcome, DispatchRunner};
use wfdispatch_prompt::{Answer, Prompter, ScriptedPrompter};
use wfdispatch_remote::{
  BranchResolver, ContentStore, DispatchEndpoint, DispatchRequest, RemoteError, WorkflowCatalog,
  filter_by_state,
};
use wfdispatch_resolver::ResolveError;

const DEPLOY_SOURCE: &str = r#"
name: Deploy
on:
  workflow_dispatch:
    inputs:
      target:
        description: Environment to deploy to
        required: true
"#;

const PUSH_ONLY_SOURCE: &str = "name: CI\non: [push, pull_request]\n";

#[derive(Default)]
struct FakeRemote {
  workflows: Vec<WorkflowDefinition>,
  files: HashMap<(String, String), Result<Vec<u8>, String>>,
  default_branch: String,
  submit_error: Option<u16>,
  /// Delay applied to content reads, to leave room for a cancel.
  content_delay: Option<Duration>,
  list_calls: AtomicUsize,
  branch_calls: AtomicUsize,
  content_calls: AtomicUsize,
  dispatched: Mutex<Vec<Sent>>,
}

/// Fields of a dispatch request the fake received.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Sent {
  workflow_id: u64,
  revision: RevisionRef,
  inputs: IndexMap<String, String>,
}

impl FakeRemote {
  fn new() -> Self {
    Self {
      workflows: vec![
        wf(7, "CI", ".github/workflows/ci.yml"),
        wf(42, "Deploy", "deploy.yml"),
      ],
      default_branch: "main".to_string(),
      ..Self::default()
    }
    .with_file("deploy.yml", "main", DEPLOY_SOURCE)
    .with_file(".github/workflows/ci.yml", "main", PUSH_ONLY_SOURCE)
  }

  fn with_file(mut self, path: &str, revision: &str, source: &str) -> Self {
    self.files.insert(
      (path.to_string(), revision.to_string()),
      Ok(source.as_bytes().to_vec()),
    );
    self
  }

  fn with_bytes(mut self, path: &str, revision: &str, bytes: Result<Vec<u8>, String>) -> Self {
    self.files.insert((path.to_string(), revision.to_string()), bytes);
    self
  }

  fn dispatched(&self) -> Vec<Sent> {
    self.dispatched.lock().unwrap().clone()
  }
}

fn wf(id: u64, name: &str, path: &str) -> WorkflowDefinition {
  WorkflowDefinition {
    id,
    name: name.to_string(),
    path: path.to_string(),
    state: WorkflowState::Active,
  }
}

#[async_trait]
impl WorkflowCatalog for FakeRemote {
  async fn list(
    &self,
    _repo: &RepoRef,
    states: &[WorkflowState],
  ) -> Result<Vec<WorkflowDefinition>, RemoteError> {
    self.list_calls.fetch_add(1, Ordering::SeqCst);
    Ok(filter_by_state(self.workflows.clone(), states))
  }
}

#[async_trait]
impl BranchResolver for FakeRemote {
  async fn default_branch(&self, repo: &RepoRef) -> Result<String, RemoteError> {
    self.branch_calls.fetch_add(1, Ordering::SeqCst);
    if self.default_branch.is_empty() {
      return Err(RemoteError::NotFound {
        resource: repo.full_name(),
      });
    }
    Ok(self.default_branch.clone())
  }
}

#[async_trait]
impl ContentStore for FakeRemote {
  async fn get_file(
    &self,
    _repo: &RepoRef,
    path: &str,
    revision: &RevisionRef,
  ) -> Result<Vec<u8>, RemoteError> {
    self.content_calls.fetch_add(1, Ordering::SeqCst);
    if let Some(delay) = self.content_delay {
      tokio::time::sleep(delay).await;
    }
    match self.files.get(&(path.to_string(), revision.to_string())) {
      Some(Ok(bytes)) => Ok(bytes.clone()),
      Some(Err(message)) => Err(RemoteError::Decode {
        message: message.clone(),
      }),
      None => Err(RemoteError::NotFound {
        resource: format!("{} at {}", path, revision),
      }),
    }
  }
}

#[async_trait]
impl DispatchEndpoint for FakeRemote {
  async fn create_dispatch_event(
    &self,
    _repo: &RepoRef,
    request: DispatchRequest,
  ) -> Result<(), RemoteError> {
    self.dispatched.lock().unwrap().push(Sent {
      workflow_id: request.workflow_id,
      revision: request.revision,
      inputs: request.inputs,
    });
    match self.submit_error {
      Some(status) => Err(RemoteError::Status {
        status,
        message: "Unexpected inputs provided".to_string(),
      }),
      None => Ok(()),
    }
  }
}

fn repo() -> RepoRef {
  RepoRef::new("github.com", "octo", "widgets")
}

fn runner(remote: Arc<FakeRemote>, prompter: Arc<ScriptedPrompter>) -> DispatchRunner {
  let prompter: Arc<dyn Prompter> = prompter;
  DispatchRunner::with_remote(remote, prompter)
}

fn options(selector: &str, inputs: &[(&str, &str)]) -> DispatchOptions {
  let mut options = DispatchOptions::new(repo(), selector);
  options.inputs = inputs
    .iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();
  options
}

#[tokio::test]
async fn test_dispatch_by_file_name_on_default_branch() {
  let remote = Arc::new(FakeRemote::new());
  let runner = runner(remote.clone(), Arc::new(ScriptedPrompter::default()));

  let outcome = runner
    .run(options("deploy.yml", &[("target", "staging")]), CancellationToken::new())
    .await
    .unwrap();

  let mut expected_inputs = IndexMap::new();
  expected_inputs.insert("target".to_string(), "staging".to_string());

  assert_eq!(
    outcome,
    DispatchOutcome::Dispatched {
      workflow: wf(42, "Deploy", "deploy.yml"),
      revision: RevisionRef::new("main").unwrap(),
      inputs: expected_inputs.clone(),
    }
  );

  assert_eq!(
    remote.dispatched(),
    vec![Sent {
      workflow_id: 42,
      revision: RevisionRef::new("main").unwrap(),
      inputs: expected_inputs,
    }]
  );
}

#[tokio::test]
async fn test_default_branch_resolved_once() {
  let remote = Arc::new(FakeRemote::new());
  let runner = runner(remote.clone(), Arc::new(ScriptedPrompter::default()));

  runner
    .run(options("42", &[("target", "prod")]), CancellationToken::new())
    .await
    .unwrap();

  assert_eq!(remote.branch_calls.load(Ordering::SeqCst), 1);
  assert_eq!(remote.content_calls.load(Ordering::SeqCst), 1);
  assert_eq!(remote.dispatched()[0].revision.as_str(), "main");
}

#[tokio::test]
async fn test_explicit_ref_skips_default_branch_lookup() {
  let remote = Arc::new(FakeRemote::new().with_file("deploy.yml", "release/2.0", DEPLOY_SOURCE));
  let runner = runner(remote.clone(), Arc::new(ScriptedPrompter::default()));

  let mut opts = options("Deploy", &[("target", "prod")]);
  opts.revision = Some("release/2.0".to_string());
  runner.run(opts, CancellationToken::new()).await.unwrap();

  assert_eq!(remote.branch_calls.load(Ordering::SeqCst), 0);
  assert_eq!(remote.dispatched()[0].revision.as_str(), "release/2.0");
}

#[tokio::test]
async fn test_missing_selector_non_interactive_makes_no_calls() {
  let remote = Arc::new(FakeRemote::new());
  let runner = runner(remote.clone(), Arc::new(ScriptedPrompter::default()));

  let err = runner
    .run(options("", &[]), CancellationToken::new())
    .await
    .unwrap_err();

  assert!(matches!(
    err,
    DispatchError::Resolve(ResolveError::SelectorRequired)
  ));
  assert_eq!(remote.list_calls.load(Ordering::SeqCst), 0);
  assert!(remote.dispatched().is_empty());
}

#[tokio::test]
async fn test_all_filtered_is_distinct() {
  let remote = Arc::new(FakeRemote {
    workflows: vec![WorkflowDefinition {
      state: WorkflowState::Disabled,
      ..wf(42, "Deploy", "deploy.yml")
    }],
    ..FakeRemote::new()
  });
  let runner = runner(remote, Arc::new(ScriptedPrompter::default()));

  let err = runner
    .run(options("deploy.yml", &[]), CancellationToken::new())
    .await
    .unwrap_err();
  assert!(matches!(
    err,
    DispatchError::Resolve(ResolveError::AllCandidatesFiltered { .. })
  ));
}

#[tokio::test]
async fn test_no_manual_trigger_is_not_an_error() {
  let remote = Arc::new(FakeRemote::new());
  let runner = runner(remote.clone(), Arc::new(ScriptedPrompter::default()));

  let outcome = runner
    .run(options("ci.yml", &[]), CancellationToken::new())
    .await
    .unwrap();

  assert!(matches!(outcome, DispatchOutcome::NotDispatchable { ref workflow, .. } if workflow.id == 7));
  assert!(remote.dispatched().is_empty());
}

#[tokio::test]
async fn test_validation_failure_submits_nothing() {
  let remote = Arc::new(FakeRemote::new());
  let runner = runner(remote.clone(), Arc::new(ScriptedPrompter::default()));

  let err = runner
    .run(options("deploy.yml", &[("taget", "prod")]), CancellationToken::new())
    .await
    .unwrap_err();

  match err {
    DispatchError::InputValidation(e) => {
      let names: Vec<&str> = e.problems.iter().map(|p| p.name()).collect();
      assert_eq!(names, vec!["target", "taget"]);
    }
    other => panic!("expected validation error, got {:?}", other),
  }
  assert!(remote.dispatched().is_empty());
}

#[tokio::test]
async fn test_interactive_run_prompts_for_workflow_and_inputs() {
  let remote = Arc::new(FakeRemote::new());
  let prompter = Arc::new(ScriptedPrompter::new([
    Answer::Select(1),
    Answer::Input("qa".to_string()),
  ]));
  let runner = runner(remote.clone(), prompter.clone());

  let mut opts = options("", &[]);
  opts.interactive = true;
  runner.run(opts, CancellationToken::new()).await.unwrap();

  assert_eq!(prompter.calls(), 2);
  let sent = remote.dispatched();
  assert_eq!(sent[0].workflow_id, 42);
  assert_eq!(sent[0].inputs.get("target").map(String::as_str), Some("qa"));
}

#[tokio::test]
async fn test_interrupted_prompt_cancels_without_dispatch() {
  let remote = Arc::new(FakeRemote::new());
  let prompter = Arc::new(ScriptedPrompter::new([Answer::Interrupt]));
  let runner = runner(remote.clone(), prompter);

  let mut opts = options("deploy.yml", &[]);
  opts.interactive = true;
  let err = runner.run(opts, CancellationToken::new()).await.unwrap_err();

  assert!(matches!(err, DispatchError::Cancelled));
  assert!(remote.dispatched().is_empty());
}

#[tokio::test]
async fn test_cancel_during_fetch_never_dispatches() {
  let remote = Arc::new(FakeRemote {
    content_delay: Some(Duration::from_secs(5)),
    ..FakeRemote::new()
  });
  let runner = runner(remote.clone(), Arc::new(ScriptedPrompter::default()));

  let cancel = CancellationToken::new();
  let trigger = cancel.clone();
  tokio::spawn(async move {
    tokio::time::sleep(Duration::from_millis(20)).await;
    trigger.cancel();
  });

  let err = runner
    .run(options("deploy.yml", &[("target", "prod")]), cancel)
    .await
    .unwrap_err();

  assert!(matches!(err, DispatchError::Cancelled));
  assert!(remote.dispatched().is_empty());
}

#[tokio::test]
async fn test_already_cancelled_token_stops_immediately() {
  let remote = Arc::new(FakeRemote::new());
  let runner = runner(remote.clone(), Arc::new(ScriptedPrompter::default()));

  let cancel = CancellationToken::new();
  cancel.cancel();
  let err = runner
    .run(options("deploy.yml", &[("target", "prod")]), cancel)
    .await
    .unwrap_err();

  assert!(matches!(err, DispatchError::Cancelled));
  assert_eq!(remote.list_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_decode_failure_distinct_from_retrieval_failure() {
  let remote = Arc::new(
    FakeRemote::new().with_bytes("deploy.yml", "main", Err("invalid padding".to_string())),
  );
  let runner_a = runner(remote, Arc::new(ScriptedPrompter::default()));
  let err = runner_a
    .run(options("deploy.yml", &[]), CancellationToken::new())
    .await
    .unwrap_err();
  match err {
    DispatchError::ContentDecodeFailed { path, revision, .. } => {
      assert_eq!(path, "deploy.yml");
      assert_eq!(revision, "main");
    }
    other => panic!("expected decode failure, got {:?}", other),
  }

  let mut missing = FakeRemote::new();
  missing.files.clear();
  let runner_b = runner(Arc::new(missing), Arc::new(ScriptedPrompter::default()));
  let err = runner_b
    .run(options("deploy.yml", &[]), CancellationToken::new())
    .await
    .unwrap_err();
  assert!(matches!(
    err,
    DispatchError::ContentRetrievalFailed { source: RemoteError::NotFound { .. }, .. }
  ));
}

#[tokio::test]
async fn test_non_utf8_content_is_a_decode_failure() {
  let remote = Arc::new(FakeRemote::new().with_bytes("deploy.yml", "main", Ok(vec![0xff, 0xfe])));
  let runner = runner(remote, Arc::new(ScriptedPrompter::default()));
  let err = runner
    .run(options("deploy.yml", &[]), CancellationToken::new())
    .await
    .unwrap_err();
  assert!(matches!(err, DispatchError::ContentDecodeFailed { .. }));
}

#[tokio::test]
async fn test_default_branch_failure() {
  let remote = Arc::new(FakeRemote {
    default_branch: String::new(),
    ..FakeRemote::new()
  });
  let runner = runner(remote, Arc::new(ScriptedPrompter::default()));
  let err = runner
    .run(options("deploy.yml", &[]), CancellationToken::new())
    .await
    .unwrap_err();
  assert_eq!(err.to_string(), "unable to determine default branch for octo/widgets");
}

#[tokio::test]
async fn test_parse_error_names_path() {
  let remote = Arc::new(FakeRemote::new().with_file("deploy.yml", "main", "on: [workflow_dispatch\n"));
  let runner = runner(remote.clone(), Arc::new(ScriptedPrompter::default()));
  let err = runner
    .run(options("deploy.yml", &[]), CancellationToken::new())
    .await
    .unwrap_err();
  assert!(matches!(err, DispatchError::TriggerParse { ref path, .. } if path == "deploy.yml"));
  assert!(remote.dispatched().is_empty());
}

#[tokio::test]
async fn test_submission_failure_is_terminal() {
  let remote = Arc::new(FakeRemote {
    submit_error: Some(422),
    ..FakeRemote::new()
  });
  let runner = runner(remote.clone(), Arc::new(ScriptedPrompter::default()));
  let err = runner
    .run(options("deploy.yml", &[("target", "prod")]), CancellationToken::new())
    .await
    .unwrap_err();

  assert!(matches!(
    err,
    DispatchError::DispatchSubmissionFailed { workflow_id: 42, .. }
  ));
  // exactly one attempt, no retry
  assert_eq!(remote.dispatched().len(), 1);
}
