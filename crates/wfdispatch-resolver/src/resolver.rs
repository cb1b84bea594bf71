use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use wfdispatch_config::{RepoRef, WorkflowDefinition, WorkflowState};
use wfdispatch_prompt::Prompter;
use wfdispatch_remote::WorkflowCatalog;

use crate::error::ResolveError;
use crate::rules::{MATCH_RULES, find_match};

/// Resolver turns a selector into one concrete workflow definition.
#[async_trait]
pub trait Resolver: Send + Sync {
  /// Resolve `selector` against the catalog of `repo` filtered to `states`.
  ///
  /// An empty selector asks the operator to pick, which is only allowed when
  /// `interactive` is true. Otherwise it fails with
  /// [`ResolveError::SelectorRequired`] before touching the catalog.
  async fn resolve(
    &self,
    repo: &RepoRef,
    selector: &str,
    interactive: bool,
    states: &[WorkflowState],
  ) -> Result<WorkflowDefinition, ResolveError>;
}

/// Standard resolver backed by a workflow catalog and a prompter.
pub struct StandardResolver {
  catalog: Arc<dyn WorkflowCatalog>,
  prompter: Arc<dyn Prompter>,
}

impl StandardResolver {
  pub fn new(catalog: Arc<dyn WorkflowCatalog>, prompter: Arc<dyn Prompter>) -> Self {
    Self { catalog, prompter }
  }

  /// Let the operator pick from `candidates`, shown as `name (path)`.
  async fn select_interactively(
    &self,
    candidates: Vec<WorkflowDefinition>,
  ) -> Result<WorkflowDefinition, ResolveError> {
    let options: Vec<String> = candidates
      .iter()
      .map(|w| format!("{} ({})", w.name, w.path))
      .collect();

    let index = self
      .prompter
      .select("Select a workflow", &options, None)
      .await?;

    candidates
      .into_iter()
      .nth(index)
      .ok_or(ResolveError::Prompt(wfdispatch_prompt::PromptError::NoOptions))
  }
}

#[async_trait]
impl Resolver for StandardResolver {
  async fn resolve(
    &self,
    repo: &RepoRef,
    selector: &str,
    interactive: bool,
    states: &[WorkflowState],
  ) -> Result<WorkflowDefinition, ResolveError> {
    let selector = selector.trim();
    if selector.is_empty() && !interactive {
      return Err(ResolveError::SelectorRequired);
    }

    let candidates = self
      .catalog
      .list(repo, states)
      .await
      .map_err(ResolveError::Catalog)?;

    debug!(repo = %repo, candidates = candidates.len(), "listed workflows");

    if candidates.is_empty() {
      return Err(ResolveError::AllCandidatesFiltered {
        states: states.to_vec(),
      });
    }

    if selector.is_empty() {
      return self.select_interactively(candidates).await;
    }

    match find_match(&MATCH_RULES, selector, &candidates) {
      Some((rule, workflow)) => {
        info!(
          selector,
          rule,
          workflow_id = workflow.id,
          path = %workflow.path,
          "resolved workflow"
        );
        Ok(workflow.clone())
      }
      None => Err(ResolveError::SelectorNotFound {
        selector: selector.to_string(),
      }),
    }
  }
}
