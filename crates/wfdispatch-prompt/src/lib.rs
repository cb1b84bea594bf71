//! Wfdispatch Prompt
//!
//! The [`Prompter`] capability used wherever the operator has to make a choice:
//! picking a workflow and filling in dispatch inputs. Core logic only sees the
//! trait, so it runs the same against a real terminal or a scripted fake.

mod scripted;
mod terminal;

pub use scripted::{Answer, ScriptedPrompter};
pub use terminal::{TerminalPrompter, is_interactive};

use async_trait::async_trait;

/// Errors raised while prompting.
#[derive(Debug, thiserror::Error)]
pub enum PromptError {
  /// The operator closed input or interrupted the prompt.
  #[error("prompt interrupted")]
  Interrupted,

  /// Nothing to choose from.
  #[error("no options to select from")]
  NoOptions,

  /// A scripted prompter ran out of answers or got one of the wrong kind.
  #[error("unexpected prompt {message:?}: {reason}")]
  Unscripted { message: String, reason: String },

  #[error("terminal i/o error: {0}")]
  Io(#[from] std::io::Error),
}

/// Blocking interaction points with the operator.
#[async_trait]
pub trait Prompter: Send + Sync {
  /// Single selection. Returns the index of the chosen option.
  async fn select(
    &self,
    message: &str,
    options: &[String],
    default: Option<usize>,
  ) -> Result<usize, PromptError>;

  /// Free text. An empty answer takes `default` when one is given.
  async fn input(&self, message: &str, default: Option<&str>) -> Result<String, PromptError>;

  /// Yes/no question.
  async fn confirm(&self, message: &str, default: bool) -> Result<bool, PromptError>;
}
