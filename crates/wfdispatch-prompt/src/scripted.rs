use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::{PromptError, Prompter};

/// A canned answer for [`ScriptedPrompter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
  Select(usize),
  Input(String),
  Confirm(bool),
  /// Accept whatever default the prompt offers.
  Default,
  /// Behave as if the operator pressed Ctrl-C.
  Interrupt,
}

/// Replays a fixed list of answers in order.
///
/// Used by tests to drive interactive flows, and as a way to assert that a
/// flow never prompted at all (see [`ScriptedPrompter::calls`]).
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
  answers: Mutex<VecDeque<Answer>>,
  calls: AtomicUsize,
}

impl ScriptedPrompter {
  pub fn new(answers: impl IntoIterator<Item = Answer>) -> Self {
    Self {
      answers: Mutex::new(answers.into_iter().collect()),
      calls: AtomicUsize::new(0),
    }
  }

  /// Number of prompts shown so far.
  pub fn calls(&self) -> usize {
    self.calls.load(Ordering::SeqCst)
  }

  /// Answers not consumed yet.
  pub fn remaining(&self) -> usize {
    self.answers.lock().map(|a| a.len()).unwrap_or(0)
  }

  fn next(&self, message: &str) -> Result<Answer, PromptError> {
    self.calls.fetch_add(1, Ordering::SeqCst);
    let answer = self
      .answers
      .lock()
      .map_err(|_| unscripted(message, "answer queue poisoned"))?
      .pop_front();

    match answer {
      Some(Answer::Interrupt) => Err(PromptError::Interrupted),
      Some(answer) => Ok(answer),
      None => Err(unscripted(message, "no answers left")),
    }
  }
}

fn unscripted(message: &str, reason: &str) -> PromptError {
  PromptError::Unscripted {
    message: message.to_string(),
    reason: reason.to_string(),
  }
}

#[async_trait]
impl Prompter for ScriptedPrompter {
  async fn select(
    &self,
    message: &str,
    options: &[String],
    default: Option<usize>,
  ) -> Result<usize, PromptError> {
    if options.is_empty() {
      return Err(PromptError::NoOptions);
    }
    match self.next(message)? {
      Answer::Select(i) if i < options.len() => Ok(i),
      Answer::Select(i) => Err(unscripted(message, &format!("index {} out of range", i))),
      Answer::Default => default.ok_or_else(|| unscripted(message, "no default to accept")),
      other => Err(unscripted(message, &format!("expected a selection, got {:?}", other))),
    }
  }

  async fn input(&self, message: &str, default: Option<&str>) -> Result<String, PromptError> {
    match self.next(message)? {
      Answer::Input(value) if value.is_empty() => Ok(default.unwrap_or_default().to_string()),
      Answer::Input(value) => Ok(value),
      Answer::Default => Ok(default.unwrap_or_default().to_string()),
      other => Err(unscripted(message, &format!("expected text, got {:?}", other))),
    }
  }

  async fn confirm(&self, message: &str, default: bool) -> Result<bool, PromptError> {
    match self.next(message)? {
      Answer::Confirm(value) => Ok(value),
      Answer::Default => Ok(default),
      other => Err(unscripted(message, &format!("expected yes/no, got {:?}", other))),
    }
  }
}
