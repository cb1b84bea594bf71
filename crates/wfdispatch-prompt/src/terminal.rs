use std::io::{self, BufRead, IsTerminal, Write};

use async_trait::async_trait;
use tracing::debug;

use crate::{PromptError, Prompter};

/// Whether the process can prompt: both stdin and stderr must be terminals.
pub fn is_interactive() -> bool {
  io::stdin().is_terminal() && io::stderr().is_terminal()
}

/// Prompts on stderr and reads answers line by line from stdin.
///
/// Reads happen on the blocking pool so callers can race a prompt against a
/// cancellation signal.
#[derive(Debug, Clone, Default)]
pub struct TerminalPrompter;

impl TerminalPrompter {
  pub fn new() -> Self {
    Self
  }

  /// Print `text` and read one line. EOF counts as an interrupt.
  async fn ask(&self, text: String) -> Result<String, PromptError> {
    tokio::task::spawn_blocking(move || {
      let mut stderr = io::stderr().lock();
      write!(stderr, "{}", text)?;
      stderr.flush()?;

      let mut line = String::new();
      let read = io::stdin().lock().read_line(&mut line)?;
      if read == 0 {
        return Err(PromptError::Interrupted);
      }
      Ok(line.trim_end_matches(['\r', '\n']).to_string())
    })
    .await
    .map_err(|e| PromptError::Io(io::Error::other(e)))?
  }

  fn warn(&self, text: &str) {
    let _ = writeln!(io::stderr(), "{}", text);
  }
}

#[async_trait]
impl Prompter for TerminalPrompter {
  async fn select(
    &self,
    message: &str,
    options: &[String],
    default: Option<usize>,
  ) -> Result<usize, PromptError> {
    if options.is_empty() {
      return Err(PromptError::NoOptions);
    }

    let mut menu = format!("? {}\n", message);
    for (i, option) in options.iter().enumerate() {
      let marker = if Some(i) == default { ">" } else { " " };
      menu.push_str(&format!("{} {:>2}) {}\n", marker, i + 1, option));
    }
    self.warn(menu.trim_end());

    loop {
      let line = self.ask(format!("  Choose 1-{}: ", options.len())).await?;
      match parse_selection(&line, options.len(), default) {
        Some(index) => {
          debug!(prompt = message, index, "selection made");
          return Ok(index);
        }
        None => self.warn(&format!("  please enter a number between 1 and {}", options.len())),
      }
    }
  }

  async fn input(&self, message: &str, default: Option<&str>) -> Result<String, PromptError> {
    let text = match default {
      Some(d) if !d.is_empty() => format!("? {} ({}) ", message, d),
      _ => format!("? {} ", message),
    };
    let line = self.ask(text).await?;
    if line.trim().is_empty() {
      return Ok(default.unwrap_or_default().to_string());
    }
    Ok(line)
  }

  async fn confirm(&self, message: &str, default: bool) -> Result<bool, PromptError> {
    let hint = if default { "Y/n" } else { "y/N" };
    loop {
      let line = self.ask(format!("? {} ({}) ", message, hint)).await?;
      match parse_confirm(&line, default) {
        Some(answer) => return Ok(answer),
        None => self.warn("  please answer y or n"),
      }
    }
  }
}

/// Parse a 1-based menu choice. Empty input picks `default`.
fn parse_selection(line: &str, len: usize, default: Option<usize>) -> Option<usize> {
  let line = line.trim();
  if line.is_empty() {
    return default;
  }
  match line.parse::<usize>() {
    Ok(n) if n >= 1 && n <= len => Some(n - 1),
    _ => None,
  }
}

fn parse_confirm(line: &str, default: bool) -> Option<bool> {
  match line.trim().to_ascii_lowercase().as_str() {
    "" => Some(default),
    "y" | "yes" => Some(true),
    "n" | "no" => Some(false),
    _ => None,
  }
}
