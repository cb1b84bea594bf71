use thiserror::Error;

/// The workflow source could not be understood.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TriggerParseError {
  /// The text is not valid YAML.
  #[error("invalid YAML{}: {message}", location(.line, .column))]
  Syntax {
    line: Option<usize>,
    column: Option<usize>,
    message: String,
  },

  /// Valid YAML, but a trigger field has the wrong shape.
  #[error("invalid trigger definition at `{field}`: {message}")]
  InvalidField { field: String, message: String },
}

fn location(line: &Option<usize>, column: &Option<usize>) -> String {
  match (line, column) {
    (Some(l), Some(c)) => format!(" at line {}, column {}", l, c),
    (Some(l), None) => format!(" at line {}", l),
    _ => String::new(),
  }
}

/// A single problem with submitted input values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InputProblem {
  #[error("missing required input `{name}`")]
  MissingRequired { name: String },

  #[error("input `{name}` must be one of [{}], got {value:?}", .choices.join(", "))]
  InvalidChoice {
    name: String,
    value: String,
    choices: Vec<String>,
  },

  #[error("input `{name}` must be true or false, got {value:?}")]
  InvalidBoolean { name: String, value: String },

  #[error("input `{name}` must be a number, got {value:?}")]
  InvalidNumber { name: String, value: String },

  #[error("unknown input `{name}`")]
  UnknownInput { name: String },
}

impl InputProblem {
  /// The input the problem is about.
  pub fn name(&self) -> &str {
    match self {
      Self::MissingRequired { name }
      | Self::InvalidChoice { name, .. }
      | Self::InvalidBoolean { name, .. }
      | Self::InvalidNumber { name, .. }
      | Self::UnknownInput { name } => name,
    }
  }
}

/// Submitted values did not satisfy the trigger schema.
///
/// Carries every problem found, not just the first.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{}", summarize(.problems))]
pub struct ValidationError {
  pub problems: Vec<InputProblem>,
}

fn summarize(problems: &[InputProblem]) -> String {
  problems
    .iter()
    .map(ToString::to_string)
    .collect::<Vec<_>>()
    .join("; ")
}
