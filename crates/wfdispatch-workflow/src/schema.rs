use indexmap::IndexMap;

/// Declared type of a dispatch input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputType {
  #[default]
  String,
  Boolean,
  Choice,
  Number,
  Environment,
}

impl InputType {
  pub fn parse(value: &str) -> Option<Self> {
    match value {
      "string" => Some(Self::String),
      "boolean" => Some(Self::Boolean),
      "choice" => Some(Self::Choice),
      "number" => Some(Self::Number),
      "environment" => Some(Self::Environment),
      _ => None,
    }
  }
}

/// One declared input of a manual dispatch trigger.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InputSpec {
  pub description: Option<String>,
  pub required: bool,
  /// Default value, already stringified.
  pub default: Option<String>,
  pub input_type: InputType,
  /// Allowed values, in declaration order. Only populated for `choice`.
  pub choices: Vec<String>,
}

/// The inputs of a manual dispatch trigger, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DispatchTriggerSchema {
  pub inputs: IndexMap<String, InputSpec>,
}

impl DispatchTriggerSchema {
  pub fn input(&self, name: &str) -> Option<&InputSpec> {
    self.inputs.get(name)
  }

  pub fn is_empty(&self) -> bool {
    self.inputs.is_empty()
  }
}

/// Result of looking for a manual dispatch trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedTrigger {
  /// The workflow can be dispatched with these inputs.
  Manual(DispatchTriggerSchema),
  /// The workflow declares no manual dispatch trigger. Not an error.
  NoManualTrigger,
}
