use crate::schema::{DispatchTriggerSchema, InputType};

/// How an input is asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptKind {
  /// Free text.
  Text,
  /// Yes/no.
  Confirm,
  /// Single selection over the declared choices.
  Select(Vec<String>),
}

/// One question of the input form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputPrompt {
  pub name: String,
  /// Description when declared, otherwise the input name.
  pub label: String,
  pub default: Option<String>,
  pub required: bool,
  pub kind: PromptKind,
}

/// Derive one prompt per declared input, in declaration order.
pub fn build_input_form(schema: &DispatchTriggerSchema) -> Vec<InputPrompt> {
  schema
    .inputs
    .iter()
    .map(|(name, spec)| InputPrompt {
      name: name.clone(),
      label: spec.description.clone().unwrap_or_else(|| name.clone()),
      default: spec.default.clone(),
      required: spec.required,
      kind: match spec.input_type {
        InputType::Boolean => PromptKind::Confirm,
        InputType::Choice => PromptKind::Select(spec.choices.clone()),
        InputType::String | InputType::Number | InputType::Environment => PromptKind::Text,
      },
    })
    .collect()
}
