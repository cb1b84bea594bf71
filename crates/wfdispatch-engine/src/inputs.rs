//! Interactive input collection.

use indexmap::IndexMap;

use wfdispatch_prompt::{PromptError, Prompter};
use wfdispatch_workflow::{InputPrompt, PromptKind, normalize_boolean};

/// Ask for every input of `form`, in order.
///
/// Blank free-text answers are left out so validation can decide whether the
/// input was required. Booleans come back as `"true"`/`"false"`.
pub async fn prompt_inputs(
  form: &[InputPrompt],
  prompter: &dyn Prompter,
) -> Result<IndexMap<String, String>, PromptError> {
  let mut values = IndexMap::with_capacity(form.len());

  for prompt in form {
    let label = if prompt.required {
      format!("{} (required)", prompt.label)
    } else {
      prompt.label.clone()
    };

    let value = match &prompt.kind {
      PromptKind::Text => prompter.input(&label, prompt.default.as_deref()).await?,
      PromptKind::Confirm => {
        let default = prompt
          .default
          .as_deref()
          .and_then(normalize_boolean)
          .is_some_and(|v| v == "true");
        prompter.confirm(&label, default).await?.to_string()
      }
      PromptKind::Select(choices) => {
        let default = prompt
          .default
          .as_ref()
          .and_then(|d| choices.iter().position(|c| c == d));
        let index = prompter.select(&label, choices, default).await?;
        choices.get(index).cloned().ok_or(PromptError::NoOptions)?
      }
    };

    if !value.is_empty() {
      values.insert(prompt.name.clone(), value);
    }
  }

  Ok(values)
}
