use indexmap::IndexMap;

use crate::error::{InputProblem, ValidationError};
use crate::schema::{DispatchTriggerSchema, InputSpec, InputType};

/// Check submitted values against the schema and build the outbound input map.
///
/// For each declared input, in declaration order, the submitted value is used
/// if present, then the declared default. An empty submission for a required
/// input counts as absent. Booleans come out as `"true"` or `"false"`. Keys the
/// schema does not declare are rejected.
///
/// All problems are collected before failing.
pub fn validate(
  schema: &DispatchTriggerSchema,
  submitted: &IndexMap<String, String>,
) -> Result<IndexMap<String, String>, ValidationError> {
  let mut problems = Vec::new();
  let mut values = IndexMap::with_capacity(schema.inputs.len());

  for (name, spec) in &schema.inputs {
    let value = submitted
      .get(name)
      .filter(|v| !(spec.required && v.trim().is_empty()))
      .or(spec.default.as_ref());

    match value {
      Some(value) => match normalize(name, spec, value) {
        Ok(value) => {
          values.insert(name.clone(), value);
        }
        Err(problem) => problems.push(problem),
      },
      None if spec.required => problems.push(InputProblem::MissingRequired { name: name.clone() }),
      None => {}
    }
  }

  problems.extend(
    submitted
      .keys()
      .filter(|key| !schema.inputs.contains_key(*key))
      .map(|key| InputProblem::UnknownInput { name: key.clone() }),
  );

  if problems.is_empty() {
    Ok(values)
  } else {
    Err(ValidationError { problems })
  }
}

fn normalize(name: &str, spec: &InputSpec, value: &str) -> Result<String, InputProblem> {
  match spec.input_type {
    InputType::Boolean => normalize_boolean(value).ok_or_else(|| InputProblem::InvalidBoolean {
      name: name.to_string(),
      value: value.to_string(),
    }),
    InputType::Choice => {
      if spec.choices.iter().any(|c| c == value) {
        Ok(value.to_string())
      } else {
        Err(InputProblem::InvalidChoice {
          name: name.to_string(),
          value: value.to_string(),
          choices: spec.choices.clone(),
        })
      }
    }
    InputType::Number => match value.trim().parse::<f64>() {
      Ok(n) if n.is_finite() => Ok(value.trim().to_string()),
      _ => Err(InputProblem::InvalidNumber {
        name: name.to_string(),
        value: value.to_string(),
      }),
    },
    InputType::String | InputType::Environment => Ok(value.to_string()),
  }
}

/// Canonical `"true"`/`"false"` for the usual spellings of a boolean.
pub fn normalize_boolean(value: &str) -> Option<String> {
  match value.trim().to_ascii_lowercase().as_str() {
    "true" | "yes" | "y" | "on" | "1" => Some("true".to_string()),
    "false" | "no" | "n" | "off" | "0" => Some("false".to_string()),
    _ => None,
  }
}
