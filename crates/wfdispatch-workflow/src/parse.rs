use indexmap::IndexMap;
use serde::Deserialize;
use serde_yaml::{Mapping, Value};

use crate::error::TriggerParseError;
use crate::schema::{DispatchTriggerSchema, InputSpec, InputType, ParsedTrigger};

const MANUAL_TRIGGER: &str = "workflow_dispatch";

/// Input fields as authored, before type checking.
#[derive(Debug, Default, Deserialize)]
struct RawInput {
  #[serde(default)]
  description: Option<String>,
  #[serde(default)]
  required: bool,
  #[serde(default)]
  default: Option<Value>,
  #[serde(default, rename = "type")]
  input_type: Option<String>,
  #[serde(default, alias = "choices")]
  options: Option<Vec<Value>>,
}

/// Find the manual dispatch trigger in workflow source text.
///
/// A document without one (including one with no `on` key at all) yields
/// [`ParsedTrigger::NoManualTrigger`]. Malformed YAML or a badly shaped trigger
/// yields a [`TriggerParseError`] naming the line or field at fault.
pub fn parse_trigger_schema(source: &str) -> Result<ParsedTrigger, TriggerParseError> {
  let document: Value = serde_yaml::from_str(source).map_err(syntax_error)?;

  let root = match document {
    Value::Mapping(root) => root,
    Value::Null => return Ok(ParsedTrigger::NoManualTrigger),
    _ => return Err(invalid("<root>", "workflow must be a mapping")),
  };

  // YAML 1.1 loaders read a bare `on` key as boolean true
  let on = root.get("on").or_else(|| root.get(Value::Bool(true)));

  match on {
    None | Some(Value::Null) => Ok(ParsedTrigger::NoManualTrigger),
    Some(Value::String(event)) => Ok(from_event_names(&[event.as_str()])),
    Some(Value::Sequence(events)) => {
      let names = events
        .iter()
        .map(|e| e.as_str().ok_or_else(|| invalid("on", "event names must be strings")))
        .collect::<Result<Vec<_>, _>>()?;
      Ok(from_event_names(&names))
    }
    Some(Value::Mapping(events)) => parse_event_mapping(events),
    Some(_) => Err(invalid("on", "expected an event name, a list or a mapping")),
  }
}

fn from_event_names(names: &[&str]) -> ParsedTrigger {
  if names.contains(&MANUAL_TRIGGER) {
    ParsedTrigger::Manual(DispatchTriggerSchema::default())
  } else {
    ParsedTrigger::NoManualTrigger
  }
}

fn parse_event_mapping(events: &Mapping) -> Result<ParsedTrigger, TriggerParseError> {
  let trigger = match events.get(MANUAL_TRIGGER) {
    None => return Ok(ParsedTrigger::NoManualTrigger),
    Some(Value::Null) => return Ok(ParsedTrigger::Manual(DispatchTriggerSchema::default())),
    Some(Value::Mapping(trigger)) => trigger,
    Some(_) => return Err(invalid("on.workflow_dispatch", "expected a mapping")),
  };

  let inputs = match trigger.get("inputs") {
    None | Some(Value::Null) => IndexMap::new(),
    Some(Value::Mapping(inputs)) => parse_inputs(inputs)?,
    Some(_) => return Err(invalid("on.workflow_dispatch.inputs", "expected a mapping")),
  };

  Ok(ParsedTrigger::Manual(DispatchTriggerSchema { inputs }))
}

fn parse_inputs(inputs: &Mapping) -> Result<IndexMap<String, InputSpec>, TriggerParseError> {
  let mut specs = IndexMap::with_capacity(inputs.len());

  for (key, value) in inputs {
    let name = key
      .as_str()
      .ok_or_else(|| invalid("on.workflow_dispatch.inputs", "input names must be strings"))?;
    let field = format!("on.workflow_dispatch.inputs.{}", name);

    let raw: RawInput = match value {
      Value::Null => RawInput::default(),
      other => serde_yaml::from_value(other.clone()).map_err(|e| invalid(&field, &e.to_string()))?,
    };

    specs.insert(name.to_string(), build_spec(&field, raw)?);
  }

  Ok(specs)
}

fn build_spec(field: &str, raw: RawInput) -> Result<InputSpec, TriggerParseError> {
  let input_type = match raw.input_type.as_deref() {
    None => InputType::String,
    Some(t) => InputType::parse(t).ok_or_else(|| {
      invalid(&format!("{}.type", field), &format!("unsupported input type {:?}", t))
    })?,
  };

  let default = raw
    .default
    .as_ref()
    .map(|v| scalar_to_string(v).ok_or_else(|| invalid(&format!("{}.default", field), "expected a scalar")))
    .transpose()?
    .flatten();

  let choices = if input_type == InputType::Choice {
    let options = raw.options.unwrap_or_default();
    if options.is_empty() {
      return Err(invalid(
        &format!("{}.options", field),
        "choice inputs need at least one option",
      ));
    }
    options
      .iter()
      .map(|o| {
        scalar_to_string(o)
          .flatten()
          .ok_or_else(|| invalid(&format!("{}.options", field), "options must be scalars"))
      })
      .collect::<Result<Vec<_>, _>>()?
  } else {
    Vec::new()
  };

  Ok(InputSpec {
    description: raw.description.filter(|d| !d.trim().is_empty()),
    required: raw.required,
    default,
    input_type,
    choices,
  })
}

/// Stringify a YAML scalar. `Some(None)` for null, `None` for non-scalars.
fn scalar_to_string(value: &Value) -> Option<Option<String>> {
  match value {
    Value::Null => Some(None),
    Value::Bool(b) => Some(Some(b.to_string())),
    Value::Number(n) => Some(Some(n.to_string())),
    Value::String(s) => Some(Some(s.clone())),
    _ => None,
  }
}

fn syntax_error(err: serde_yaml::Error) -> TriggerParseError {
  let location = err.location();
  TriggerParseError::Syntax {
    line: location.as_ref().map(|l| l.line()),
    column: location.as_ref().map(|l| l.column()),
    message: err.to_string(),
  }
}

fn invalid(field: &str, message: &str) -> TriggerParseError {
  TriggerParseError::InvalidField {
    field: field.to_string(),
    message: message.to_string(),
  }
}
