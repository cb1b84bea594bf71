//! Wfdispatch Workflow
//!
//! Everything the dispatch pipeline needs to know about a workflow's source
//! text, as pure functions with no I/O:
//!
//! ```text
//! source text ──parse_trigger_schema──▶ ParsedTrigger
//!                                         ├── NoManualTrigger   (not dispatchable)
//!                                         └── Manual(schema)
//!                                               ├──build_input_form──▶ Vec<InputPrompt>
//!                                               └──validate(values)──▶ IndexMap<name, value>
//! ```
//!
//! The trigger lives under the workflow's `on` key, which may be a scalar
//! (`on: workflow_dispatch`), a list (`on: [push, workflow_dispatch]`) or a
//! mapping:
//!
//! ```yaml
//! on:
//!   workflow_dispatch:
//!     inputs:
//!       environment:
//!         description: Target environment
//!         required: true
//!         type: choice
//!         options: [staging, production]
//!       debug:
//!         type: boolean
//!         default: false
//! ```

mod error;
mod form;
mod parse;
mod schema;
mod validate;

pub use error::{InputProblem, TriggerParseError, ValidationError};
pub use form::{InputPrompt, PromptKind, build_input_form};
pub use parse::parse_trigger_schema;
pub use schema::{DispatchTriggerSchema, InputSpec, InputType, ParsedTrigger};
pub use validate::{normalize_boolean, validate};
