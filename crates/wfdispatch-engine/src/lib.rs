//! Wfdispatch Engine
//!
//! Runs one dispatch invocation end to end. Each stage consumes the previous
//! stage's output, so the flow is strictly sequential:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │ Resolver          selector / interactive pick → workflow     │
//! ├──────────────────────────────────────────────────────────────┤
//! │ resolve_revision  --ref or default branch → RevisionRef      │
//! │                   (resolved once, reused below)              │
//! ├──────────────────────────────────────────────────────────────┤
//! │ fetch_source      content store → decoded source text        │
//! ├──────────────────────────────────────────────────────────────┤
//! │ schema pipeline   parse trigger → form → validate inputs     │
//! ├──────────────────────────────────────────────────────────────┤
//! │ submit            DispatchRequest → dispatch endpoint        │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every remote call and prompt races a `CancellationToken`. The token is
//! checked once more right before submission; the submission itself is not
//! raced, so a cancelled run never leaves a half-known dispatch behind.

mod error;
mod inputs;
mod retrieval;
mod runner;
mod submit;

pub use error::DispatchError;
pub use inputs::prompt_inputs;
pub use retrieval::{fetch_source, resolve_revision};
pub use runner::{DispatchOptions, DispatchOutcome, DispatchRunner};
pub use submit::submit;
