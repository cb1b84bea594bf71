//! Wfdispatch Config
//!
//! Value types shared by every wfdispatch crate. These describe remote state
//! (repositories, workflow definitions, revisions) as immutable snapshots taken
//! at the moment of a call, plus the host settings used to reach the remote
//! service.
//!
//! None of these types are cached between invocations. A `WorkflowDefinition`
//! is fetched fresh, inspected, and dropped.

mod error;
mod host;
mod repo;
mod revision;
mod workflow;

pub use error::ConfigError;
pub use host::{DEFAULT_HOST, DEFAULT_TIMEOUT_SECS, HostConfig};
pub use repo::RepoRef;
pub use revision::RevisionRef;
pub use workflow::{WorkflowDefinition, WorkflowId, WorkflowState};
