//! Wfdispatch Host HTTP
//!
//! [`RestClient`] implements every capability in `wfdispatch-remote` against
//! the repository host's REST API:
//!
//! | Capability         | Request                                                |
//! |--------------------|--------------------------------------------------------|
//! | `WorkflowCatalog`  | `GET repos/{owner}/{repo}/actions/workflows` (paged)   |
//! | `BranchResolver`   | `GET repos/{owner}/{repo}`                             |
//! | `ContentStore`     | `GET repos/{owner}/{repo}/contents/{path}?ref={ref}`   |
//! | `DispatchEndpoint` | `POST repos/{owner}/{repo}/actions/workflows/{id}/dispatches` |
//!
//! Requests are never retried.

mod client;
mod content;

pub use client::RestClient;
pub use content::decode_content;
