use thiserror::Error;

/// Errors reported by remote collaborators.
#[derive(Debug, Error)]
pub enum RemoteError {
  /// The addressed resource does not exist (HTTP 404).
  #[error("not found: {resource}")]
  NotFound { resource: String },

  /// The service rejected the credentials (HTTP 401).
  #[error("authentication required: {message}")]
  Unauthorized { message: String },

  /// Any other non-success response.
  #[error("HTTP {status}: {message}")]
  Status { status: u16, message: String },

  /// The request never produced a response (connect, timeout, TLS, ...).
  #[error("transport error: {message}")]
  Transport { message: String },

  /// A response arrived but its body could not be understood.
  #[error("malformed response: {message}")]
  InvalidResponse { message: String },

  /// Content arrived but its transport encoding could not be undone.
  #[error("failed to decode content: {message}")]
  Decode { message: String },
}

impl RemoteError {
  pub fn is_not_found(&self) -> bool {
    matches!(self, Self::NotFound { .. })
  }

  pub fn is_unauthorized(&self) -> bool {
    matches!(self, Self::Unauthorized { .. })
  }
}
