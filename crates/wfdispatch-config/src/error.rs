use thiserror::Error;

/// Errors raised while building configuration values from operator input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
  #[error("expected the \"[HOST/]OWNER/REPO\" format, got {0:?}")]
  InvalidRepo(String),

  #[error("unable to derive a repository from remote url {0:?}")]
  InvalidRemoteUrl(String),

  #[error("revision reference must not be empty")]
  EmptyRevision,
}
