use std::fmt;
use std::time::Duration;

use crate::repo::RepoRef;

/// Host used when a repository string omits one.
pub const DEFAULT_HOST: &str = "github.com";

/// Request timeout applied when none is configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Settings for reaching the remote service.
#[derive(Clone, PartialEq, Eq)]
pub struct HostConfig {
  /// Explicit REST base url. When unset it is derived from the repository host.
  pub api_url: Option<String>,

  /// Bearer token. Redacted from `Debug` output.
  pub token: Option<String>,

  /// Per-request timeout in seconds.
  pub timeout_secs: u64,
}

impl Default for HostConfig {
  fn default() -> Self {
    Self {
      api_url: None,
      token: None,
      timeout_secs: DEFAULT_TIMEOUT_SECS,
    }
  }
}

impl fmt::Debug for HostConfig {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("HostConfig")
      .field("api_url", &self.api_url)
      .field("token", &self.token.as_ref().map(|_| "<redacted>"))
      .field("timeout_secs", &self.timeout_secs)
      .finish()
  }
}

impl HostConfig {
  pub fn timeout(&self) -> Duration {
    Duration::from_secs(self.timeout_secs)
  }

  /// REST base url for `repo`, always ending with `/`.
  ///
  /// `github.com` is served from `api.github.com`; any other host is treated
  /// as an enterprise install serving the API under `/api/v3/`.
  pub fn api_base_for(&self, repo: &RepoRef) -> String {
    let base = match &self.api_url {
      Some(url) => url.clone(),
      None if repo.host == DEFAULT_HOST => "https://api.github.com/".to_string(),
      None => format!("https://{}/api/v3/", repo.host),
    };

    if base.ends_with('/') {
      base
    } else {
      format!("{}/", base)
    }
  }
}
