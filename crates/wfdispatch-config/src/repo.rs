use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::host::DEFAULT_HOST;

/// Coordinate of a repository on a host: `host/owner/name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepoRef {
  pub host: String,
  pub owner: String,
  pub name: String,
}

impl RepoRef {
  pub fn new(host: impl Into<String>, owner: impl Into<String>, name: impl Into<String>) -> Self {
    Self {
      host: host.into(),
      owner: owner.into(),
      name: name.into(),
    }
  }

  /// `owner/name`, the form the REST API and operator messages use.
  pub fn full_name(&self) -> String {
    format!("{}/{}", self.owner, self.name)
  }

  /// Parse `OWNER/REPO` or `HOST/OWNER/REPO`, falling back to `default_host`
  /// when the host segment is omitted.
  pub fn parse_with_host(value: &str, default_host: &str) -> Result<Self, ConfigError> {
    let parts: Vec<&str> = value.trim().split('/').collect();
    if parts.iter().any(|p| p.is_empty()) {
      return Err(ConfigError::InvalidRepo(value.to_string()));
    }

    match parts.as_slice() {
      [owner, name] => Ok(Self::new(default_host, *owner, *name)),
      [host, owner, name] => Ok(Self::new(normalize_host(host), *owner, *name)),
      _ => Err(ConfigError::InvalidRepo(value.to_string())),
    }
  }

  /// Derive a coordinate from a git remote url.
  ///
  /// Supports `https://host/owner/repo(.git)`, `ssh://git@host/owner/repo(.git)`
  /// and the scp-like `git@host:owner/repo(.git)` form.
  pub fn from_remote_url(url: &str) -> Result<Self, ConfigError> {
    let invalid = || ConfigError::InvalidRemoteUrl(url.to_string());
    let trimmed = url.trim();

    let (host, path) = if let Some((_, rest)) = trimmed.split_once("://") {
      let rest = rest.rsplit_once('@').map_or(rest, |(_, r)| r);
      rest.split_once('/').ok_or_else(invalid)?
    } else {
      let rest = trimmed.rsplit_once('@').map_or(trimmed, |(_, r)| r);
      rest.split_once(':').ok_or_else(invalid)?
    };

    // strip any port from the host
    let host = host.split(':').next().unwrap_or(host);
    let path = path.trim_end_matches('/');
    let path = path.strip_suffix(".git").unwrap_or(path);

    match path.split('/').collect::<Vec<_>>().as_slice() {
      [owner, name] if !host.is_empty() && !owner.is_empty() && !name.is_empty() => {
        Ok(Self::new(normalize_host(host), *owner, *name))
      }
      _ => Err(invalid()),
    }
  }
}

fn normalize_host(host: &str) -> String {
  let host = host.to_ascii_lowercase();
  host.strip_prefix("www.").map(str::to_string).unwrap_or(host)
}

impl FromStr for RepoRef {
  type Err = ConfigError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::parse_with_host(s, DEFAULT_HOST)
  }
}

impl fmt::Display for RepoRef {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}/{}/{}", self.host, self.owner, self.name)
  }
}
