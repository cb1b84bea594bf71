use async_trait::async_trait;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use wfdispatch_config::{HostConfig, RepoRef, RevisionRef, WorkflowDefinition, WorkflowState};
use wfdispatch_remote::{
  BranchResolver, ContentStore, DispatchEndpoint, DispatchRequest, RemoteError, WorkflowCatalog,
  filter_by_state,
};

use crate::content::decode_content;

const PAGE_SIZE: usize = 100;
const API_VERSION: &str = "2022-11-28";

#[derive(Debug, Deserialize)]
struct WorkflowsPage {
  total_count: usize,
  workflows: Vec<ApiWorkflow>,
}

#[derive(Debug, Deserialize)]
struct ApiWorkflow {
  id: u64,
  name: String,
  path: String,
  state: String,
}

impl From<ApiWorkflow> for WorkflowDefinition {
  fn from(w: ApiWorkflow) -> Self {
    Self {
      id: w.id,
      name: w.name,
      path: w.path,
      state: WorkflowState::from_api(&w.state),
    }
  }
}

#[derive(Debug, Deserialize)]
struct ApiRepository {
  default_branch: String,
}

#[derive(Debug, Deserialize)]
struct ApiContent {
  #[serde(default)]
  content: String,
  #[serde(default)]
  encoding: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
  message: String,
}

/// REST client for the repository host.
#[derive(Debug, Clone)]
pub struct RestClient {
  http: Client,
  config: HostConfig,
}

impl RestClient {
  /// Build a client with the configured timeout and the API's standard headers.
  pub fn new(config: HostConfig) -> Result<Self, RemoteError> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
    headers.insert("X-GitHub-Api-Version", HeaderValue::from_static(API_VERSION));
    headers.insert(
      USER_AGENT,
      HeaderValue::from_static(concat!("wfdispatch/", env!("CARGO_PKG_VERSION"))),
    );

    let http = Client::builder()
      .default_headers(headers)
      .timeout(config.timeout())
      .build()
      .map_err(transport)?;

    Ok(Self { http, config })
  }

  /// `{api_base}/repos/{owner}/{repo}/{segments...}` with each segment escaped.
  fn endpoint<'a>(
    &self,
    repo: &RepoRef,
    segments: impl IntoIterator<Item = &'a str>,
  ) -> Result<Url, RemoteError> {
    let base = self.config.api_base_for(repo);
    let mut url = Url::parse(&base).map_err(|e| RemoteError::Transport {
      message: format!("invalid api url {:?}: {}", base, e),
    })?;

    url
      .path_segments_mut()
      .map_err(|_| RemoteError::Transport {
        message: format!("api url {:?} cannot be a base", base),
      })?
      .pop_if_empty()
      .extend(["repos", repo.owner.as_str(), repo.name.as_str()])
      .extend(segments);

    Ok(url)
  }

  fn request(&self, method: Method, url: Url) -> RequestBuilder {
    let builder = self.http.request(method, url);
    match &self.config.token {
      Some(token) => builder.bearer_auth(token),
      None => builder,
    }
  }

  async fn get_json<T: DeserializeOwned>(&self, url: Url, resource: &str) -> Result<T, RemoteError> {
    debug!(%url, "GET");
    let response = self
      .request(Method::GET, url)
      .send()
      .await
      .map_err(transport)?;
    let response = check_status(response, resource).await?;
    response.json::<T>().await.map_err(|e| RemoteError::InvalidResponse {
      message: format!("{}: {}", resource, e),
    })
  }
}

/// Turn a non-success response into the matching `RemoteError`.
async fn check_status(response: Response, resource: &str) -> Result<Response, RemoteError> {
  let status = response.status();
  if status.is_success() {
    return Ok(response);
  }

  let body = response.text().await.unwrap_or_default();
  let message = serde_json::from_str::<ApiErrorBody>(&body)
    .map(|b| b.message)
    .unwrap_or_else(|_| status.canonical_reason().unwrap_or("request failed").to_string());

  debug!(status = status.as_u16(), resource, %message, "request failed");

  Err(match status.as_u16() {
    404 => RemoteError::NotFound {
      resource: resource.to_string(),
    },
    401 => RemoteError::Unauthorized { message },
    code => RemoteError::Status {
      status: code,
      message,
    },
  })
}

/// A short page or a full count of collected workflows ends the listing.
fn is_last_page(received: usize, collected: usize, total_count: usize) -> bool {
  received < PAGE_SIZE || collected >= total_count
}

fn transport(err: reqwest::Error) -> RemoteError {
  let message = if err.is_timeout() {
    format!("request timed out: {}", err)
  } else {
    err.to_string()
  };
  RemoteError::Transport { message }
}

#[async_trait]
impl WorkflowCatalog for RestClient {
  async fn list(
    &self,
    repo: &RepoRef,
    states: &[WorkflowState],
  ) -> Result<Vec<WorkflowDefinition>, RemoteError> {
    let resource = format!("workflows of {}", repo.full_name());
    let mut workflows = Vec::new();

    for page in 1.. {
      let mut url = self.endpoint(repo, ["actions", "workflows"])?;
      url
        .query_pairs_mut()
        .append_pair("per_page", &PAGE_SIZE.to_string())
        .append_pair("page", &page.to_string());

      let batch: WorkflowsPage = self.get_json(url, &resource).await?;
      let received = batch.workflows.len();
      workflows.extend(batch.workflows.into_iter().map(WorkflowDefinition::from));

      if is_last_page(received, workflows.len(), batch.total_count) {
        break;
      }
    }

    debug!(repo = %repo, total = workflows.len(), "fetched workflow catalog");
    Ok(filter_by_state(workflows, states))
  }
}

#[async_trait]
impl BranchResolver for RestClient {
  async fn default_branch(&self, repo: &RepoRef) -> Result<String, RemoteError> {
    let url = self.endpoint(repo, std::iter::empty())?;
    let info: ApiRepository = self.get_json(url, &format!("repository {}", repo.full_name())).await?;
    Ok(info.default_branch)
  }
}

#[async_trait]
impl ContentStore for RestClient {
  async fn get_file(
    &self,
    repo: &RepoRef,
    path: &str,
    revision: &RevisionRef,
  ) -> Result<Vec<u8>, RemoteError> {
    let segments = std::iter::once("contents").chain(path.split('/').filter(|s| !s.is_empty()));
    let mut url = self.endpoint(repo, segments)?;
    url.query_pairs_mut().append_pair("ref", revision.as_str());

    let resource = format!("{} at {}", path, revision);
    let payload: ApiContent = self.get_json(url, &resource).await?;
    decode_content(&payload.content, &payload.encoding)
  }
}

#[async_trait]
impl DispatchEndpoint for RestClient {
  async fn create_dispatch_event(
    &self,
    repo: &RepoRef,
    request: DispatchRequest,
  ) -> Result<(), RemoteError> {
    let id = request.workflow_id.to_string();
    let url = self.endpoint(repo, ["actions", "workflows", id.as_str(), "dispatches"])?;
    debug!(%url, "POST");

    let response = self
      .request(Method::POST, url)
      .json(&request)
      .send()
      .await
      .map_err(transport)?;

    check_status(response, &format!("workflow {}", id)).await?;
    Ok(())
  }
}
