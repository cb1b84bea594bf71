use std::future::Future;
use std::io::{self, Read};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use indexmap::IndexMap;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use wfdispatch_config::{DEFAULT_HOST, DEFAULT_TIMEOUT_SECS, HostConfig, RepoRef};
use wfdispatch_engine::{DispatchError, DispatchOptions, DispatchOutcome, DispatchRunner};
use wfdispatch_host_http::RestClient;
use wfdispatch_prompt::{TerminalPrompter, is_interactive};
use wfdispatch_resolver::ResolveError;

const EXIT_ERROR: i32 = 1;
const EXIT_CANCEL: i32 = 2;
const EXIT_AUTH: i32 = 4;

/// wfdispatch - start manually-dispatchable repository workflows
#[derive(Parser)]
#[command(name = "wfdispatch")]
#[command(version, about, long_about = None)]
struct Cli {
  /// Enable debug logging (overridden by WFDISPATCH_LOG)
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
  /// Create a dispatch event for a workflow, starting a run
  Run(RunArgs),
}

#[derive(Args)]
struct RunArgs {
  /// Workflow ID, file name or name. Prompts when omitted in a terminal.
  selector: Option<String>,

  /// The branch or tag name which contains the version of the workflow file to run
  #[arg(short = 'r', long = "ref")]
  git_ref: Option<String>,

  /// Select another repository using the [HOST/]OWNER/REPO format
  #[arg(short = 'R', long, env = "GH_REPO")]
  repo: Option<String>,

  /// Host used when --repo omits one
  #[arg(long, env = "GH_HOST", default_value = DEFAULT_HOST)]
  hostname: String,

  /// Override the REST API base url
  #[arg(long, env = "WFDISPATCH_API_URL")]
  api_url: Option<String>,

  /// Per-request timeout in seconds
  #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
  timeout: u64,

  /// Workflow input as KEY=VALUE (repeatable)
  #[arg(short = 'f', long = "field", value_name = "KEY=VALUE", conflicts_with = "json")]
  fields: Vec<String>,

  /// Read workflow inputs as a JSON object from stdin
  #[arg(long)]
  json: bool,
}

fn main() {
  let cli = Cli::parse();
  init_logging(cli.verbose);

  let code = match cli.command {
    Some(Commands::Run(args)) => run(args),
    None => {
      eprintln!("wfdispatch - use --help to see available commands");
      0
    }
  };

  std::process::exit(code);
}

fn init_logging(verbose: bool) {
  let default = if verbose { "debug" } else { "warn" };
  let filter =
    EnvFilter::try_from_env("WFDISPATCH_LOG").unwrap_or_else(|_| EnvFilter::new(default));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(io::stderr)
    .with_target(false)
    .init();
}

fn run(args: RunArgs) -> i32 {
  let rt = match tokio::runtime::Runtime::new() {
    Ok(rt) => rt,
    Err(e) => {
      eprintln!("failed to start async runtime: {}", e);
      return EXIT_ERROR;
    }
  };

  match block_on_detached(rt, run_async(args)) {
    Ok(outcome) => {
      report(&outcome);
      0
    }
    Err(err) => {
      eprintln!("{}", render_error(&err));
      exit_code(&err)
    }
  }
}

/// Drive `future` on `rt`, then shut the runtime down without joining the
/// blocking pool. A prompt abandoned on cancel leaves its stdin read parked
/// there until the next line arrives.
fn block_on_detached<F: Future>(rt: tokio::runtime::Runtime, future: F) -> F::Output {
  let output = rt.block_on(future);
  rt.shutdown_background();
  output
}

async fn run_async(args: RunArgs) -> Result<DispatchOutcome> {
  let interactive = !args.json && is_interactive();

  let inputs = if args.json {
    read_inputs_from_stdin()?
  } else {
    parse_fields(&args.fields)?
  };

  let repo = match &args.repo {
    Some(value) => RepoRef::parse_with_host(value, &args.hostname)
      .with_context(|| format!("invalid --repo value {:?}", value))?,
    None => repo_from_git_remote().await?,
  };

  debug!(repo = %repo, interactive, inputs = inputs.len(), "starting dispatch");

  let config = HostConfig {
    api_url: args.api_url,
    token: token_from_env(),
    timeout_secs: args.timeout,
  };
  let client = RestClient::new(config).context("could not build http client")?;

  let runner = DispatchRunner::with_remote(Arc::new(client), Arc::new(TerminalPrompter::new()));

  let mut options = DispatchOptions::new(repo, args.selector.unwrap_or_default());
  options.revision = args.git_ref;
  options.interactive = interactive;
  options.inputs = inputs;

  let cancel = CancellationToken::new();
  let on_interrupt = cancel.clone();
  tokio::spawn(async move {
    if tokio::signal::ctrl_c().await.is_ok() {
      on_interrupt.cancel();
    }
  });

  Ok(runner.run(options, cancel).await?)
}

fn report(outcome: &DispatchOutcome) {
  match outcome {
    DispatchOutcome::Dispatched {
      workflow, revision, ..
    } => {
      eprintln!(
        "Created workflow_dispatch event for {} at {}",
        workflow.file_name(),
        revision
      );
    }
    DispatchOutcome::NotDispatchable { workflow, .. } => {
      eprintln!(
        "workflow {} ({}) cannot be run manually: it has no workflow_dispatch trigger",
        workflow.name, workflow.path
      );
    }
  }
}

fn render_error(err: &anyhow::Error) -> String {
  match err.downcast_ref::<DispatchError>() {
    Some(DispatchError::Resolve(ResolveError::AllCandidatesFiltered { .. })) => {
      "no workflows are enabled on this repository".to_string()
    }
    Some(DispatchError::Cancelled) => "cancelled".to_string(),
    _ => format!("{:#}", err),
  }
}

fn exit_code(err: &anyhow::Error) -> i32 {
  match err.downcast_ref::<DispatchError>() {
    Some(DispatchError::Cancelled) => EXIT_CANCEL,
    Some(e) if e.remote_source().is_some_and(|r| r.is_unauthorized()) => EXIT_AUTH,
    _ => EXIT_ERROR,
  }
}

fn token_from_env() -> Option<String> {
  ["GH_TOKEN", "GITHUB_TOKEN"]
    .iter()
    .filter_map(|key| std::env::var(key).ok())
    .find(|value| !value.trim().is_empty())
}

/// Derive the repository from the `origin` remote of the current checkout.
async fn repo_from_git_remote() -> Result<RepoRef> {
  let output = tokio::process::Command::new("git")
    .args(["remote", "get-url", "origin"])
    .output()
    .await
    .context("could not determine base repo: failed to run git")?;

  if !output.status.success() {
    bail!("could not determine base repo: no `origin` remote found; use --repo");
  }

  let url = String::from_utf8_lossy(&output.stdout);
  RepoRef::from_remote_url(url.trim()).context("could not determine base repo")
}

fn parse_fields(fields: &[String]) -> Result<IndexMap<String, String>> {
  let mut inputs = IndexMap::new();
  for field in fields {
    match field.split_once('=') {
      Some((key, value)) if !key.trim().is_empty() => {
        inputs.insert(key.trim().to_string(), value.to_string());
      }
      _ => bail!("invalid field {:?}: expected KEY=VALUE", field),
    }
  }
  Ok(inputs)
}

fn read_inputs_from_stdin() -> Result<IndexMap<String, String>> {
  let mut input = String::new();
  io::stdin()
    .read_to_string(&mut input)
    .context("failed to read inputs from stdin")?;

  if input.trim().is_empty() {
    return Ok(IndexMap::new());
  }

  let payload: serde_json::Value =
    serde_json::from_str(&input).context("failed to parse inputs JSON from stdin")?;
  json_to_inputs(payload)
}

fn json_to_inputs(payload: serde_json::Value) -> Result<IndexMap<String, String>> {
  let serde_json::Value::Object(map) = payload else {
    bail!("inputs JSON must be an object");
  };

  let mut inputs = IndexMap::with_capacity(map.len());
  for (key, value) in map {
    let value = match value {
      serde_json::Value::String(s) => s,
      serde_json::Value::Bool(b) => b.to_string(),
      serde_json::Value::Number(n) => n.to_string(),
      // kept so a misspelt key still reaches validation
      serde_json::Value::Null => String::new(),
      _ => bail!("input {:?} must be a string, number or boolean", key),
    };
    inputs.insert(key, value);
  }
  Ok(inputs)
}
