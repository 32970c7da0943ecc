//! path-labeler - label a pull request from the paths it changes.
//!
//! Designed to run as a GitHub Actions step. Inputs are read from the
//! `INPUT_*` variables the runner sets for action inputs, or from flags.
//!
//! # Environment Variables
//!
//! - `INPUT_GITHUB_TOKEN` - token used for the GitHub API (required)
//! - `INPUT_PATH_LABELS` - JSON or YAML mapping of path patterns to labels (required)
//! - `GITHUB_API_URL` - REST API base URL (defaults to api.github.com)
//! - `RUNNER_DEBUG` - set to `1` for debug logging
//!
//! # Examples
//!
//! ```bash
//! path-labeler --path-labels '{"src/**": "backend", "*.md": "docs"}'
//!
//! # Resolve labels without adding them
//! path-labeler --dry-run
//! ```

use std::process::ExitCode;

use clap::Parser;
use path_labeler::{
    run_action, EventContext, GitHubClient, RawInputs, Reporter, RunOptions, WorkflowReporter,
    DEFAULT_API_URL,
};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "path-labeler")]
#[command(about = "Label a pull request from the paths it changes")]
#[command(version)]
struct Cli {
    /// GitHub token (or set `INPUT_GITHUB_TOKEN` env var)
    #[arg(long, env = "INPUT_GITHUB_TOKEN", hide_env_values = true)]
    github_token: Option<String>,

    /// Path pattern to label mapping, JSON or YAML (or set `INPUT_PATH_LABELS` env var)
    #[arg(long, env = "INPUT_PATH_LABELS")]
    path_labels: Option<String>,

    /// GitHub REST API base URL
    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Resolve labels without adding them to the pull request
    #[arg(long)]
    dry_run: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let runner_debug = std::env::var("RUNNER_DEBUG").is_ok_and(|v| v == "1");
    let filter = if cli.verbose || runner_debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();

    let mut reporter = WorkflowReporter::from_env();

    let context = match EventContext::from_env() {
        Ok(context) => context,
        Err(e) => {
            reporter.set_failed(&format!("Action failed: {e}"));
            return ExitCode::FAILURE;
        }
    };

    let raw = RawInputs {
        github_token: cli.github_token,
        path_labels: cli.path_labels,
    };
    let options = RunOptions {
        dry_run: cli.dry_run,
    };
    let api_url = cli.api_url;

    let result = run_action(
        &raw,
        &context,
        options,
        |inputs| GitHubClient::new(&api_url, &inputs.github_token),
        &mut reporter,
    )
    .await;

    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}
