//! Label pull requests from the paths they change.
//!
//! A run lists the files changed by a pull request, matches each path against
//! a mapping of wildcard patterns to labels, and adds the union of the matched
//! labels to the pull request.
//!
//! # Usage
//!
//! ```no_run
//! use path_labeler::{
//!     run_action, EventContext, GitHubClient, RawInputs, RunOptions, WorkflowReporter,
//!     DEFAULT_API_URL,
//! };
//!
//! # async fn example() -> Result<(), path_labeler::LabelerError> {
//! let raw = RawInputs {
//!     github_token: std::env::var("INPUT_GITHUB_TOKEN").ok(),
//!     path_labels: Some(r#"{"src/**": "backend", "*.md": "docs"}"#.to_string()),
//! };
//! let context = EventContext::from_env()?;
//! let mut reporter = WorkflowReporter::from_env();
//!
//! run_action(
//!     &raw,
//!     &context,
//!     RunOptions::default(),
//!     |inputs| GitHubClient::new(DEFAULT_API_URL, &inputs.github_token),
//!     &mut reporter,
//! )
//! .await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Patterns
//!
//! See [`pattern`] for the wildcard syntax.

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod context;
pub mod error;
pub mod github;
pub mod inputs;
pub mod pattern;
pub mod report;
pub mod resolve;
pub mod run;
pub mod types;

pub use context::EventContext;
pub use error::LabelerError;
pub use github::{GitHubClient, GitHubError, PullRequestApi, DEFAULT_API_URL};
pub use inputs::{parse_path_labels, ActionInputs, RawInputs};
pub use pattern::{matches, PathPattern, PatternError};
pub use report::{Reporter, WorkflowReporter};
pub use resolve::{resolve_labels, LabelRules};
pub use run::{run_action, Outcome, RunOptions, LABELS_ADDED_OUTPUT};
pub use types::{ChangedFile, FileStatus, LabelSet, PathLabelMap, RepoRef};
