//! # Labeling Run
//!
//! One pass over a pull request:
//!
//! 1. Validate inputs (no network access before this succeeds)
//! 2. Skip quietly unless the event carries a pull request
//! 3. List the changed files
//! 4. Resolve labels from the path patterns
//! 5. Add the labels, if any, and set the `labels_added` output
//!
//! Any error ends the run. [`run_action`] is the single place where an error
//! is turned into a failure report.

use tracing::{error, info};

use crate::context::EventContext;
use crate::error::LabelerError;
use crate::github::{GitHubError, PullRequestApi};
use crate::inputs::{ActionInputs, RawInputs};
use crate::report::Reporter;
use crate::resolve::LabelRules;
use crate::types::LabelSet;

/// Name of the output listing the applied labels
pub const LABELS_ADDED_OUTPUT: &str = "labels_added";

/// Run options not carried by the action inputs
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Resolve and report labels without adding them
    pub dry_run: bool,
}

/// How a successful run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The event is not a pull request event
    Skipped,
    /// No pattern matched any changed file
    NoMatch,
    /// Labels were added to the pull request
    Labeled(LabelSet),
    /// Labels were resolved but not added
    DryRun(LabelSet),
}

/// Run the labeler and report the result.
///
/// `connect` builds the API client from the validated inputs; it is only
/// called for pull request events.
///
/// # Errors
///
/// Returns the error that ended the run, after reporting it through
/// `reporter`.
pub async fn run_action<A, F, R>(
    raw: &RawInputs,
    context: &EventContext,
    options: RunOptions,
    connect: F,
    reporter: &mut R,
) -> Result<Outcome, LabelerError>
where
    A: PullRequestApi,
    F: FnOnce(&ActionInputs) -> Result<A, GitHubError>,
    R: Reporter + ?Sized,
{
    let result = label_pull_request(raw, context, options, connect, reporter).await;

    if let Err(e) = &result {
        error!(error = %e, "Labeling run failed");
        reporter.set_failed(&format!("Action failed: {e}"));
    }

    result
}

async fn label_pull_request<A, F, R>(
    raw: &RawInputs,
    context: &EventContext,
    options: RunOptions,
    connect: F,
    reporter: &mut R,
) -> Result<Outcome, LabelerError>
where
    A: PullRequestApi,
    F: FnOnce(&ActionInputs) -> Result<A, GitHubError>,
    R: Reporter + ?Sized,
{
    let inputs = ActionInputs::parse(raw)?;

    let Some(pr_number) = context.pull_request_number() else {
        info!(event = %context.event_name(), "Event has no pull request");
        reporter.info("Not a PR event, skipping");
        return Ok(Outcome::Skipped);
    };

    let repo = context.repo()?;
    let rules = LabelRules::compile(&inputs.path_labels)?;
    let api = connect(&inputs)?;

    info!(repo = %repo, pr = pr_number, "Fetching changed files");
    let files = api.list_changed_files(&repo, pr_number).await?;

    let labels = rules.resolve(&files);
    info!(
        pr = pr_number,
        files = files.len(),
        patterns = rules.len(),
        labels = labels.len(),
        "Resolved labels"
    );

    if labels.is_empty() {
        reporter.info("No matching labels found");
        reporter.set_output(LABELS_ADDED_OUTPUT, "")?;
        return Ok(Outcome::NoMatch);
    }

    if options.dry_run {
        reporter.info(&format!(
            "Dry run: would add labels: {}",
            labels.join(", ")
        ));
        reporter.set_output(LABELS_ADDED_OUTPUT, &labels.join(","))?;
        return Ok(Outcome::DryRun(labels));
    }

    api.add_labels(&repo, pr_number, labels.as_slice()).await?;

    reporter.info(&format!("✅ Added labels: {}", labels.join(", ")));
    reporter.set_output(LABELS_ADDED_OUTPUT, &labels.join(","))?;

    Ok(Outcome::Labeled(labels))
}
