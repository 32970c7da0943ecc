//! Error types for a labeling run.

use thiserror::Error;

use crate::github::GitHubError;
use crate::pattern::PatternError;

/// Errors that abort a labeling run.
#[derive(Debug, Error)]
pub enum LabelerError {
    /// A required input was absent or blank
    #[error("Input required and not supplied: {0}")]
    MissingInput(&'static str),

    /// `path_labels` is not a mapping of strings to strings
    #[error("Invalid path_labels: {0}")]
    InvalidPathLabels(String),

    /// A pattern does not compile
    #[error(transparent)]
    Pattern(#[from] PatternError),

    /// Trigger metadata is missing or malformed
    #[error("Invalid event context: {0}")]
    Context(String),

    /// A GitHub API call failed
    #[error(transparent)]
    GitHub(#[from] GitHubError),

    /// An output value could not be written
    #[error("Failed to set output '{name}': {source}")]
    Output {
        name: String,
        #[source]
        source: std::io::Error,
    },
}
