//! # Run Reporting
//!
//! User-facing results of a run: log lines, output values and the failure
//! message. [`WorkflowReporter`] speaks the GitHub Actions workflow-command
//! protocol; outputs go to the `GITHUB_OUTPUT` file when the runner provides
//! one.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::warn;
use uuid::Uuid;

use crate::error::LabelerError;

const ENV_GITHUB_OUTPUT: &str = "GITHUB_OUTPUT";

/// Sink for the results of a run
pub trait Reporter {
    /// Write an informational log line
    fn info(&mut self, message: &str);

    /// Set an output value for later workflow steps.
    ///
    /// # Errors
    ///
    /// Returns [`LabelerError::Output`] if the value cannot be recorded.
    fn set_output(&mut self, name: &str, value: &str) -> Result<(), LabelerError>;

    /// Report the run as failed with `message`
    fn set_failed(&mut self, message: &str);
}

/// Reporter emitting GitHub Actions workflow commands
#[derive(Debug)]
pub struct WorkflowReporter<W: Write> {
    out: W,
    output_file: Option<PathBuf>,
}

impl WorkflowReporter<io::Stdout> {
    /// Reporter on stdout, writing outputs to `$GITHUB_OUTPUT` if set
    #[must_use]
    pub fn from_env() -> Self {
        let output_file = std::env::var_os(ENV_GITHUB_OUTPUT)
            .filter(|path| !path.is_empty())
            .map(PathBuf::from);

        Self::new(io::stdout(), output_file)
    }
}

impl<W: Write> WorkflowReporter<W> {
    pub fn new(out: W, output_file: Option<PathBuf>) -> Self {
        Self { out, output_file }
    }

    /// Consume the reporter, returning the underlying writer
    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_line(&mut self, line: &str) {
        if let Err(e) = writeln!(self.out, "{line}") {
            warn!(error = %e, "Failed to write to runner log");
        }
    }

    fn append_output_file(path: &Path, name: &str, value: &str) -> io::Result<()> {
        let delimiter = format!("ghadelimiter_{}", Uuid::new_v4());
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        write!(file, "{name}<<{delimiter}\n{value}\n{delimiter}\n")
    }
}

impl<W: Write> Reporter for WorkflowReporter<W> {
    fn info(&mut self, message: &str) {
        self.write_line(message);
    }

    fn set_output(&mut self, name: &str, value: &str) -> Result<(), LabelerError> {
        match &self.output_file {
            Some(path) => Self::append_output_file(path, name, value).map_err(|source| {
                LabelerError::Output {
                    name: name.to_string(),
                    source,
                }
            }),
            None => {
                let line = format!(
                    "::set-output name={}::{}",
                    escape_property(name),
                    escape_data(value)
                );
                self.write_line(&line);
                Ok(())
            }
        }
    }

    fn set_failed(&mut self, message: &str) {
        let line = format!("::error::{}", escape_data(message));
        self.write_line(&line);
    }
}

/// Escape a workflow-command message
fn escape_data(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Escape a workflow-command property value
fn escape_property(value: &str) -> String {
    escape_data(value).replace(':', "%3A").replace(',', "%2C")
}
