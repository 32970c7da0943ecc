//! # Event Context
//!
//! Trigger metadata for a run, read once from the GitHub Actions runner
//! environment and passed explicitly to the orchestrator.
//!
//! - `GITHUB_EVENT_NAME` - event that triggered the workflow
//! - `GITHUB_REPOSITORY` - `owner/repo` of the workflow repository
//! - `GITHUB_EVENT_PATH` - path to the JSON webhook payload

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::LabelerError;
use crate::types::RepoRef;

const ENV_EVENT_NAME: &str = "GITHUB_EVENT_NAME";
const ENV_REPOSITORY: &str = "GITHUB_REPOSITORY";
const ENV_EVENT_PATH: &str = "GITHUB_EVENT_PATH";

/// The parts of a webhook payload a run looks at
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventPayload {
    /// Present for `pull_request` and `pull_request_target` events
    #[serde(default)]
    pub pull_request: Option<PullRequestPayload>,

    #[serde(default)]
    pub repository: Option<RepositoryPayload>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestPayload {
    pub number: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RepositoryPayload {
    pub name: String,
    pub owner: OwnerPayload,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OwnerPayload {
    pub login: String,
}

/// Trigger metadata for one run
#[derive(Debug, Clone, Default)]
pub struct EventContext {
    event_name: String,
    repository: Option<String>,
    payload: EventPayload,
}

impl EventContext {
    pub fn new(
        event_name: impl Into<String>,
        repository: Option<String>,
        payload: EventPayload,
    ) -> Self {
        Self {
            event_name: event_name.into(),
            repository,
            payload,
        }
    }

    /// Context for a pull request event on `repo`
    #[must_use]
    pub fn pull_request(repo: &RepoRef, number: u64) -> Self {
        Self::new(
            "pull_request",
            Some(repo.to_string()),
            EventPayload {
                pull_request: Some(PullRequestPayload { number }),
                repository: None,
            },
        )
    }

    /// Read the context from the runner environment.
    ///
    /// # Errors
    ///
    /// Returns [`LabelerError::Context`] if the payload file exists but
    /// cannot be read or parsed.
    pub fn from_env() -> Result<Self, LabelerError> {
        Self::load(
            std::env::var(ENV_EVENT_NAME).ok(),
            std::env::var(ENV_REPOSITORY).ok(),
            std::env::var_os(ENV_EVENT_PATH).map(PathBuf::from),
        )
    }

    /// Build a context from raw runner values.
    ///
    /// A payload path that does not exist yields an empty payload.
    ///
    /// # Errors
    ///
    /// Returns [`LabelerError::Context`] if the payload cannot be read or parsed.
    pub fn load(
        event_name: Option<String>,
        repository: Option<String>,
        event_path: Option<PathBuf>,
    ) -> Result<Self, LabelerError> {
        let payload = match event_path {
            Some(path) if path.exists() => read_payload(&path)?,
            Some(path) => {
                warn!(path = %path.display(), "Event payload file does not exist");
                EventPayload::default()
            }
            None => EventPayload::default(),
        };

        let context = Self::new(
            event_name.unwrap_or_default(),
            repository.filter(|r| !r.is_empty()),
            payload,
        );

        debug!(
            event = %context.event_name,
            repository = ?context.repository,
            pull_request = ?context.pull_request_number(),
            "Loaded event context"
        );

        Ok(context)
    }

    #[must_use]
    pub fn event_name(&self) -> &str {
        &self.event_name
    }

    /// Pull request number, if the payload carries a pull request
    #[must_use]
    pub fn pull_request_number(&self) -> Option<u64> {
        self.payload.pull_request.as_ref().map(|pr| pr.number)
    }

    /// Repository the event belongs to.
    ///
    /// `GITHUB_REPOSITORY` takes precedence over the payload's repository.
    ///
    /// # Errors
    ///
    /// Returns [`LabelerError::Context`] if neither source names a repository
    /// or `GITHUB_REPOSITORY` is malformed.
    pub fn repo(&self) -> Result<RepoRef, LabelerError> {
        if let Some(repository) = &self.repository {
            return RepoRef::parse(repository);
        }

        self.payload
            .repository
            .as_ref()
            .map(|repository| RepoRef::new(&repository.owner.login, &repository.name))
            .ok_or_else(|| {
                LabelerError::Context(format!(
                    "{ENV_REPOSITORY} is not set and the event payload has no repository"
                ))
            })
    }
}

fn read_payload(path: &Path) -> Result<EventPayload, LabelerError> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        LabelerError::Context(format!(
            "failed to read event payload {}: {e}",
            path.display()
        ))
    })?;

    serde_json::from_str(&contents).map_err(|e| {
        LabelerError::Context(format!(
            "failed to parse event payload {}: {e}",
            path.display()
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn payload_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_pull_request_payload() {
        let file = payload_file(
            r#"{
                "action": "opened",
                "number": 42,
                "pull_request": { "number": 42, "title": "Add docs" },
                "repository": { "name": "widgets", "owner": { "login": "octo" } }
            }"#,
        );

        let context = EventContext::load(
            Some("pull_request".to_string()),
            Some("octo/widgets".to_string()),
            Some(file.path().to_path_buf()),
        )
        .unwrap();

        assert_eq!(context.event_name(), "pull_request");
        assert_eq!(context.pull_request_number(), Some(42));
        assert_eq!(context.repo().unwrap(), RepoRef::new("octo", "widgets"));
    }

    #[test]
    fn test_push_payload_is_not_a_pull_request() {
        let file = payload_file(r#"{ "ref": "refs/heads/main", "commits": [] }"#);

        let context = EventContext::load(
            Some("push".to_string()),
            Some("octo/widgets".to_string()),
            Some(file.path().to_path_buf()),
        )
        .unwrap();

        assert!(context.pull_request_number().is_none());
    }

    #[test]
    fn test_missing_payload_file_is_empty_payload() {
        let dir = tempfile::tempdir().unwrap();
        let context = EventContext::load(
            Some("pull_request".to_string()),
            None,
            Some(dir.path().join("event.json")),
        )
        .unwrap();

        assert!(context.pull_request_number().is_none());
    }

    #[test]
    fn test_malformed_payload_is_an_error() {
        let file = payload_file("{ not json");
        let result = EventContext::load(None, None, Some(file.path().to_path_buf()));
        assert!(matches!(result, Err(LabelerError::Context(_))));
    }

    #[test]
    fn test_repo_falls_back_to_payload() {
        let file = payload_file(
            r#"{
                "pull_request": { "number": 7 },
                "repository": { "name": "widgets", "owner": { "login": "octo" } }
            }"#,
        );

        let context = EventContext::load(None, None, Some(file.path().to_path_buf())).unwrap();
        assert_eq!(context.repo().unwrap(), RepoRef::new("octo", "widgets"));
    }

    #[test]
    fn test_repo_missing_everywhere() {
        let context = EventContext::load(None, None, None).unwrap();
        assert!(matches!(context.repo(), Err(LabelerError::Context(_))));
    }

    #[test]
    fn test_pull_request_constructor() {
        let repo = RepoRef::new("octo", "widgets");
        let context = EventContext::pull_request(&repo, 9);
        assert_eq!(context.pull_request_number(), Some(9));
        assert_eq!(context.repo().unwrap(), repo);
    }
}
