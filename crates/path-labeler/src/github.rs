//! # GitHub Pull Request API
//!
//! The two host calls a labeling run needs, behind the [`PullRequestApi`]
//! trait, and a REST implementation in [`GitHubClient`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client as HttpClient, Response};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::types::{ChangedFile, RepoRef};

/// Public GitHub REST endpoint
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Files requested per page when listing a pull request
const FILES_PER_PAGE: usize = 100;

/// GitHub stops listing pull request files after 3000 entries
const MAX_FILE_PAGES: u32 = 30;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const USER_AGENT_VALUE: &str = concat!("path-labeler/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Error)]
pub enum GitHubError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("GitHub API error: {status} - {message}")]
    Api { status: u16, message: String },
}

#[derive(Debug, Deserialize)]
struct GitHubErrorBody {
    message: String,
}

/// Pull request operations used by a labeling run
#[async_trait]
pub trait PullRequestApi: Send + Sync {
    /// List the files changed by a pull request
    async fn list_changed_files(
        &self,
        repo: &RepoRef,
        pr_number: u64,
    ) -> Result<Vec<ChangedFile>, GitHubError>;

    /// Add labels to a pull request's issue
    async fn add_labels(
        &self,
        repo: &RepoRef,
        pr_number: u64,
        labels: &[String],
    ) -> Result<(), GitHubError>;
}

/// GitHub REST API client
#[derive(Clone)]
pub struct GitHubClient {
    http_client: HttpClient,
    base_url: String,
    token: String,
}

impl GitHubClient {
    /// Create a client for `base_url` authenticating with `token`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: &str, token: &str) -> Result<Self, GitHubError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static("2022-11-28"),
        );
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

        let http_client = HttpClient::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    /// Fetch one page of changed files
    async fn files_page(
        &self,
        repo: &RepoRef,
        pr_number: u64,
        page: u32,
    ) -> Result<Vec<ChangedFile>, GitHubError> {
        let url = format!(
            "{}/repos/{}/{}/pulls/{}/files",
            self.base_url, repo.owner, repo.name, pr_number
        );

        let response = self
            .http_client
            .get(&url)
            .header(AUTHORIZATION, format!("Bearer {}", self.token))
            .query(&[("per_page", FILES_PER_PAGE.to_string()), ("page", page.to_string())])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl PullRequestApi for GitHubClient {
    #[instrument(skip(self), fields(repo = %repo, pr_number = %pr_number))]
    async fn list_changed_files(
        &self,
        repo: &RepoRef,
        pr_number: u64,
    ) -> Result<Vec<ChangedFile>, GitHubError> {
        let mut files = Vec::new();

        for page in 1..=MAX_FILE_PAGES {
            let batch = self.files_page(repo, pr_number, page).await?;
            let count = batch.len();
            files.extend(batch);

            debug!(page, count, total = files.len(), "Fetched changed files page");

            if count < FILES_PER_PAGE {
                return Ok(files);
            }
        }

        warn!(
            total = files.len(),
            "Pull request file listing reached the GitHub page limit and may be truncated"
        );
        Ok(files)
    }

    #[instrument(skip(self), fields(repo = %repo, pr_number = %pr_number, labels = ?labels))]
    async fn add_labels(
        &self,
        repo: &RepoRef,
        pr_number: u64,
        labels: &[String],
    ) -> Result<(), GitHubError> {
        if labels.is_empty() {
            return Ok(());
        }

        let url = format!(
            "{}/repos/{}/{}/issues/{}/labels",
            self.base_url, repo.owner, repo.name, pr_number
        );

        let response = self
            .http_client
            .post(&url)
            .header(AUTHORIZATION, format!("Bearer {}", self.token))
            .json(&serde_json::json!({ "labels": labels }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        info!("Added {} labels to PR #{}", labels.len(), pr_number);
        Ok(())
    }
}

/// Build an [`GitHubError::Api`] from a failed response
async fn api_error(response: Response) -> GitHubError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    let message = serde_json::from_str::<GitHubErrorBody>(&body)
        .map(|error| error.message)
        .ok()
        .filter(|message| !message.is_empty())
        .or_else(|| (!body.trim().is_empty()).then(|| body.trim().to_string()))
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown error").to_string());

    GitHubError::Api {
        status: status.as_u16(),
        message,
    }
}
