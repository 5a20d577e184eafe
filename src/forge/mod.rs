//! Code-forge abstraction layer
//!
//! The [Forge] trait covers the handful of hosted-repository calls chrn
//! needs: reading releases, searching merged pull requests, and publishing
//! releases or pull requests. Implementations:
//!
//! - [github::OctocrabForge]: GitHub through the `octocrab` client
//! - [mock::MockForge]: in-memory forge recording every mutation, for tests
//!
//! Orchestration code only sees `&dyn Forge`.

pub mod github;
pub mod mock;

pub use github::OctocrabForge;
pub use mock::MockForge;

use std::fs;
use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;

use crate::error::Result;

/// A merged pull request as returned by the forge's search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedPullRequest {
    pub title: String,
    /// Browser URL of the pull request
    pub url: String,
    /// Label names in the order the forge reports them
    pub labels: Vec<String>,
}

/// A pull request opened by chrn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedPullRequest {
    pub url: String,
}

/// Hosted-repository operations used by the release workflows.
///
/// Every method targets a repository of the owner the forge was created
/// for. Failures surface as [crate::error::ChrnError::Network].
#[async_trait]
pub trait Forge: Send + Sync {
    /// Tag name of the latest published release
    async fn latest_release(&self, repo: &str) -> Result<String>;

    /// Creation time of the release published for `tag`
    async fn release_created_at(&self, repo: &str, tag: &str) -> Result<DateTime<Utc>>;

    /// Run an issue search and return every matching pull request
    async fn search_merged_prs(&self, query: &str) -> Result<Vec<MergedPullRequest>>;

    /// Publish a release named after `tag` with `body` as its notes
    async fn create_release(&self, repo: &str, tag: &str, body: &str) -> Result<()>;

    /// Open a pull request from `head` into `base`
    async fn create_pull_request(
        &self,
        repo: &str,
        head: &str,
        base: &str,
        title: &str,
    ) -> Result<CreatedPullRequest>;

    /// Replace the notes of the release published for `tag`
    async fn update_release(&self, repo: &str, tag: &str, body: &str) -> Result<()>;
}

/// Reads an API token from `path`.
///
/// A missing, unreadable or blank file yields `None`; callers fall back to an
/// unauthenticated client.
pub fn load_token(path: &Path) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(contents) => {
            let token = contents.trim();
            if token.is_empty() {
                debug!("token file {} is empty", path.display());
                None
            } else {
                Some(token.to_string())
            }
        }
        Err(e) => {
            debug!("no token from {}: {}", path.display(), e);
            None
        }
    }
}

/// Formats a timestamp the way the forge's search syntax expects it.
pub fn search_timestamp(time: &DateTime<Utc>) -> String {
    time.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}
