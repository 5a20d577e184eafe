use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{CreatedPullRequest, Forge, MergedPullRequest};
use crate::error::{ChrnError, Result};

/// A release as stored by [MockForge]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockRelease {
    pub tag: String,
    pub body: String,
    pub created_at: Option<DateTime<Utc>>,
}

/// A pull request opened against [MockForge]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockPullRequest {
    pub repo: String,
    pub head: String,
    pub base: String,
    pub title: String,
}

/// In-memory forge for testing without network access
pub struct MockForge {
    releases: Mutex<Vec<MockRelease>>,
    search_results: Vec<MergedPullRequest>,
    queries: Mutex<Vec<String>>,
    pull_requests: Mutex<Vec<MockPullRequest>>,
    failures: HashMap<&'static str, String>,
}

impl MockForge {
    /// Create a forge with no releases and an empty search index
    pub fn new() -> Self {
        MockForge {
            releases: Mutex::new(Vec::new()),
            search_results: Vec::new(),
            queries: Mutex::new(Vec::new()),
            pull_requests: Mutex::new(Vec::new()),
            failures: HashMap::new(),
        }
    }

    /// Add a published release; the last one added is the latest
    pub fn with_release(self, tag: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        self.lock_releases().push(MockRelease {
            tag: tag.into(),
            body: String::new(),
            created_at: Some(created_at),
        });
        self
    }

    /// Pull requests returned by every search
    pub fn with_search_results(mut self, results: Vec<MergedPullRequest>) -> Self {
        self.search_results = results;
        self
    }

    /// Make the named operation (e.g. `"latest_release"`) fail
    pub fn failing(mut self, operation: &'static str, message: impl Into<String>) -> Self {
        self.failures.insert(operation, message.into());
        self
    }

    /// Every release, published ones first
    pub fn releases(&self) -> Vec<MockRelease> {
        self.lock_releases().clone()
    }

    /// Every query passed to `search_merged_prs`
    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Every pull request opened
    pub fn pull_requests(&self) -> Vec<MockPullRequest> {
        self.pull_requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn lock_releases(&self) -> std::sync::MutexGuard<'_, Vec<MockRelease>> {
        self.releases.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn check(&self, operation: &'static str) -> Result<()> {
        match self.failures.get(operation) {
            Some(message) => Err(ChrnError::network(message.clone())),
            None => Ok(()),
        }
    }
}

impl Default for MockForge {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Forge for MockForge {
    async fn latest_release(&self, _repo: &str) -> Result<String> {
        self.check("latest_release")?;
        self.lock_releases()
            .last()
            .map(|release| release.tag.clone())
            .ok_or_else(|| ChrnError::network("Not Found: no releases"))
    }

    async fn release_created_at(&self, _repo: &str, tag: &str) -> Result<DateTime<Utc>> {
        self.check("release_created_at")?;
        self.lock_releases()
            .iter()
            .find(|release| release.tag == tag)
            .and_then(|release| release.created_at)
            .ok_or_else(|| ChrnError::network(format!("failed to get release tag {}", tag)))
    }

    async fn search_merged_prs(&self, query: &str) -> Result<Vec<MergedPullRequest>> {
        self.check("search_merged_prs")?;
        self.queries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(query.to_string());
        Ok(self.search_results.clone())
    }

    async fn create_release(&self, _repo: &str, tag: &str, body: &str) -> Result<()> {
        self.check("create_release")?;
        self.lock_releases().push(MockRelease {
            tag: tag.to_string(),
            body: body.to_string(),
            created_at: None,
        });
        Ok(())
    }

    async fn create_pull_request(
        &self,
        repo: &str,
        head: &str,
        base: &str,
        title: &str,
    ) -> Result<CreatedPullRequest> {
        self.check("create_pull_request")?;
        let mut pulls = self.pull_requests.lock().unwrap_or_else(|e| e.into_inner());
        pulls.push(MockPullRequest {
            repo: repo.to_string(),
            head: head.to_string(),
            base: base.to_string(),
            title: title.to_string(),
        });
        Ok(CreatedPullRequest {
            url: format!("https://forge.test/{}/pull/{}", repo, pulls.len()),
        })
    }

    async fn update_release(&self, _repo: &str, tag: &str, body: &str) -> Result<()> {
        self.check("update_release")?;
        let mut releases = self.lock_releases();
        let release = releases
            .iter_mut()
            .find(|release| release.tag == tag)
            .ok_or_else(|| ChrnError::network(format!("Not Found: release {}", tag)))?;
        release.body = body.to_string();
        Ok(())
    }
}
