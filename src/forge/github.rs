//! GitHub implementation of [Forge] on top of octocrab.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;
use octocrab::Octocrab;

use super::{CreatedPullRequest, Forge, MergedPullRequest};
use crate::error::{ChrnError, Result};

const SEARCH_PAGE_SIZE: u8 = 100;

/// GitHub client bound to one repository owner
#[derive(Debug, Clone)]
pub struct OctocrabForge {
    octocrab: Octocrab,
    owner: String,
}

impl OctocrabForge {
    /// Build a client for `owner`, authenticated when a token is given.
    ///
    /// Without a token only read calls will succeed.
    pub fn new(owner: impl Into<String>, token: Option<String>) -> Result<Self> {
        let owner = owner.into();
        let mut builder = Octocrab::builder();

        match token {
            Some(token) => {
                debug!("using authenticated GitHub client for {}", owner);
                builder = builder.personal_token(token);
            }
            None => debug!("using unauthenticated GitHub client for {}", owner),
        }

        let octocrab = builder
            .build()
            .map_err(|e| ChrnError::auth(format!("cannot build GitHub client: {}", e)))?;

        Ok(OctocrabForge { octocrab, owner })
    }
}

#[async_trait]
impl Forge for OctocrabForge {
    async fn latest_release(&self, repo: &str) -> Result<String> {
        debug!("fetching latest release of {}/{}", self.owner, repo);

        let release = self
            .octocrab
            .repos(&self.owner, repo)
            .releases()
            .get_latest()
            .await?;

        Ok(release.tag_name)
    }

    async fn release_created_at(&self, repo: &str, tag: &str) -> Result<DateTime<Utc>> {
        debug!("fetching release {} of {}/{}", tag, self.owner, repo);

        let release = self
            .octocrab
            .repos(&self.owner, repo)
            .releases()
            .get_by_tag(tag)
            .await
            .map_err(|e| ChrnError::network(format!("failed to get release tag {}: {}", tag, e)))?;

        release.created_at.ok_or_else(|| {
            ChrnError::network(format!("release {} has no creation time", tag))
        })
    }

    async fn search_merged_prs(&self, query: &str) -> Result<Vec<MergedPullRequest>> {
        debug!("searching issues: {}", query);

        let first_page = self
            .octocrab
            .search()
            .issues_and_pull_requests(query)
            .per_page(SEARCH_PAGE_SIZE)
            .send()
            .await?;
        let issues = self.octocrab.all_pages(first_page).await?;

        debug!("search returned {} results", issues.len());

        Ok(issues
            .into_iter()
            .map(|issue| MergedPullRequest {
                title: issue.title,
                url: issue.html_url.to_string(),
                labels: issue.labels.into_iter().map(|label| label.name).collect(),
            })
            .collect())
    }

    async fn create_release(&self, repo: &str, tag: &str, body: &str) -> Result<()> {
        debug!("creating release {} on {}/{}", tag, self.owner, repo);

        self.octocrab
            .repos(&self.owner, repo)
            .releases()
            .create(tag)
            .name(tag)
            .body(body)
            .send()
            .await?;

        Ok(())
    }

    async fn create_pull_request(
        &self,
        repo: &str,
        head: &str,
        base: &str,
        title: &str,
    ) -> Result<CreatedPullRequest> {
        debug!("opening pull request {} -> {} on {}/{}", head, base, self.owner, repo);

        let pr = self
            .octocrab
            .pulls(&self.owner, repo)
            .create(title, head, base)
            .body(title)
            .send()
            .await?;

        Ok(CreatedPullRequest {
            url: pr.html_url.map(|url| url.to_string()).unwrap_or_default(),
        })
    }

    async fn update_release(&self, repo: &str, tag: &str, body: &str) -> Result<()> {
        debug!("updating notes of release {} on {}/{}", tag, self.owner, repo);

        let handler = self.octocrab.repos(&self.owner, repo);
        let releases = handler.releases();
        let release = releases.get_by_tag(tag).await?;

        releases.update(release.id.0).body(body).send().await?;

        Ok(())
    }
}
