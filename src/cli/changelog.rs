//! `changelog`: collect merged pull requests into the Unreleased section.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};

use crate::boundary::BoundaryWarning;
use crate::changelog::Changelog;
use crate::cli::orchestration::{ChangelogOptions, Outcome, Settings};
use crate::error::{ChrnError, Result};
use crate::forge::{search_timestamp, Forge};
use crate::grouper::{render_grouped, PullRequestRecord};
use crate::query::Query;
use crate::ui;

/// Time span whose merged pull requests make up the notes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Resolve the window from the release flags.
///
/// The start is the creation time of `previous_release`, or of the latest
/// release. The end is the creation time of `current_release`, or `now`.
pub async fn release_window(
    settings: &Settings,
    options: &ChangelogOptions,
    forge: &dyn Forge,
    now: DateTime<Utc>,
) -> Result<ReleaseWindow> {
    let start_tag = match &options.previous_release {
        Some(tag) => settings.tag_style.apply(tag),
        None => forge.latest_release(&settings.repo).await?,
    };
    ui::display_success(&format!("Last release version: {}", start_tag));

    let start = forge.release_created_at(&settings.repo, &start_tag).await?;
    let end = match &options.current_release {
        Some(tag) => {
            let end_tag = settings.tag_style.apply(tag);
            forge.release_created_at(&settings.repo, &end_tag).await?
        }
        None => now,
    };

    Ok(ReleaseWindow { start, end })
}

/// Search query for pull requests merged into the base branch in `window`
pub fn merged_pr_query(settings: &Settings, window: &ReleaseWindow) -> Query {
    let start = search_timestamp(&window.start);
    let end = search_timestamp(&window.end);

    Query::new()
        .clause("repo", &[settings.org.as_str(), "/", settings.repo.as_str()])
        .clause("label", &[settings.label.as_str()])
        .clause("is", &["merged"])
        .clause("type", &["pr"])
        .clause("base", &[settings.base_branch.as_str()])
        .clause("merged", &[start.as_str(), "..", end.as_str()])
}

/// Run the `changelog` workflow.
pub async fn run(
    settings: &Settings,
    options: &ChangelogOptions,
    forge: &dyn Forge,
    now: DateTime<Utc>,
) -> Result<Outcome> {
    if options.save && options.current_release.is_none() {
        return Err(ChrnError::config("--save requires --current_release"));
    }

    ui::display_status(&format!(
        "Start fetching unreleased release note from {}/{}",
        settings.org, settings.repo
    ));
    let window = release_window(settings, options, forge, now).await?;
    let query = merged_pr_query(settings, &window).to_string();

    ui::display_status(&format!("Getting PRs for {}", query));
    let pull_requests = forge.search_merged_prs(&query).await?;
    if pull_requests.is_empty() {
        ui::display_boundary_warning(&BoundaryWarning::NoPullRequests {
            query: query.clone(),
        });
    }

    let records: Vec<PullRequestRecord> = pull_requests
        .iter()
        .map(|pr| PullRequestRecord::from_merged(pr, &settings.label))
        .collect();
    let block = render_grouped(&records);

    ui::display_notes(&block);
    let changelog = Changelog::read(&settings.file)?;
    if changelog.has_unreleased_heading() {
        ui::display_status("Modifying changelog file");
        changelog.insert_notes(&block).write(&settings.file)?;
    } else {
        ui::display_boundary_warning(&BoundaryWarning::MissingUnreleasedHeading {
            file: settings.file.display().to_string(),
        });
    }

    if let Some(output) = &options.output {
        write_notes(output, &block)?;
        ui::display_success(&format!("Notes written to {}", output.display()));
    }

    if let Some(current) = options.current_release.as_deref().filter(|_| options.save) {
        let tag = settings.tag_style.apply(current);
        ui::display_status(&format!("Saving notes to release {}", tag));
        forge
            .update_release(&settings.repo, &tag, block.trim_matches('\n'))
            .await?;
        ui::display_success(&format!("Release {} updated.", tag));
    }

    Ok(Outcome::Completed)
}

fn write_notes(path: &Path, block: &str) -> Result<()> {
    let mut notes = block.trim_start_matches('\n').to_string();
    if !notes.is_empty() && !notes.ends_with('\n') {
        notes.push('\n');
    }
    fs::write(path, notes).map_err(|e| {
        ChrnError::Io(std::io::Error::new(
            e.kind(),
            format!("cannot write notes to {}: {}", path.display(), e),
        ))
    })
}
