//! `rotate`: cut a release branch with the changelog and version bumped.

use std::path::Path;

use chrono::NaiveDate;

use crate::boundary::BoundaryWarning;
use crate::changelog::Changelog;
use crate::cli::orchestration::{Outcome, RotateOptions, Settings};
use crate::error::{ChrnError, Result};
use crate::forge::Forge;
use crate::git::WorkingCopy;
use crate::ui::{self, Confirm};
use crate::version::{write_version_file, Version, VersionBump};

/// Version used when no previous release can be read
pub const FALLBACK_VERSION: &str = "0.0.1";

/// Name of the branch carrying the release commit
pub fn release_branch(version: &str) -> String {
    format!("release/{}", version)
}

/// Fail unless the SSH key used for pushing exists.
pub fn ensure_ssh_key(path: &Path) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(ChrnError::auth(format!(
            "SSH key not found at {}",
            path.display()
        )))
    }
}

/// Bare version the next release will carry.
///
/// The latest release is stripped of its tag prefix and bumped. When it
/// cannot be read or parsed the result is [`FALLBACK_VERSION`]. A bump past
/// the largest representable component is an error.
pub async fn next_version(
    settings: &Settings,
    options: &RotateOptions,
    forge: &dyn Forge,
) -> Result<String> {
    let latest = match forge.latest_release(&settings.repo).await {
        Ok(tag) => tag,
        Err(e) => return Ok(fallback(e.to_string())),
    };

    let current = match Version::parse(settings.tag_style.strip(&latest)) {
        Ok(version) => version,
        Err(e) => return Ok(fallback(e.to_string())),
    };

    if VersionBump::from_name(&options.bump).is_none() {
        ui::display_boundary_warning(&BoundaryWarning::UnknownBumpKind {
            kind: options.bump.clone(),
        });
    }

    Ok(current.bump_by_name(&options.bump)?.to_string())
}

fn fallback(reason: String) -> String {
    ui::display_boundary_warning(&BoundaryWarning::LatestReleaseUnavailable {
        reason,
        fallback: FALLBACK_VERSION.to_string(),
    });
    FALLBACK_VERSION.to_string()
}

/// Run the `rotate` workflow.
///
/// The rotated changelog is computed before the release branch is cut, so a
/// malformed document leaves the working copy on its original branch.
/// Everything up to the release commit happens locally. Pushing and opening
/// the pull request wait for confirmation.
pub async fn run(
    settings: &Settings,
    options: &RotateOptions,
    forge: &dyn Forge,
    repo: &dyn WorkingCopy,
    confirm: &mut dyn Confirm,
    today: NaiveDate,
) -> Result<Outcome> {
    let version = next_version(settings, options, forge).await?;
    ui::display_status(&format!(
        "Using {} as the latest version for this project.",
        version
    ));

    ui::display_status("Pulling repo...");
    if let Err(e) = repo.pull(&settings.remote) {
        ui::display_boundary_warning(&BoundaryWarning::PullFailed {
            remote: settings.remote.clone(),
            reason: e.to_string(),
        });
    }

    ui::display_status("Bumping changelog file");
    let rotated =
        Changelog::read(&settings.file)?.rotate(&version, today, &settings.tag_style)?;

    let branch = release_branch(&version);
    ui::display_status(&format!("Creating a new branch.. {}", branch));
    repo.create_branch(&branch)?;
    repo.checkout(&branch)?;
    ui::display_success("Branch created.");

    write_version_file(&options.version_file, &version)?;
    rotated.write(&settings.file)?;
    ui::display_success("Changelog/version modified.");

    ui::display_status("Committing to the branch");
    repo.stage_file(&settings.file)?;
    repo.stage_file(&options.version_file)?;
    let message = format!("Release {}", version);
    repo.commit(&message, settings.author.as_ref())?;
    ui::display_success("Branch committed.");

    if !confirm.confirm("Opening PR, do you want to proceed?")? {
        ui::display_aborted("Cya.");
        return Ok(Outcome::Declined);
    }

    ui::display_status("Pushing to remote...");
    repo.push(&settings.remote, &branch)?;

    ui::display_status("Creating a new PR...");
    let pr = forge
        .create_pull_request(&settings.repo, &branch, &settings.base_branch, &message)
        .await?;
    ui::display_success(&pr.url);
    ui::display_success("PR opened.");

    Ok(Outcome::Completed)
}
