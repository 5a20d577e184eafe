//! `note`: publish the newest changelog section as a forge release.

use crate::changelog::Changelog;
use crate::cli::orchestration::{Outcome, Settings};
use crate::error::{ChrnError, Result};
use crate::forge::Forge;
use crate::ui::{self, Confirm};

/// Run the `note` workflow.
///
/// The release is created only after the user confirms; declining leaves
/// the forge untouched.
pub async fn run(
    settings: &Settings,
    forge: &dyn Forge,
    confirm: &mut dyn Confirm,
) -> Result<Outcome> {
    let release = Changelog::read(&settings.file)?.first_release();
    if release.is_empty() {
        return Err(ChrnError::parse(format!(
            "no '## [<version>] - <date>' heading in {}",
            settings.file.display()
        )));
    }

    let tag = settings.tag_style.apply(&release.tag);
    ui::display_status(&format!(
        "Creating a new release using tag {} and notes:",
        tag
    ));
    ui::display_notes(&release.notes);

    if !confirm.confirm("Do you want to proceed?")? {
        return Ok(Outcome::Declined);
    }

    forge
        .create_release(&settings.repo, &tag, release.body())
        .await?;
    ui::display_success(&format!("Release {} created.", tag));

    Ok(Outcome::Completed)
}
