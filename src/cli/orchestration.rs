//! Resolved settings and results shared by the subcommand workflows
//!
//! Command-line flags and the config file are merged once into a
//! [`Settings`] value that every workflow receives by reference. Workflows
//! report through [`Outcome`]; errors propagate as `Result`.

use std::path::PathBuf;

use crate::cli::args::{ChangelogArgs, CommonArgs, RotateArgs};
use crate::config::Config;
use crate::error::{ChrnError, Result};
use crate::git::Author;
use crate::tag::TagStyle;

/// Settings common to every subcommand
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub org: String,
    pub repo: String,
    /// Changelog file
    pub file: PathBuf,
    pub token_file: PathBuf,
    /// Release-note marker label
    pub label: String,
    pub base_branch: String,
    pub remote: String,
    pub tag_style: TagStyle,
    pub author: Option<Author>,
    pub ssh_key: PathBuf,
}

impl Settings {
    /// Merge flags over the config file.
    ///
    /// `--file` and `--repo` have no default; leaving both the flag and the
    /// config key unset is a configuration error.
    pub fn resolve(common: &CommonArgs, config: &Config) -> Result<Self> {
        let repo = common
            .repo
            .clone()
            .or_else(|| config.repo.clone())
            .filter(|repo| !repo.is_empty())
            .ok_or_else(|| ChrnError::config("missing required flag --repo"))?;

        let file = common
            .file
            .clone()
            .or_else(|| config.changelog.clone())
            .ok_or_else(|| ChrnError::config("missing required flag --file"))?;

        Ok(Settings {
            org: common.org.clone().unwrap_or_else(|| config.org.clone()),
            repo,
            file,
            token_file: common
                .token
                .clone()
                .unwrap_or_else(|| config.token_file.clone()),
            label: common
                .label
                .clone()
                .unwrap_or_else(|| config.label.clone()),
            base_branch: config.base_branch.clone(),
            remote: config.remote.clone(),
            tag_style: TagStyle::new(config.tag_prefix.clone()),
            author: config.author.clone(),
            ssh_key: config.ssh_key_path(),
        })
    }
}

/// Options of the `changelog` subcommand
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangelogOptions {
    /// Also write the generated block to this file
    pub output: Option<PathBuf>,
    /// Replace the notes of `current_release` on the forge
    pub save: bool,
    /// Start of the window; the latest release when unset
    pub previous_release: Option<String>,
    /// End of the window; now when unset
    pub current_release: Option<String>,
}

impl From<&ChangelogArgs> for ChangelogOptions {
    fn from(args: &ChangelogArgs) -> Self {
        ChangelogOptions {
            output: args.output.clone(),
            save: args.save,
            previous_release: args.previous_release.clone(),
            current_release: args.current_release.clone(),
        }
    }
}

/// Options of the `rotate` subcommand
#[derive(Debug, Clone, PartialEq)]
pub struct RotateOptions {
    pub bump: String,
    pub version_file: PathBuf,
}

impl RotateOptions {
    pub fn resolve(args: &RotateArgs, config: &Config) -> Self {
        RotateOptions {
            bump: args.bump.clone().unwrap_or_else(|| config.bump.clone()),
            version_file: args
                .version_file
                .clone()
                .unwrap_or_else(|| config.version_file.clone()),
        }
    }
}

/// How a workflow ended when no error occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Every step ran
    Completed,
    /// The user answered "no" at the confirmation prompt
    Declined,
}

impl Outcome {
    /// Process exit status: a declined prompt exits 1
    pub fn exit_code(self) -> u8 {
        match self {
            Outcome::Completed => 0,
            Outcome::Declined => 1,
        }
    }
}
