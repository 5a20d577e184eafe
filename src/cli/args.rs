use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "chrn",
    version,
    about = "A Changelog generator",
    long_about = "Collects merged pull requests into CHANGELOG.md, rotates the Unreleased \
                  section into a versioned release and publishes release notes."
)]
pub struct Args {
    #[arg(short, long, global = true, help = "Custom configuration file path")]
    pub config: Option<PathBuf>,

    #[arg(
        short,
        long,
        global = true,
        action = clap::ArgAction::Count,
        help = "Increase log verbosity (-v info, -vv debug)"
    )]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch merged pull requests since the last release into the changelog
    Changelog(ChangelogArgs),
    /// Publish the newest changelog section as a release
    Note(NoteArgs),
    /// Rotate the Unreleased section into a new version on a release branch
    Rotate(RotateArgs),
}

/// Flags shared by every subcommand
#[derive(clap::Args, Debug, Clone, Default)]
pub struct CommonArgs {
    #[arg(long, help = "Changelog file, e.g. CHANGELOG.md")]
    pub file: Option<PathBuf>,

    #[arg(long, help = "GitHub owner or org [default: knabben]")]
    pub org: Option<String>,

    #[arg(long, help = "GitHub repo")]
    pub repo: Option<String>,

    #[arg(long, help = "GitHub token file (optional) [default: ./token]")]
    pub token: Option<PathBuf>,

    #[arg(long, help = "Release-note label [default: release-note]")]
    pub label: Option<String>,
}

#[derive(clap::Args, Debug, Clone)]
pub struct ChangelogArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    #[arg(long, help = "Also write the generated notes to this file")]
    pub output: Option<PathBuf>,

    #[arg(long, help = "Replace the notes of --current_release on GitHub")]
    pub save: bool,

    #[arg(
        long = "previous_release",
        help = "Release starting the window [default: latest release]"
    )]
    pub previous_release: Option<String>,

    #[arg(
        long = "current_release",
        help = "Release ending the window [default: now]"
    )]
    pub current_release: Option<String>,
}

#[derive(clap::Args, Debug, Clone)]
pub struct NoteArgs {
    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(clap::Args, Debug, Clone)]
pub struct RotateArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    #[arg(long, help = "Bump type [major, minor, patch] [default: minor]")]
    pub bump: Option<String>,

    #[arg(
        long = "version",
        help = "Version file to rewrite [default: version.py]"
    )]
    pub version_file: Option<PathBuf>,
}
