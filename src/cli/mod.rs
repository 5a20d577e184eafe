//! Command-line surface: argument definitions and the three workflows.
//!
//! - `changelog` - gather merged pull requests into the Unreleased section
//! - `note` - publish the newest release section on the forge
//! - `rotate` - cut a release branch and open a pull request

pub mod args;
pub mod changelog;
pub mod note;
pub mod orchestration;
pub mod rotate;

pub use args::{Args, Command};
pub use orchestration::{ChangelogOptions, Outcome, RotateOptions, Settings};
