//! Git working-copy abstraction layer
//!
//! The release branch workflow needs a small set of working-copy operations:
//! sync with the remote, branch off HEAD, stage and commit the rewritten
//! files, and push the branch. They are expressed by the [WorkingCopy] trait
//! so orchestration can be exercised without a real repository.
//!
//! - [repository::Git2WorkingCopy]: real implementation using the `git2` crate
//! - [mock::MockWorkingCopy]: records every call, for tests
//!
//! ```rust,no_run
//! # use chrn::git::{Git2WorkingCopy, WorkingCopy};
//! # use std::path::Path;
//! # fn example() -> chrn::Result<()> {
//! let repo = Git2WorkingCopy::open(".", "/home/me/.ssh/id_rsa")?;
//! repo.create_branch("release/1.2.0")?;
//! repo.checkout("release/1.2.0")?;
//! repo.stage_file(Path::new("CHANGELOG.md"))?;
//! repo.commit("Release 1.2.0", None)?;
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::{GitCall, MockWorkingCopy};
pub use repository::Git2WorkingCopy;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Identity recorded on release commits
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Author {
    pub name: String,
    pub email: String,
}

/// Working-copy operations used by the rotate workflow.
///
/// Operations run strictly in sequence and assume nothing else touches the
/// working copy meanwhile.
pub trait WorkingCopy {
    /// Fetch `remote` and fast-forward the checked-out branch
    fn pull(&self, remote: &str) -> Result<()>;

    /// Create a local branch pointing at the current HEAD commit
    fn create_branch(&self, name: &str) -> Result<()>;

    /// Switch HEAD and the working tree to a local branch
    fn checkout(&self, branch: &str) -> Result<()>;

    /// Add a file to the index
    ///
    /// Relative paths are resolved against the process working directory,
    /// not the repository root.
    fn stage_file(&self, path: &Path) -> Result<()>;

    /// Commit the index on top of HEAD and return the new commit id.
    ///
    /// Without an explicit author the repository's configured identity is used.
    fn commit(&self, message: &str, author: Option<&Author>) -> Result<String>;

    /// Push a local branch to the branch of the same name on `remote`
    fn push(&self, remote: &str, branch: &str) -> Result<()>;
}
