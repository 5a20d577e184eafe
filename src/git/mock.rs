use std::cell::RefCell;
use std::path::{Path, PathBuf};

use crate::error::{ChrnError, Result};
use crate::git::{Author, WorkingCopy};

/// A call made against [MockWorkingCopy]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitCall {
    Pull(String),
    CreateBranch(String),
    Checkout(String),
    Stage(PathBuf),
    Commit {
        message: String,
        author: Option<String>,
    },
    Push {
        remote: String,
        branch: String,
    },
}

/// Mock working copy for testing without actual git operations
#[derive(Default)]
pub struct MockWorkingCopy {
    calls: RefCell<Vec<GitCall>>,
    fail_pull: bool,
}

impl MockWorkingCopy {
    /// Create a mock where every operation succeeds
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `pull` fail with a remote error
    pub fn with_failing_pull(mut self) -> Self {
        self.fail_pull = true;
        self
    }

    /// Calls made so far, in order
    pub fn calls(&self) -> Vec<GitCall> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: GitCall) {
        self.calls.borrow_mut().push(call);
    }
}

impl WorkingCopy for MockWorkingCopy {
    fn pull(&self, remote: &str) -> Result<()> {
        self.record(GitCall::Pull(remote.to_string()));
        if self.fail_pull {
            return Err(ChrnError::remote(format!(
                "failed to fetch from remote '{}'",
                remote
            )));
        }
        Ok(())
    }

    fn create_branch(&self, name: &str) -> Result<()> {
        self.record(GitCall::CreateBranch(name.to_string()));
        Ok(())
    }

    fn checkout(&self, branch: &str) -> Result<()> {
        self.record(GitCall::Checkout(branch.to_string()));
        Ok(())
    }

    fn stage_file(&self, path: &Path) -> Result<()> {
        self.record(GitCall::Stage(path.to_path_buf()));
        Ok(())
    }

    fn commit(&self, message: &str, author: Option<&Author>) -> Result<String> {
        self.record(GitCall::Commit {
            message: message.to_string(),
            author: author.map(|a| format!("{} <{}>", a.name, a.email)),
        });
        Ok("0000000000000000000000000000000000000000".to_string())
    }

    fn push(&self, remote: &str, branch: &str) -> Result<()> {
        self.record(GitCall::Push {
            remote: remote.to_string(),
            branch: branch.to_string(),
        });
        Ok(())
    }
}
