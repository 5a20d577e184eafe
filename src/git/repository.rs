use std::path::{Path, PathBuf};

use git2::build::CheckoutBuilder;
use git2::{BranchType, Cred, CredentialType, PushOptions, RemoteCallbacks, Repository, Signature};
use log::debug;

use crate::error::{ChrnError, Result};
use crate::git::{Author, WorkingCopy};

/// Working copy backed by a `git2::Repository`.
///
/// Remote operations authenticate with the SSH private key given at
/// construction, falling back to the SSH agent.
pub struct Git2WorkingCopy {
    repo: Repository,
    ssh_key: PathBuf,
}

impl Git2WorkingCopy {
    /// Discover the repository containing `path`
    pub fn open<P: AsRef<Path>, K: Into<PathBuf>>(path: P, ssh_key: K) -> Result<Self> {
        let repo = Repository::discover(path.as_ref()).map_err(|e| {
            ChrnError::config(format!(
                "{} is not inside a git repository: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        Ok(Git2WorkingCopy {
            repo,
            ssh_key: ssh_key.into(),
        })
    }

    fn workdir(&self) -> Result<&Path> {
        self.repo
            .workdir()
            .ok_or_else(|| ChrnError::config("bare repositories have no working copy"))
    }

    /// Name of the branch HEAD points at
    fn current_branch(&self) -> Result<String> {
        let head = self.repo.head()?;
        if !head.is_branch() {
            return Err(ChrnError::remote("HEAD is detached"));
        }
        head.shorthand()
            .map(str::to_string)
            .ok_or_else(|| ChrnError::remote("HEAD branch name is not valid UTF-8"))
    }

    fn callbacks(&self) -> RemoteCallbacks<'_> {
        let mut callbacks = RemoteCallbacks::new();
        let ssh_key = self.ssh_key.as_path();

        callbacks.credentials(move |_url, username_from_url, allowed_types| {
            let username = username_from_url.unwrap_or("git");

            if allowed_types.contains(CredentialType::SSH_KEY) {
                if ssh_key.exists() {
                    if let Ok(cred) = Cred::ssh_key(username, None, ssh_key, None) {
                        return Ok(cred);
                    }
                }
                if let Ok(cred) = Cred::ssh_key_from_agent(username) {
                    return Ok(cred);
                }
            }

            Cred::default()
        });

        callbacks
    }

    /// Fast-forward `branch_name` to `remote/branch_name` when possible.
    ///
    /// Diverged or missing remote branches are left alone.
    fn fast_forward(&self, branch_name: &str, remote_name: &str) -> Result<()> {
        let tracking = format!("refs/remotes/{}/{}", remote_name, branch_name);
        let remote_oid = match self.repo.find_reference(&tracking) {
            Ok(reference) => reference
                .target()
                .ok_or_else(|| ChrnError::remote(format!("{} reference is invalid", tracking)))?,
            Err(_) => return Ok(()),
        };

        let local = self
            .repo
            .find_branch(branch_name, BranchType::Local)?
            .into_reference();
        let local_oid = match local.target() {
            Some(oid) => oid,
            None => return Ok(()),
        };

        if local_oid == remote_oid || !self.repo.graph_descendant_of(remote_oid, local_oid)? {
            return Ok(());
        }

        let mut reference = self.repo.find_reference(&format!("refs/heads/{}", branch_name))?;
        reference.set_target(remote_oid, &format!("fast-forward from {}", tracking))?;
        self.repo
            .checkout_head(Some(CheckoutBuilder::new().safe()))?;

        debug!("fast-forwarded {} to {}", branch_name, remote_oid);
        Ok(())
    }

    /// Path of `path` relative to the working directory root
    fn relative_to_workdir(&self, path: &Path) -> Result<PathBuf> {
        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()?.join(path)
        };
        let absolute = absolute.canonicalize()?;
        let workdir = self.workdir()?.canonicalize()?;

        absolute
            .strip_prefix(&workdir)
            .map(Path::to_path_buf)
            .map_err(|_| {
                ChrnError::config(format!(
                    "{} is outside the repository at {}",
                    absolute.display(),
                    workdir.display()
                ))
            })
    }
}

impl WorkingCopy for Git2WorkingCopy {
    fn pull(&self, remote_name: &str) -> Result<()> {
        let branch = self.current_branch()?;
        let mut remote = self
            .repo
            .find_remote(remote_name)
            .map_err(|_| ChrnError::remote(format!("Remote '{}' not found", remote_name)))?;

        let mut fetch_options = git2::FetchOptions::new();
        fetch_options.remote_callbacks(self.callbacks());

        let refspec = format!("+refs/heads/*:refs/remotes/{}/*", remote_name);
        remote
            .fetch(&[refspec.as_str()], Some(&mut fetch_options), None)
            .map_err(|e| {
                ChrnError::remote(format!("Failed to fetch from remote '{}': {}", remote_name, e))
            })?;

        self.fast_forward(&branch, remote_name)
    }

    fn create_branch(&self, name: &str) -> Result<()> {
        let head = self.repo.head()?.peel_to_commit()?;
        self.repo.branch(name, &head, false)?;
        debug!("created branch {} at {}", name, head.id());
        Ok(())
    }

    fn checkout(&self, branch: &str) -> Result<()> {
        let refname = format!("refs/heads/{}", branch);
        let target = self.repo.revparse_single(&refname)?;

        self.repo
            .checkout_tree(&target, Some(CheckoutBuilder::new().safe()))?;
        self.repo.set_head(&refname)?;
        Ok(())
    }

    fn stage_file(&self, path: &Path) -> Result<()> {
        let relative = self.relative_to_workdir(path)?;
        let mut index = self.repo.index()?;
        index.add_path(&relative)?;
        index.write()?;
        debug!("staged {}", relative.display());
        Ok(())
    }

    fn commit(&self, message: &str, author: Option<&Author>) -> Result<String> {
        let signature = match author {
            Some(author) => Signature::now(&author.name, &author.email)?,
            None => self.repo.signature()?,
        };

        let mut index = self.repo.index()?;
        let tree = self.repo.find_tree(index.write_tree()?)?;
        let parent = self.repo.head()?.peel_to_commit()?;

        let oid = self.repo.commit(
            Some("HEAD"),
            &signature,
            &signature,
            message,
            &tree,
            &[&parent],
        )?;

        Ok(oid.to_string())
    }

    fn push(&self, remote_name: &str, branch: &str) -> Result<()> {
        let mut remote = self
            .repo
            .find_remote(remote_name)
            .map_err(|_| ChrnError::remote(format!("No remote named '{}' found", remote_name)))?;

        let mut callbacks = self.callbacks();
        callbacks.push_update_reference(|refname, status| match status {
            Some(status) => Err(git2::Error::from_str(&format!(
                "Push failed for {}: {}",
                refname, status
            ))),
            None => Ok(()),
        });

        let mut push_options = PushOptions::new();
        push_options.remote_callbacks(callbacks);

        let refspec = format!("refs/heads/{}:refs/heads/{}", branch, branch);
        remote
            .push(&[refspec.as_str()], Some(&mut push_options))
            .map_err(|e| {
                if e.class() == git2::ErrorClass::Net {
                    ChrnError::remote(format!("Network error during push: {}", e))
                } else {
                    ChrnError::remote(format!("Failed to push '{}': {}", branch, e))
                }
            })
    }
}
