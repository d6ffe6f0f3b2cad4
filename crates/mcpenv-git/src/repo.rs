//! Git operations over the config directory.
//!
//! The config root is a plain single-checkout repository. Pull is fetch plus
//! fast-forward only: a history that diverged on two machines needs a human,
//! so non-fast-forward pulls fail with guidance instead of auto-merging
//! config files.

use std::path::{Path, PathBuf};

use git2::{Repository, Signature, StatusOptions};

use crate::{Error, Result};

/// Fallback committer identity when the user has no git identity configured.
const FALLBACK_IDENT: &str = "mcp-env";
const FALLBACK_EMAIL: &str = "mcp-env@localhost";

/// Handle to the git repository backing the config root.
#[derive(Debug, Clone)]
pub struct ConfigRepo {
    root: PathBuf,
}

impl ConfigRepo {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn open(&self) -> Result<Repository> {
        Repository::open(&self.root).map_err(|_| Error::NotARepository {
            path: self.root.clone(),
        })
    }

    pub fn is_repo(&self) -> bool {
        Repository::open(&self.root).is_ok()
    }

    /// Initialize a fresh repository at the root.
    pub fn init(&self) -> Result<()> {
        Repository::init(&self.root)?;
        tracing::debug!(root = ?self.root, "initialized git repository");
        Ok(())
    }

    /// Clone `url` into the root. The directory must be empty or absent.
    pub fn clone_from(&self, url: &str) -> Result<()> {
        Repository::clone(url, &self.root).map_err(|e| Error::CloneFailed {
            message: e.message().to_string(),
        })?;
        tracing::debug!(root = ?self.root, url, "cloned config repository");
        Ok(())
    }

    pub fn has_remote(&self) -> bool {
        self.open()
            .ok()
            .and_then(|repo| repo.remotes().ok().map(|r| !r.is_empty()))
            .unwrap_or(false)
    }

    pub fn remote_url(&self) -> Result<Option<String>> {
        let repo = self.open()?;
        match repo.find_remote("origin") {
            Ok(remote) => Ok(remote.url().map(String::from)),
            Err(_) => Ok(None),
        }
    }

    pub fn add_remote(&self, url: &str) -> Result<()> {
        let repo = self.open()?;
        repo.remote("origin", url)?;
        Ok(())
    }

    /// Whether the working tree has no changes, untracked files included.
    pub fn is_clean(&self) -> Result<bool> {
        let repo = self.open()?;
        let mut options = StatusOptions::new();
        options.include_untracked(true).recurse_untracked_dirs(true);
        let statuses = repo.statuses(Some(&mut options))?;
        Ok(statuses.is_empty())
    }

    pub fn current_branch(&self) -> Result<String> {
        let repo = self.open()?;
        let head = repo.head()?;
        if head.is_branch() {
            Ok(head.shorthand().unwrap_or("HEAD").to_string())
        } else {
            Ok("HEAD".to_string())
        }
    }

    /// Stage everything and commit. Handles the unborn-HEAD first commit and
    /// falls back to a tool identity when user.name/user.email are unset.
    pub fn commit_all(&self, message: &str) -> Result<()> {
        let repo = self.open()?;

        let mut index = repo.index()?;
        index.add_all(["*"].iter(), git2::IndexAddOption::DEFAULT, None)?;
        index.write()?;
        let tree_id = index.write_tree()?;
        let tree = repo.find_tree(tree_id)?;

        let signature = repo
            .signature()
            .or_else(|_| Signature::now(FALLBACK_IDENT, FALLBACK_EMAIL))?;

        let parent = repo
            .head()
            .ok()
            .and_then(|head| head.peel_to_commit().ok());
        let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();

        repo.commit(
            Some("HEAD"),
            &signature,
            &signature,
            message,
            &tree,
            &parents,
        )?;
        tracing::debug!(message, "committed config changes");
        Ok(())
    }

    /// Push the current branch to origin, relying on credential helpers.
    pub fn push(&self) -> Result<()> {
        let repo = self.open()?;
        let branch = self.current_branch()?;

        let mut remote = repo.find_remote("origin").map_err(|_| Error::RemoteNotFound {
            name: "origin".to_string(),
        })?;

        let refspec = format!("refs/heads/{branch}:refs/heads/{branch}");
        remote.push(&[&refspec], None).map_err(|e| Error::PushFailed {
            message: e.message().to_string(),
        })?;
        Ok(())
    }

    /// Fetch the current branch from origin and fast-forward onto it.
    pub fn pull(&self) -> Result<()> {
        let repo = self.open()?;
        let branch = self.current_branch()?;

        let mut remote = repo.find_remote("origin").map_err(|_| Error::RemoteNotFound {
            name: "origin".to_string(),
        })?;
        remote
            .fetch(&[branch.as_str()], None, None)
            .map_err(|e| Error::PullFailed {
                message: format!("fetch failed: {}", e.message()),
            })?;

        let fetch_head = repo
            .find_reference("FETCH_HEAD")
            .map_err(|e| Error::PullFailed {
                message: e.message().to_string(),
            })?;
        let fetch_commit = fetch_head.peel_to_commit().map_err(|e| Error::PullFailed {
            message: e.message().to_string(),
        })?;

        let annotated = repo.find_annotated_commit(fetch_commit.id())?;
        let (analysis, _) = repo.merge_analysis(&[&annotated])?;

        if analysis.is_up_to_date() {
            tracing::debug!("already up to date");
            return Ok(());
        }

        if analysis.is_fast_forward() {
            let refname = format!("refs/heads/{branch}");
            let mut reference = repo.find_reference(&refname)?;
            reference.set_target(
                fetch_commit.id(),
                &format!("pull: fast-forward to {}", fetch_commit.id()),
            )?;
            repo.set_head(&refname)?;
            repo.checkout_head(Some(git2::build::CheckoutBuilder::default().force()))?;
            tracing::debug!(target = %fetch_commit.id(), "fast-forwarded");
            return Ok(());
        }

        Err(Error::PullFailed {
            message: format!(
                "histories diverged; resolve manually: git -C {} pull --rebase",
                self.root.display()
            ),
        })
    }
}
