//! libgit2-backed working copy

use chrono::{DateTime, FixedOffset};
use git2::build::{CheckoutBuilder, RepoBuilder};
use git2::{
    FetchOptions, IndexAddOption, ObjectType, PushOptions, Repository, ResetType, Signature,
};

use ersync_fs::NormalizedPath;

use crate::backend::{RemoteSpec, VcsBackend};
use crate::commits::{CommitInfo, list_recent_commits};
use crate::helpers::{git_time, remote_callbacks, tracking_commit};
use crate::{Error, Result};

/// Commit identity used when the repository has no `user.name` configured.
pub const FALLBACK_NAME: &str = "ersync";
pub const FALLBACK_EMAIL: &str = "ersync@localhost";

/// Name and email stamped on sync commits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub name: String,
    pub email: String,
}

impl Identity {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

/// A non-bare working copy tracking one branch of one remote.
pub struct GitRepository {
    root: NormalizedPath,
    repo: Repository,
    spec: RemoteSpec,
    identity: Option<Identity>,
}

impl GitRepository {
    /// Open an existing working copy at `root`.
    pub fn open(root: NormalizedPath, spec: RemoteSpec) -> Result<Self> {
        let repo = Repository::open(root.to_native())?;
        Ok(Self {
            root,
            repo,
            spec,
            identity: None,
        })
    }

    /// Open the working copy at `root`, cloning `remote_url` into it first
    /// when no repository exists there yet.
    pub fn open_or_clone(
        root: NormalizedPath,
        spec: RemoteSpec,
        remote_url: Option<&str>,
    ) -> Result<Self> {
        if root.join(".git").exists() {
            tracing::debug!(path = %root, "Opening existing working copy");
            return Self::open(root, spec);
        }

        let Some(url) = remote_url else {
            return Err(Error::RepositoryMissing {
                path: root.to_native(),
            });
        };

        if let Some(parent) = root.parent() {
            ersync_fs::io::ensure_dir(&parent)?;
        }

        tracing::info!(url = %url, path = %root, branch = %spec.branch, "git.clone");

        let mut fetch_options = FetchOptions::new();
        fetch_options.remote_callbacks(remote_callbacks(git2::Config::open_default().ok()));

        let repo = RepoBuilder::new()
            .branch(&spec.branch)
            .fetch_options(fetch_options)
            .clone(url, &root.to_native())?;

        // A clone names its remote "origin"; honour a differently named spec.
        if spec.remote != "origin" {
            repo.remote_rename("origin", &spec.remote)?;
        }

        Ok(Self {
            root,
            repo,
            spec,
            identity: None,
        })
    }

    /// Override the commit identity instead of reading it from git config.
    pub fn with_identity(mut self, identity: Option<Identity>) -> Self {
        self.identity = identity;
        self
    }

    /// Remote and branch this working copy syncs against.
    pub fn remote_spec(&self) -> &RemoteSpec {
        &self.spec
    }

    fn signature(&self, at: Option<&DateTime<FixedOffset>>) -> Result<Signature<'static>> {
        let (name, email) = match &self.identity {
            Some(identity) => (identity.name.clone(), identity.email.clone()),
            None => match self.repo.signature() {
                Ok(sig) => (
                    sig.name().unwrap_or(FALLBACK_NAME).to_string(),
                    sig.email().unwrap_or(FALLBACK_EMAIL).to_string(),
                ),
                Err(_) => (FALLBACK_NAME.to_string(), FALLBACK_EMAIL.to_string()),
            },
        };

        let signature = match at {
            Some(at) => Signature::new(&name, &email, &git_time(at))?,
            None => Signature::now(&name, &email)?,
        };
        Ok(signature)
    }

    fn pathspec(&self, path: &NormalizedPath) -> Result<String> {
        let relative = path
            .relative_to(&self.root)
            .ok_or_else(|| Error::PathOutsideWorkdir {
                path: path.to_string(),
                workdir: self.root.to_string(),
            })?;
        Ok(if relative.is_empty() {
            "*".to_string()
        } else {
            relative
        })
    }
}

impl VcsBackend for GitRepository {
    fn workdir(&self) -> &NormalizedPath {
        &self.root
    }

    fn fetch(&self) -> Result<()> {
        let mut remote =
            self.repo
                .find_remote(&self.spec.remote)
                .map_err(|_| Error::RemoteNotFound {
                    name: self.spec.remote.clone(),
                })?;

        let mut options = FetchOptions::new();
        options.remote_callbacks(remote_callbacks(self.repo.config().ok()));

        // Empty refspec list means the remote's configured fetch refspecs
        remote
            .fetch::<&str>(&[], Some(&mut options), None)
            .map_err(|e| Error::FetchFailed {
                remote: self.spec.remote.clone(),
                message: e.message().to_string(),
            })?;

        let stats = remote.stats();
        tracing::info!(
            remote = %self.spec.remote,
            received_objects = stats.received_objects(),
            "git.fetch"
        );
        Ok(())
    }

    fn reset_hard_to_remote(&self) -> Result<()> {
        let commit = tracking_commit(
            &self.repo,
            &self.spec.tracking_ref(),
            &self.spec.remote,
            &self.spec.branch,
        )?;

        let local_ref = self.spec.local_ref();
        if self.repo.find_reference(&local_ref).is_err() {
            self.repo.branch(&self.spec.branch, &commit, false)?;
        }
        self.repo.set_head(&local_ref)?;

        let mut checkout = CheckoutBuilder::new();
        checkout.force();
        self.repo
            .reset(commit.as_object(), ResetType::Hard, Some(&mut checkout))?;

        tracing::info!(
            target_ref = %self.spec.tracking_ref(),
            commit = %format!("{:.7}", commit.id()),
            "git.reset --hard"
        );
        Ok(())
    }

    fn recent_commits(&self, max_count: usize) -> Result<Vec<CommitInfo>> {
        list_recent_commits(&self.repo, max_count)
    }

    fn stage(&self, paths: &[NormalizedPath]) -> Result<()> {
        let specs = paths
            .iter()
            .map(|p| self.pathspec(p))
            .collect::<Result<Vec<_>>>()?;

        let mut index = self.repo.index()?;
        index.add_all(specs.iter().map(String::as_str), IndexAddOption::DEFAULT, None)?;
        index.update_all(specs.iter().map(String::as_str), None)?;
        index.write()?;

        tracing::info!(paths = ?specs, "git.add");
        Ok(())
    }

    fn unstage(&self, paths: &[NormalizedPath]) -> Result<()> {
        let specs = paths
            .iter()
            .map(|p| self.pathspec(p))
            .collect::<Result<Vec<_>>>()?;

        let head = match self.repo.head() {
            Ok(head) => Some(head.peel(ObjectType::Commit)?),
            Err(_) => None,
        };
        self.repo
            .reset_default(head.as_ref(), specs.iter().map(String::as_str))?;

        tracing::info!(paths = ?specs, "git.reset");
        Ok(())
    }

    fn commit(&self, message: &str, authored_at: Option<DateTime<FixedOffset>>) -> Result<String> {
        let mut index = self.repo.index()?;
        let tree_id = index.write_tree()?;

        let parent = match self.repo.head() {
            Ok(head) => Some(head.peel_to_commit()?),
            Err(_) => None,
        };

        if let Some(parent) = &parent
            && parent.tree_id() == tree_id
        {
            return Err(Error::NothingToCommit {
                message: message.to_string(),
            });
        }

        let tree = self.repo.find_tree(tree_id)?;
        let author = self.signature(authored_at.as_ref())?;
        let committer = self.signature(None)?;
        let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();

        let oid = self
            .repo
            .commit(Some("HEAD"), &author, &committer, message, &tree, &parents)?;

        let hash = format!("{:.7}", oid);
        tracing::info!(
            commit = %hash,
            message = %message,
            authored_at = ?authored_at,
            "git.commit"
        );
        Ok(hash)
    }

    fn push(&self) -> Result<()> {
        let mut remote =
            self.repo
                .find_remote(&self.spec.remote)
                .map_err(|_| Error::RemoteNotFound {
                    name: self.spec.remote.clone(),
                })?;

        let refspec = format!("{0}:{0}", self.spec.local_ref());
        let mut rejection: Option<String> = None;

        {
            let mut callbacks = remote_callbacks(self.repo.config().ok());
            callbacks.push_update_reference(|refname, status| {
                if let Some(status) = status {
                    rejection = Some(format!("{refname}: {status}"));
                }
                Ok(())
            });

            let mut options = PushOptions::new();
            options.remote_callbacks(callbacks);

            remote
                .push(&[&refspec], Some(&mut options))
                .map_err(|e| Error::PushFailed {
                    message: e.message().to_string(),
                })?;
        }

        if let Some(message) = rejection {
            return Err(Error::PushFailed { message });
        }

        tracing::info!(remote = %self.spec.remote, refspec = %refspec, "git.push");
        Ok(())
    }
}
