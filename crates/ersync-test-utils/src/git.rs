//! Git repository fixtures.
//!
//! Sync runs fetch from and push to a shared remote, so most tests need a bare
//! remote with some history plus a place to clone it into. [`RemoteFixture`]
//! builds that with the `git` CLI; assertions read the remote back with `git2`.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

/// Branch every fixture publishes to.
pub const FIXTURE_BRANCH: &str = "master";

/// Run a git command in `dir`.
///
/// # Panics
/// Panics if git cannot be spawned or exits unsuccessfully.
pub fn run_git(dir: &Path, args: &[&str]) {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .unwrap_or_else(|e| panic!("run_git: failed to run `git {args:?}`: {e}"));
    if !output.status.success() {
        panic!(
            "run_git: `git {args:?}` failed in {}:\n{}",
            dir.display(),
            String::from_utf8_lossy(&output.stderr)
        );
    }
}

fn configure_identity(dir: &Path) {
    run_git(dir, &["config", "user.email", "test@test.com"]);
    run_git(dir, &["config", "user.name", "Test User"]);
    run_git(dir, &["config", "commit.gpgsign", "false"]);
}

/// A bare remote plus a seed clone used to publish history into it.
pub struct RemoteFixture {
    temp_dir: TempDir,
}

impl RemoteFixture {
    /// Create a bare remote whose `master` holds one empty commit per message,
    /// oldest first.
    ///
    /// # Panics
    /// Panics if any git operation fails.
    pub fn with_history(messages: &[&str]) -> Self {
        let temp_dir = TempDir::new().unwrap();
        let fixture = Self { temp_dir };

        let remote = fixture.remote_path();
        fs::create_dir_all(&remote).unwrap();
        run_git(&remote, &["init", "--bare"]);
        run_git(
            &remote,
            &["symbolic-ref", "HEAD", &format!("refs/heads/{FIXTURE_BRANCH}")],
        );

        let seed = fixture.seed_path();
        fs::create_dir_all(&seed).unwrap();
        run_git(&seed, &["init"]);
        configure_identity(&seed);
        run_git(
            &seed,
            &["symbolic-ref", "HEAD", &format!("refs/heads/{FIXTURE_BRANCH}")],
        );
        run_git(&seed, &["remote", "add", "origin", &fixture.remote_url()]);

        fs::write(seed.join("README.md"), "# data\n").unwrap();
        run_git(&seed, &["add", "README.md"]);
        run_git(&seed, &["commit", "-m", "Initial commit"]);
        for message in messages {
            run_git(&seed, &["commit", "--allow-empty", "-m", message]);
        }
        run_git(&seed, &["push", "origin", FIXTURE_BRANCH]);

        fixture
    }

    /// Root of the fixture's temporary directory.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Path of the bare remote.
    pub fn remote_path(&self) -> PathBuf {
        self.root().join("remote.git")
    }

    /// URL usable by `git clone` and libgit2.
    pub fn remote_url(&self) -> String {
        self.remote_path().to_string_lossy().into_owned()
    }

    /// Path of the seed clone that publishes fixture history.
    pub fn seed_path(&self) -> PathBuf {
        self.root().join("seed")
    }

    /// Suggested location for the working copy under test. Not created.
    pub fn workdir_path(&self) -> PathBuf {
        self.root().join("repo")
    }

    /// Clone the remote into [`workdir_path`](Self::workdir_path) and
    /// configure a commit identity.
    ///
    /// # Panics
    /// Panics if the clone fails.
    pub fn clone_workdir(&self) -> PathBuf {
        let target = self.workdir_path();
        run_git(
            self.root(),
            &["clone", &self.remote_url(), &target.to_string_lossy()],
        );
        configure_identity(&target);
        target
    }

    /// Publish another empty commit to the remote through the seed clone.
    pub fn push_commit(&self, message: &str) {
        let seed = self.seed_path();
        run_git(&seed, &["commit", "--allow-empty", "-m", message]);
        run_git(&seed, &["push", "origin", FIXTURE_BRANCH]);
    }

    /// Commit summaries on the remote's `master`, most recent first.
    pub fn remote_log(&self) -> Vec<String> {
        let repo = git2::Repository::open_bare(self.remote_path()).unwrap();
        let mut revwalk = repo.revwalk().unwrap();
        revwalk
            .push_ref(&format!("refs/heads/{FIXTURE_BRANCH}"))
            .unwrap();
        revwalk
            .map(|oid| {
                let commit = repo.find_commit(oid.unwrap()).unwrap();
                commit.summary().unwrap_or("").to_string()
            })
            .collect()
    }

    /// Read a file from the tip of the remote's `master`, if present.
    pub fn remote_file(&self, path: &str) -> Option<Vec<u8>> {
        let repo = git2::Repository::open_bare(self.remote_path()).unwrap();
        let tree = repo
            .find_reference(&format!("refs/heads/{FIXTURE_BRANCH}"))
            .unwrap()
            .peel_to_tree()
            .unwrap();
        let entry = tree.get_path(Path::new(path)).ok()?;
        let blob = repo.find_blob(entry.id()).ok()?;
        Some(blob.content().to_vec())
    }
}
