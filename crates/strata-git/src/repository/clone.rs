//! Local clone operations using git2.

use std::path::{Path, PathBuf};

use git2::build::{CheckoutBuilder, RepoBuilder};
use git2::{FetchOptions, FetchPrune, Oid, Repository};
use tempfile::TempDir;
use tracing::{debug, info};

use super::refs::{REMOTE_NAME, local_ref, remote_ref};
use crate::error::GitSourceError;

/// A clone of the configuration repository.
///
/// Branches are checked out as detached heads at their remote-tracking
/// commit, so the working tree always mirrors the last fetch. A clone created
/// in a temporary directory deletes that directory when closed or dropped.
pub struct LocalClone {
    // Declared before `dir` so the handle is released before the directory
    // is removed.
    repo: Repository,
    dir: Option<TempDir>,
    path: PathBuf,
    checked_out: Option<(String, Oid)>,
}

impl LocalClone {
    /// Clones `uri` into a fresh directory under `tmp_path` whose name starts
    /// with `prefix`.
    pub fn clone_into_temp(uri: &str, tmp_path: &Path, prefix: &str) -> Result<Self, GitSourceError> {
        let dir = tempfile::Builder::new().prefix(prefix).tempdir_in(tmp_path)?;
        let path = dir.path().to_path_buf();
        let repo = Self::clone_repo(uri, &path)?;

        Ok(Self {
            repo,
            dir: Some(dir),
            path,
            checked_out: None,
        })
    }

    /// Reopens the clone at `path`, cloning `uri` there first if needed.
    ///
    /// The directory is left in place when the clone is closed.
    pub fn open_or_clone(uri: &str, path: &Path) -> Result<Self, GitSourceError> {
        let repo = if path.join(".git").exists() {
            debug!("Reopening repository at {:?}", path);
            Repository::open(path).map_err(|source| GitSourceError::Open {
                path: path.to_path_buf(),
                source,
            })?
        } else {
            Self::clone_repo(uri, path)?
        };

        Ok(Self {
            repo,
            dir: None,
            path: path.to_path_buf(),
            checked_out: None,
        })
    }

    fn clone_repo(uri: &str, path: &Path) -> Result<Repository, GitSourceError> {
        info!("Cloning repository from {} to {:?}", uri, path);

        RepoBuilder::new()
            .clone(uri, path)
            .map_err(|source| GitSourceError::Clone {
                uri: uri.to_string(),
                path: path.to_path_buf(),
                source,
            })
    }

    /// Returns the working tree root.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the branch the working tree currently mirrors.
    pub fn current_branch(&self) -> Option<&str> {
        self.checked_out.as_ref().map(|(branch, _)| branch.as_str())
    }

    /// Returns the commit HEAD points at.
    pub fn head_commit(&self) -> Result<String, GitSourceError> {
        let commit = self
            .repo
            .head()
            .and_then(|head| head.peel_to_commit())
            .map_err(|e| GitSourceError::git("failed to resolve HEAD", e))?;
        Ok(commit.id().to_string())
    }

    /// Finds the tip of `branch`.
    ///
    /// Only the remote-tracking reference counts while the clone has a
    /// remote, so a branch deleted upstream stays missing after a pruning
    /// fetch even if a local branch of that name survives. A clone without a
    /// remote resolves local branches instead.
    fn branch_commit(&self, branch: &str) -> Result<Oid, GitSourceError> {
        let name = if self.has_remote() {
            remote_ref(branch)
        } else {
            local_ref(branch)
        };

        let reference = match self.repo.find_reference(&name) {
            Ok(reference) => reference,
            Err(e) if e.code() == git2::ErrorCode::NotFound => {
                return Err(GitSourceError::BranchNotFound {
                    branch: branch.to_string(),
                });
            },
            Err(e) => return Err(GitSourceError::git(format!("failed to look up {name}"), e)),
        };

        reference
            .peel_to_commit()
            .map(|commit| commit.id())
            .map_err(|e| GitSourceError::git(format!("{name} does not point at a commit"), e))
    }

    fn has_remote(&self) -> bool {
        self.repo.find_remote(REMOTE_NAME).is_ok()
    }

    /// Makes the working tree mirror `branch`.
    ///
    /// Does nothing when the tree already mirrors the branch's current commit.
    pub fn checkout(&mut self, branch: &str) -> Result<(), GitSourceError> {
        let oid = self.branch_commit(branch)?;

        if let Some((current, current_oid)) = &self.checked_out
            && current == branch
            && *current_oid == oid
        {
            return Ok(());
        }

        let to_checkout_error = |source| GitSourceError::Checkout {
            branch: branch.to_string(),
            source,
        };

        let commit = self.repo.find_commit(oid).map_err(to_checkout_error)?;
        let mut checkout = CheckoutBuilder::new();
        checkout.force();
        self.repo
            .checkout_tree(commit.as_object(), Some(&mut checkout))
            .map_err(to_checkout_error)?;
        self.repo.set_head_detached(oid).map_err(to_checkout_error)?;

        debug!("Checked out {} at {}", branch, oid);
        self.checked_out = Some((branch.to_string(), oid));
        Ok(())
    }

    /// Fetches from the remote, pruning deleted branches, and updates the
    /// working tree if its branch moved.
    ///
    /// Returns the commit HEAD points at afterwards.
    pub fn fetch(&mut self) -> Result<String, GitSourceError> {
        {
            let mut remote = self
                .repo
                .find_remote(REMOTE_NAME)
                .map_err(|source| GitSourceError::Fetch { source })?;
            let mut options = FetchOptions::new();
            options.prune(FetchPrune::On);
            remote
                .fetch(&[] as &[&str], Some(&mut options), None)
                .map_err(|source| GitSourceError::Fetch { source })?;
        }

        if let Some((branch, _)) = self.checked_out.clone() {
            match self.checkout(&branch) {
                Ok(()) => {},
                Err(GitSourceError::BranchNotFound { .. }) => {
                    debug!("Branch {} no longer exists on the remote", branch);
                    self.checked_out = None;
                },
                Err(e) => return Err(e),
            }
        }

        self.head_commit()
    }

    /// Releases the repository and removes a temporary clone directory.
    pub fn close(self) -> Result<(), GitSourceError> {
        let Self { repo, dir, path, .. } = self;
        drop(repo);

        if let Some(dir) = dir {
            debug!("Removing clone at {:?}", path);
            dir.close()?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for LocalClone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalClone")
            .field("path", &self.path)
            .field("temporary", &self.dir.is_some())
            .field("checked_out", &self.checked_out)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use git2::{BranchType, RepositoryInitOptions, Signature};

    fn commit_file(repo: &Repository, name: &str, content: &str) {
        let workdir = repo.workdir().unwrap();
        std::fs::write(workdir.join(name), content).unwrap();

        let mut index = repo.index().unwrap();
        index.add_path(Path::new(name)).unwrap();
        index.write().unwrap();
        let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();

        let signature = Signature::now("test", "test@example.com").unwrap();
        let parent = repo.head().ok().and_then(|head| head.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();
        repo.commit(Some("HEAD"), &signature, &signature, "update", &tree, &parents)
            .unwrap();
    }

    fn remote() -> (TempDir, Repository) {
        let dir = TempDir::new().unwrap();
        let mut options = RepositoryInitOptions::new();
        options.initial_head("master");
        let repo = Repository::init_opts(dir.path(), &options).unwrap();
        commit_file(&repo, "application.properties", "some.setting=masterValue\n");
        (dir, repo)
    }

    fn read(clone: &LocalClone) -> String {
        std::fs::read_to_string(clone.path().join("application.properties")).unwrap()
    }

    #[test]
    fn test_clone_and_checkout() {
        let (remote_dir, _remote) = remote();
        let tmp = TempDir::new().unwrap();

        let uri = remote_dir.path().to_str().unwrap();
        let mut clone = LocalClone::clone_into_temp(uri, tmp.path(), "clone-test").unwrap();
        assert!(clone.path().starts_with(tmp.path()));

        clone.checkout("master").unwrap();
        assert_eq!(clone.current_branch(), Some("master"));
        assert_eq!(read(&clone), "some.setting=masterValue\n");
    }

    #[test]
    fn test_checkout_missing_branch() {
        let (remote_dir, _remote) = remote();
        let tmp = TempDir::new().unwrap();

        let uri = remote_dir.path().to_str().unwrap();
        let mut clone = LocalClone::clone_into_temp(uri, tmp.path(), "clone-test").unwrap();

        let err = clone.checkout("nonExistentBranch").unwrap_err();
        assert!(err.is_missing_branch());
        assert_eq!(clone.current_branch(), None);
    }

    #[test]
    fn test_fetch_updates_working_tree() {
        let (remote_dir, remote) = remote();
        let tmp = TempDir::new().unwrap();

        let uri = remote_dir.path().to_str().unwrap();
        let mut clone = LocalClone::clone_into_temp(uri, tmp.path(), "clone-test").unwrap();
        clone.checkout("master").unwrap();

        commit_file(&remote, "application.properties", "some.setting=changedValue\n");
        let head = clone.fetch().unwrap();

        assert_eq!(read(&clone), "some.setting=changedValue\n");
        assert_eq!(
            head,
            remote.head().unwrap().peel_to_commit().unwrap().id().to_string()
        );
    }

    #[test]
    fn test_branch_deleted_upstream_is_missing_after_fetch() {
        let (remote_dir, remote) = remote();
        let tmp = TempDir::new().unwrap();

        let uri = remote_dir.path().to_str().unwrap();
        let mut clone = LocalClone::clone_into_temp(uri, tmp.path(), "clone-test").unwrap();
        clone.checkout("master").unwrap();

        let head = remote.head().unwrap().peel_to_commit().unwrap();
        remote.branch("other", &head, false).unwrap();
        remote.set_head("refs/heads/other").unwrap();
        remote
            .find_branch("master", BranchType::Local)
            .unwrap()
            .delete()
            .unwrap();

        clone.fetch().unwrap();
        assert_eq!(clone.current_branch(), None);
        // The clone still has a local master branch from the initial clone.
        assert!(clone.repo.find_reference(&local_ref("master")).is_ok());
        assert!(clone.checkout("master").unwrap_err().is_missing_branch());

        clone.checkout("other").unwrap();
        assert_eq!(read(&clone), "some.setting=masterValue\n");
    }

    #[test]
    fn test_clone_without_remote_uses_local_branches() {
        let (remote_dir, _remote) = remote();
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("fixed");

        let uri = remote_dir.path().to_str().unwrap();
        let mut clone = LocalClone::open_or_clone(uri, &path).unwrap();
        clone.repo.remote_delete(REMOTE_NAME).unwrap();

        clone.checkout("master").unwrap();
        assert_eq!(read(&clone), "some.setting=masterValue\n");
        assert!(matches!(clone.fetch().unwrap_err(), GitSourceError::Fetch { .. }));
    }

    #[test]
    fn test_close_removes_temporary_clone() {
        let (remote_dir, _remote) = remote();
        let tmp = TempDir::new().unwrap();

        let uri = remote_dir.path().to_str().unwrap();
        let clone = LocalClone::clone_into_temp(uri, tmp.path(), "clone-test").unwrap();
        let path = clone.path().to_path_buf();
        assert!(path.exists());

        clone.close().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_fixed_path_is_kept_and_reopened() {
        let (remote_dir, _remote) = remote();
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("fixed");

        let uri = remote_dir.path().to_str().unwrap();
        let clone = LocalClone::open_or_clone(uri, &path).unwrap();
        clone.close().unwrap();
        assert!(path.join(".git").exists());

        let mut reopened = LocalClone::open_or_clone(uri, &path).unwrap();
        reopened.checkout("master").unwrap();
        assert_eq!(read(&reopened), "some.setting=masterValue\n");
    }

    #[test]
    fn test_clone_failure() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("does-not-exist");

        let err = LocalClone::clone_into_temp(missing.to_str().unwrap(), tmp.path(), "clone-test")
            .unwrap_err();
        assert!(matches!(err, GitSourceError::Clone { .. }));
    }
}
