#![allow(dead_code)]
use std::path::{Path, PathBuf};

use git2::build::CheckoutBuilder;
use git2::{BranchType, Repository, RepositoryInitOptions, Signature};
use strata_git::GitSourceOptions;
use tempfile::TempDir;

/// A throwaway repository acting as the remote of a git source.
///
/// Every mutation is committed to the checked-out branch immediately, so a
/// source sees it on its next refresh.
pub struct TempConfigurationGitRepo {
    repo: Option<Repository>,
    dir: Option<TempDir>,
    path: PathBuf,
}

impl TempConfigurationGitRepo {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let mut options = RepositoryInitOptions::new();
        options.initial_head("master");
        let repo = Repository::init_opts(dir.path(), &options).unwrap();

        Self {
            path: dir.path().to_path_buf(),
            repo: Some(repo),
            dir: Some(dir),
        }
    }

    pub fn uri(&self) -> String {
        self.path.to_str().unwrap().to_string()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn repo(&self) -> &Repository {
        self.repo.as_ref().expect("repository was removed")
    }

    /// Replaces `file` with a single `key=value` line.
    pub fn change_property(&self, file: &str, key: &str, value: &str) {
        self.write_file(file, &format!("{key}={value}\n"));
    }

    pub fn write_file(&self, file: &str, content: &str) {
        let target = self.path.join(file);
        std::fs::create_dir_all(target.parent().unwrap()).unwrap();
        std::fs::write(&target, content).unwrap();

        let mut index = self.repo().index().unwrap();
        index.add_path(Path::new(file)).unwrap();
        index.write().unwrap();
        self.commit(&format!("Update {file}"));
    }

    pub fn delete_file(&self, file: &str) {
        std::fs::remove_file(self.path.join(file)).unwrap();

        let mut index = self.repo().index().unwrap();
        index.remove_path(Path::new(file)).unwrap();
        index.write().unwrap();
        self.commit(&format!("Delete {file}"));
    }

    /// Switches to `branch`, creating it from the current commit if needed.
    pub fn change_branch_to(&self, branch: &str) {
        let repo = self.repo();
        let existing = repo.find_branch(branch, BranchType::Local);
        let commit = match existing {
            Ok(found) => found.get().peel_to_commit().unwrap(),
            Err(_) => {
                let head = repo.head().unwrap().peel_to_commit().unwrap();
                repo.branch(branch, &head, false).unwrap();
                head
            },
        };

        repo.checkout_tree(commit.as_object(), Some(CheckoutBuilder::new().force()))
            .unwrap();
        repo.set_head(&format!("refs/heads/{branch}")).unwrap();
    }

    pub fn delete_branch(&self, branch: &str) {
        self.repo()
            .find_branch(branch, BranchType::Local)
            .unwrap()
            .delete()
            .unwrap();
    }

    /// Deletes the repository from disk.
    pub fn remove(&mut self) {
        self.repo.take();
        if let Some(dir) = self.dir.take() {
            dir.close().unwrap();
        }
    }

    fn commit(&self, message: &str) {
        let repo = self.repo();
        let mut index = repo.index().unwrap();
        let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();
        let signature = Signature::now("strata", "strata@example.com").unwrap();

        let parent = repo.head().ok().and_then(|head| head.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();
        repo.commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)
            .unwrap();
    }
}

/// A repository laid out the way the source tests expect:
///
/// - `master`: `application.properties` (`some.setting=masterValue`),
///   `otherConfig.properties` and
///   `otherApplicationConfigs/application.properties`
/// - `testEnvBranch`: as `master`, with `some.setting=testValue`
pub fn configuration_repo() -> TempConfigurationGitRepo {
    let repo = TempConfigurationGitRepo::new();
    repo.change_property("application.properties", "some.setting", "masterValue");
    repo.change_property("otherConfig.properties", "otherConfig.setting", "masterValue");
    repo.change_property(
        "otherApplicationConfigs/application.properties",
        "some.setting",
        "otherAppSetting",
    );
    repo.change_branch_to("testEnvBranch");
    repo.change_property("application.properties", "some.setting", "testValue");
    repo.change_branch_to("master");
    repo
}

/// Options cloning `repo` into `tmp`.
pub fn options(repo: &TempConfigurationGitRepo, tmp: &TempDir) -> GitSourceOptions {
    GitSourceOptions::new(repo.uri()).with_tmp_path(tmp.path())
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("strata_git=debug,strata_core=debug")
        .with_test_writer()
        .try_init();
}
