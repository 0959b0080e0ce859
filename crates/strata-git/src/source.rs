//! The git-backed configuration source.

use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use strata_core::{
    ConfigError, ConfigurationSource, Environment, PropertySource, PropertySourceList, Refreshable,
    Result, Snapshot, parse_file,
};
use tracing::{debug, info, warn};

use crate::error::GitSourceError;
use crate::options::GitSourceOptions;
use crate::repository::{LocalClone, validate_branch_name};
use crate::resolver::{BranchResolver, ConfigFilesProvider, PathResolver};
use crate::sync::SyncState;

/// A configuration source reading files from a git repository.
///
/// The repository is cloned once at construction. Every read resolves the
/// environment to a branch and a directory, checks the branch out and merges
/// the configured files found there. [`refresh`](Refreshable::refresh)
/// fetches from the remote; reads never touch the network.
///
/// Checkouts, file reads and fetches on one source are serialized.
///
/// # Example
///
/// ```no_run
/// use strata_core::{ConfigurationSource, Environment};
/// use strata_git::{GitConfigurationSource, GitSourceOptions};
///
/// let source = GitConfigurationSource::new(
///     GitSourceOptions::new("https://github.com/org/config.git").with_default_branch("main"),
/// )?;
///
/// let defaults = source.get_configuration()?;
/// let staging = source.get_configuration_for(&Environment::new("staging/payments"))?;
/// # Ok::<(), strata_core::ConfigError>(())
/// ```
pub struct GitConfigurationSource {
    name: String,
    options: GitSourceOptions,
    branch_resolver: Arc<dyn BranchResolver>,
    path_resolver: Arc<dyn PathResolver>,
    config_files: Arc<dyn ConfigFilesProvider>,
    clone: Mutex<Option<LocalClone>>,
    sync: SyncState,
}

impl GitConfigurationSource {
    /// Validates `options` and clones the repository.
    ///
    /// Fails with a source construction error if the options are invalid,
    /// the clone directory cannot be created or the remote cannot be cloned.
    pub fn new(options: GitSourceOptions) -> Result<Self> {
        let name = format!("git:{}", options.repository_uri());

        options
            .validate()
            .map_err(|e| e.into_construction_error(&name))?;

        let uri = options.repository_uri();
        let clone = match options.local_path() {
            Some(path) => LocalClone::open_or_clone(uri, path),
            None => LocalClone::clone_into_temp(
                uri,
                options.tmp_path(),
                options.local_repository_path_in_temp(),
            ),
        }
        .map_err(|e| e.into_construction_error(&name))?;

        let sync = SyncState::new();
        match clone.head_commit() {
            Ok(head) => sync.record_success(head),
            Err(e) => debug!("Clone of {} has no HEAD commit: {}", uri, e),
        }

        info!("Git configuration source {} ready at {:?}", name, clone.path());

        Ok(Self {
            name,
            branch_resolver: options.branch_resolver(),
            path_resolver: options.path_resolver(),
            config_files: options.config_files_provider(),
            options,
            clone: Mutex::new(Some(clone)),
            sync,
        })
    }

    /// Returns the options the source was built with.
    pub fn options(&self) -> &GitSourceOptions {
        &self.options
    }

    /// Returns the branch the working tree currently mirrors.
    pub fn current_branch(&self) -> Option<String> {
        self.clone
            .lock()
            .as_ref()
            .and_then(|clone| clone.current_branch().map(str::to_string))
    }

    /// Returns the head commit recorded by the last successful sync.
    pub fn current_commit(&self) -> Option<String> {
        self.sync.commit()
    }

    /// Returns the synchronization state.
    pub fn sync_state(&self) -> &SyncState {
        &self.sync
    }

    /// Returns the working tree root, or `None` once closed.
    pub fn clone_path(&self) -> Option<PathBuf> {
        self.clone.lock().as_ref().map(|clone| clone.path().to_path_buf())
    }

    /// Returns true once [`close`](Self::close) has run.
    pub fn is_closed(&self) -> bool {
        self.clone.lock().is_none()
    }

    /// Releases the local clone, removing it if it is temporary.
    ///
    /// Idempotent. Reads and refreshes afterwards fail with a synchronization
    /// error.
    pub fn close(&self) -> Result<()> {
        let Some(clone) = self.clone.lock().take() else {
            return Ok(());
        };

        info!("Closing git configuration source {}", self.name);
        clone
            .close()
            .map_err(|e| e.into_config_error(&self.name, ""))
    }

    fn error(&self, err: GitSourceError, environment: &Environment) -> ConfigError {
        err.into_config_error(&self.name, environment.as_str())
    }
}

/// Keeps only the plain components of `path`, so a resolved location can
/// never leave the working tree.
fn confine(path: &Path) -> PathBuf {
    path.components()
        .filter(|component| matches!(component, Component::Normal(_)))
        .collect()
}

impl ConfigurationSource for GitConfigurationSource {
    /// Reads the default environment.
    ///
    /// A default branch that does not exist is a read error here, since the
    /// caller named no environment that could be missing.
    fn get_configuration(&self) -> Result<Snapshot> {
        self.get_configuration_for(&Environment::root())
            .map_err(|e| {
                if e.is_missing_environment() {
                    ConfigError::read_with_cause(
                        &self.name,
                        "default branch is not available",
                        e,
                    )
                } else {
                    e
                }
            })
    }

    fn get_configuration_for(&self, environment: &Environment) -> Result<Snapshot> {
        let branch = self.branch_resolver.resolve_branch(environment);
        validate_branch_name(&branch).map_err(|reason| {
            self.error(
                GitSourceError::InvalidBranchName {
                    branch: branch.clone(),
                    reason,
                },
                environment,
            )
        })?;

        let mut guard = self.clone.lock();
        let clone = guard
            .as_mut()
            .ok_or_else(|| self.error(GitSourceError::Closed, environment))?;

        clone
            .checkout(&branch)
            .map_err(|e| self.error(e, environment))?;

        let dir = clone.path().join(confine(&self.path_resolver.resolve_path(environment)));
        let mut sources = PropertySourceList::new();
        for file in self.config_files.config_files() {
            let relative = confine(&file);
            let path = dir.join(&relative);
            let snapshot = parse_file(&path)?;
            sources.add(
                PropertySource::new(format!("git:{}:{}", branch, relative.display()), snapshot)
                    .with_origin(path.display().to_string()),
            );
        }
        drop(guard);

        debug!(
            "Read {} file(s) for environment '{}' from branch {}",
            sources.len(),
            environment,
            branch
        );
        Ok(sources.into_snapshot())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl Refreshable for GitConfigurationSource {
    fn refresh(&self) -> Result<()> {
        let mut guard = self.clone.lock();
        let clone = guard
            .as_mut()
            .ok_or_else(|| self.error(GitSourceError::Closed, &Environment::root()))?;

        match clone.fetch() {
            Ok(head) => {
                debug!("Fetched {} at {}", self.name, head);
                self.sync.record_success(head);
                Ok(())
            },
            Err(e) => {
                self.sync.record_failure(e.to_string());
                Err(self.error(e, &Environment::root()))
            },
        }
    }
}

impl Drop for GitConfigurationSource {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            warn!("Failed to remove clone of {}: {}", self.name, e);
        }
    }
}

impl fmt::Debug for GitConfigurationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitConfigurationSource")
            .field("name", &self.name)
            .field("options", &self.options)
            .field("clone", &*self.clone.lock())
            .field("sync", &self.sync)
            .finish()
    }
}
