//! Git configuration source options.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::GitSourceError;
use crate::resolver::{
    AllButFirstTokensPathResolver, BranchResolver, ConfigFilesProvider, DefaultConfigFilesProvider,
    FirstTokenBranchResolver, PathResolver,
};

/// Options for [`GitConfigurationSource`](crate::GitConfigurationSource).
///
/// Only `repository_uri` is required. The resolvers and the files provider
/// cannot be deserialized; they default to the `branch/sub/path` convention
/// and can be replaced with the `with_*` setters.
///
/// # Example
///
/// ```
/// use strata_git::GitSourceOptions;
///
/// let options: GitSourceOptions = serde_json::from_str(
///     r#"{"repositoryUri": "https://github.com/org/config.git", "defaultBranch": "main"}"#,
/// )
/// .unwrap();
///
/// assert_eq!(options.default_branch(), "main");
/// assert_eq!(options.local_repository_path_in_temp(), "strata-git-config-repository");
/// ```
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitSourceOptions {
    /// The Git repository URI (HTTPS, SSH, file URL or local path).
    repository_uri: String,

    /// Directory the temporary clone is created in.
    #[serde(default = "default_tmp_path")]
    tmp_path: PathBuf,

    /// Name prefix of the temporary clone directory.
    #[serde(default = "default_local_repository_path_in_temp")]
    local_repository_path_in_temp: String,

    /// Fixed clone location; never deleted by the source.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    local_path: Option<PathBuf>,

    /// Branch used for the root environment.
    #[serde(default = "default_branch")]
    default_branch: String,

    /// Files read for every environment, relative to the resolved path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    config_files: Option<Vec<PathBuf>>,

    #[serde(skip)]
    branch_resolver: Option<Arc<dyn BranchResolver>>,

    #[serde(skip)]
    path_resolver: Option<Arc<dyn PathResolver>>,

    #[serde(skip)]
    config_files_provider: Option<Arc<dyn ConfigFilesProvider>>,
}

fn default_tmp_path() -> PathBuf {
    std::env::temp_dir()
}

fn default_local_repository_path_in_temp() -> String {
    "strata-git-config-repository".to_string()
}

fn default_branch() -> String {
    "master".to_string()
}

impl GitSourceOptions {
    /// Creates options for `repository_uri` with every other field defaulted.
    pub fn new(repository_uri: impl Into<String>) -> Self {
        Self {
            repository_uri: repository_uri.into(),
            tmp_path: default_tmp_path(),
            local_repository_path_in_temp: default_local_repository_path_in_temp(),
            local_path: None,
            default_branch: default_branch(),
            config_files: None,
            branch_resolver: None,
            path_resolver: None,
            config_files_provider: None,
        }
    }

    /// Sets the directory the temporary clone is created in.
    pub fn with_tmp_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.tmp_path = path.into();
        self
    }

    /// Sets the name prefix of the temporary clone directory.
    pub fn with_local_repository_path_in_temp(mut self, name: impl Into<String>) -> Self {
        self.local_repository_path_in_temp = name.into();
        self
    }

    /// Clones into (or reopens) `path` instead of a temporary directory.
    pub fn with_local_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.local_path = Some(path.into());
        self
    }

    /// Sets the branch used for the root environment.
    pub fn with_default_branch(mut self, branch: impl Into<String>) -> Self {
        self.default_branch = branch.into();
        self
    }

    /// Sets the files read for every environment.
    pub fn with_config_files<P: Into<PathBuf>>(mut self, files: impl IntoIterator<Item = P>) -> Self {
        self.config_files = Some(files.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_branch_resolver(mut self, resolver: impl BranchResolver + 'static) -> Self {
        self.branch_resolver = Some(Arc::new(resolver));
        self
    }

    pub fn with_path_resolver(mut self, resolver: impl PathResolver + 'static) -> Self {
        self.path_resolver = Some(Arc::new(resolver));
        self
    }

    /// Replaces the files provider; takes precedence over `with_config_files`.
    pub fn with_config_files_provider(mut self, provider: impl ConfigFilesProvider + 'static) -> Self {
        self.config_files_provider = Some(Arc::new(provider));
        self
    }

    /// Returns the repository URI.
    pub fn repository_uri(&self) -> &str {
        &self.repository_uri
    }

    /// Returns the directory temporary clones are created in.
    pub fn tmp_path(&self) -> &Path {
        &self.tmp_path
    }

    /// Returns the name prefix of the temporary clone directory.
    pub fn local_repository_path_in_temp(&self) -> &str {
        &self.local_repository_path_in_temp
    }

    /// Returns the fixed clone location, if any.
    pub fn local_path(&self) -> Option<&Path> {
        self.local_path.as_deref()
    }

    /// Returns the default branch.
    pub fn default_branch(&self) -> &str {
        &self.default_branch
    }

    /// Returns the effective branch resolver.
    pub fn branch_resolver(&self) -> Arc<dyn BranchResolver> {
        match &self.branch_resolver {
            Some(resolver) => resolver.clone(),
            None => Arc::new(FirstTokenBranchResolver::new(self.default_branch.clone())),
        }
    }

    /// Returns the effective path resolver.
    pub fn path_resolver(&self) -> Arc<dyn PathResolver> {
        match &self.path_resolver {
            Some(resolver) => resolver.clone(),
            None => Arc::new(AllButFirstTokensPathResolver),
        }
    }

    /// Returns the effective config files provider.
    pub fn config_files_provider(&self) -> Arc<dyn ConfigFilesProvider> {
        match (&self.config_files_provider, &self.config_files) {
            (Some(provider), _) => provider.clone(),
            (None, Some(files)) => Arc::new(files.clone()),
            (None, None) => Arc::new(DefaultConfigFilesProvider),
        }
    }

    /// Checks the options for values that can never work.
    pub fn validate(&self) -> Result<(), GitSourceError> {
        if self.repository_uri.trim().is_empty() {
            return Err(GitSourceError::InvalidOptions(
                "repositoryUri must not be empty".to_string(),
            ));
        }

        if self.default_branch.trim().is_empty() {
            return Err(GitSourceError::InvalidOptions(
                "defaultBranch must not be empty".to_string(),
            ));
        }

        if self.local_repository_path_in_temp.contains(std::path::MAIN_SEPARATOR) {
            return Err(GitSourceError::InvalidOptions(format!(
                "localRepositoryPathInTemp must be a single directory name, got '{}'",
                self.local_repository_path_in_temp
            )));
        }

        let files = self.config_files_provider().config_files();
        if files.is_empty() {
            return Err(GitSourceError::InvalidOptions(
                "at least one configuration file is required".to_string(),
            ));
        }
        if let Some(absolute) = files.iter().find(|f| f.is_absolute()) {
            return Err(GitSourceError::InvalidOptions(format!(
                "configuration file '{}' must be relative",
                absolute.display()
            )));
        }

        Ok(())
    }
}

impl fmt::Debug for GitSourceOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitSourceOptions")
            .field("repository_uri", &self.repository_uri)
            .field("tmp_path", &self.tmp_path)
            .field("local_repository_path_in_temp", &self.local_repository_path_in_temp)
            .field("local_path", &self.local_path)
            .field("default_branch", &self.default_branch)
            .field("config_files", &self.config_files_provider().config_files())
            .field("custom_branch_resolver", &self.branch_resolver.is_some())
            .field("custom_path_resolver", &self.path_resolver.is_some())
            .finish()
    }
}
