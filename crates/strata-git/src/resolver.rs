//! Mapping environments to physical locations in a repository.
//!
//! A git source needs three answers for every read: which branch, which
//! directory below the repository root, and which files in that directory.
//! Each is a small pluggable trait with a default following the
//! `branch/sub/path` convention:
//!
//! | environment                 | branch          | path                      |
//! |-----------------------------|-----------------|---------------------------|
//! | (root)                      | default branch  | (root)                    |
//! | `testEnvBranch`             | `testEnvBranch` | (root)                    |
//! | `/otherApplicationConfigs`  | default branch  | `otherApplicationConfigs` |
//! | `us-west/service/a`         | `us-west`       | `service/a`               |

use std::path::PathBuf;

use strata_core::Environment;

/// The conventional configuration file read when nothing else is configured.
pub const DEFAULT_CONFIG_FILE: &str = "application.properties";

/// Maps an environment to the branch holding its configuration.
pub trait BranchResolver: Send + Sync {
    fn resolve_branch(&self, environment: &Environment) -> String;
}

impl<F> BranchResolver for F
where
    F: Fn(&Environment) -> String + Send + Sync,
{
    fn resolve_branch(&self, environment: &Environment) -> String {
        self(environment)
    }
}

/// Maps an environment to a directory relative to the repository root.
pub trait PathResolver: Send + Sync {
    fn resolve_path(&self, environment: &Environment) -> PathBuf;
}

impl<F> PathResolver for F
where
    F: Fn(&Environment) -> PathBuf + Send + Sync,
{
    fn resolve_path(&self, environment: &Environment) -> PathBuf {
        self(environment)
    }
}

/// Ordered list of files, relative to the resolved path, that are read and
/// merged. Later files override keys of earlier ones.
pub trait ConfigFilesProvider: Send + Sync {
    fn config_files(&self) -> Vec<PathBuf>;
}

impl ConfigFilesProvider for Vec<PathBuf> {
    fn config_files(&self) -> Vec<PathBuf> {
        self.clone()
    }
}

/// Uses the first environment token as the branch name.
///
/// The root environment, and environments whose first token is empty
/// (`"/sub/dir"`), map to the default branch.
#[derive(Debug, Clone)]
pub struct FirstTokenBranchResolver {
    default_branch: String,
}

impl FirstTokenBranchResolver {
    pub fn new(default_branch: impl Into<String>) -> Self {
        Self {
            default_branch: default_branch.into(),
        }
    }
}

impl BranchResolver for FirstTokenBranchResolver {
    fn resolve_branch(&self, environment: &Environment) -> String {
        match environment.token(0).trim() {
            "" => self.default_branch.clone(),
            branch => branch.to_string(),
        }
    }
}

/// Uses every token after the first as the path.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllButFirstTokensPathResolver;

impl PathResolver for AllButFirstTokensPathResolver {
    fn resolve_path(&self, environment: &Environment) -> PathBuf {
        environment
            .tokens()
            .skip(1)
            .filter(|token| !token.is_empty())
            .collect()
    }
}

/// Reads the single file `application.properties`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultConfigFilesProvider;

impl ConfigFilesProvider for DefaultConfigFilesProvider {
    fn config_files(&self) -> Vec<PathBuf> {
        vec![PathBuf::from(DEFAULT_CONFIG_FILE)]
    }
}
