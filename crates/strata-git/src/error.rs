//! Error types for the git configuration source.

use std::path::PathBuf;

use strata_core::ConfigError;

/// Errors raised by git operations on the local clone.
///
/// These are converted into [`ConfigError`] kinds at the source boundary with
/// [`into_config_error`](Self::into_config_error).
#[derive(Debug, thiserror::Error)]
pub enum GitSourceError {
    /// The options failed validation.
    #[error("invalid options: {0}")]
    InvalidOptions(String),

    /// The repository could not be cloned.
    #[error("failed to clone {uri} into {path}: {source}")]
    Clone {
        uri: String,
        path: PathBuf,
        #[source]
        source: git2::Error,
    },

    /// An existing local repository could not be opened.
    #[error("failed to open repository at {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: git2::Error,
    },

    /// The resolved branch exists neither remotely nor locally.
    #[error("branch '{branch}' not found")]
    BranchNotFound { branch: String },

    /// The resolved branch name is not a valid reference name.
    #[error("invalid branch name '{branch}': {reason}")]
    InvalidBranchName { branch: String, reason: &'static str },

    /// Fetching from the remote failed.
    #[error("failed to fetch from remote: {source}")]
    Fetch {
        #[source]
        source: git2::Error,
    },

    /// Updating the working tree failed.
    #[error("failed to check out '{branch}': {source}")]
    Checkout {
        branch: String,
        #[source]
        source: git2::Error,
    },

    /// The source was closed and its clone released.
    #[error("source is closed")]
    Closed,

    /// Any other git failure.
    #[error("git error: {context}: {source}")]
    Git {
        context: String,
        #[source]
        source: git2::Error,
    },

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl GitSourceError {
    /// Wraps a git2 error, keeping `context` for the message.
    pub fn git(context: impl Into<String>, source: git2::Error) -> Self {
        Self::Git {
            context: context.into(),
            source,
        }
    }

    /// Returns true if the failure means the environment does not exist.
    pub fn is_missing_branch(&self) -> bool {
        matches!(
            self,
            Self::BranchNotFound { .. } | Self::InvalidBranchName { .. }
        )
    }

    /// Converts a failure during source construction.
    ///
    /// Every kind of failure is a construction error at that point.
    pub fn into_construction_error(self, source_name: &str) -> ConfigError {
        let message = self.to_string();
        ConfigError::source_construction_with_cause(source_name, message, self)
    }

    /// Converts a failure during a read or refresh of `environment`.
    pub fn into_config_error(self, source_name: &str, environment: &str) -> ConfigError {
        let message = self.to_string();
        match self {
            Self::BranchNotFound { .. } | Self::InvalidBranchName { .. } => {
                ConfigError::missing_environment(environment, message)
            },
            Self::InvalidOptions(_) | Self::Clone { .. } => {
                ConfigError::source_construction_with_cause(source_name, message, self)
            },
            Self::Io(_) => ConfigError::read_with_cause(source_name, message, self),
            Self::Open { .. }
            | Self::Fetch { .. }
            | Self::Checkout { .. }
            | Self::Closed
            | Self::Git { .. } => ConfigError::synchronization_with_cause(source_name, message, self),
        }
    }
}
