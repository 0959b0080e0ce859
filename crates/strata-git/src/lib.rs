//! # Strata Git
//!
//! Git-backed configuration source for Strata.
//!
//! A [`GitConfigurationSource`] clones a repository once and serves
//! configuration snapshots from it. Environments map onto the repository by
//! convention: the first environment token picks the branch, the remaining
//! tokens pick a directory, and the configured files in that directory are
//! read and merged in order.
//!
//! ## Features
//!
//! - In-process clone, fetch and checkout via `git2`, no system `git` required
//! - Temporary clones that are removed on close, or a fixed clone location
//! - Pluggable branch and path resolution
//! - Properties, YAML and JSON files
//! - Refresh through any [`strata_core::RefreshStrategy`]
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use strata_core::{ConfigurationSource, PeriodicRefreshStrategy, RefreshStrategy};
//! use strata_git::{GitConfigurationSource, GitSourceOptions};
//!
//! # async fn run() -> strata_core::Result<()> {
//! let source = Arc::new(GitConfigurationSource::new(
//!     GitSourceOptions::new("https://github.com/org/config.git")
//!         .with_config_files(["application.properties", "database.yaml"]),
//! )?);
//!
//! let strategy = PeriodicRefreshStrategy::new(Duration::from_secs(60));
//! strategy.init(source.clone())?;
//!
//! let snapshot = source.get_configuration()?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod options;
pub mod repository;
pub mod resolver;
pub mod source;
pub mod sync;

// Re-exports
pub use error::GitSourceError;
pub use options::GitSourceOptions;
pub use repository::LocalClone;
pub use resolver::{
    AllButFirstTokensPathResolver, BranchResolver, ConfigFilesProvider, DEFAULT_CONFIG_FILE,
    DefaultConfigFilesProvider, FirstTokenBranchResolver, PathResolver,
};
pub use source::GitConfigurationSource;
pub use sync::SyncState;

// Re-export strata_core for consumers
pub use strata_core;
