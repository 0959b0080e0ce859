//! Strata Core - Domain types, source contracts and refresh strategies
//!
//! This crate provides the foundations shared by every Strata crate:
//!
//! - [`Environment`]: the logical location configuration is read for
//! - [`Snapshot`]: an immutable, flat key/value view of configuration
//! - [`ConfigurationSource`] / [`Refreshable`]: the pull-based source contract
//! - [`format`]: `.properties`, YAML and JSON parsing into snapshots
//! - [`refresh`]: strategies deciding when a source re-synchronizes
//! - [`ConfigError`]: the error taxonomy used throughout

pub mod config;
pub mod error;
pub mod format;
pub mod merge;
pub mod refresh;
pub mod source;
pub mod types;

pub use config::{KEY_SEPARATOR, PropertySource, Snapshot, compose_key};
pub use error::{ConfigError, Result};
pub use format::{ConfigFormat, FormatParser, parse_file};
pub use merge::PropertySourceList;
pub use refresh::{
    OnInitRefreshStrategy, PeriodicRefreshStrategy, RefreshObserver, RefreshStrategy,
    StrategyState, TracingRefreshObserver,
};
pub use source::{ConfigurationSource, Refreshable};
pub use types::{ENVIRONMENT_SEPARATOR, Environment};

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
