//! Strata Bind - Live typed views over configuration sources
//!
//! A [`ConfigurationProvider`] pairs a source with an environment and offers
//! two ways to read:
//!
//! - [`ConfigurationProvider::get`] converts one key of the current snapshot
//! - [`ConfigurationProvider::bind`] returns a view type declared with
//!   [`config_interface!`] whose accessors re-read the current snapshot on
//!   every call
//!
//! Views never go stale: after a source refresh the next accessor call sees
//! the new values without re-binding.

pub mod bind;
pub mod convert;
mod macros;
pub mod provider;

pub use bind::{AccessorSpec, Bindable, BoundView, ConfigInterface, Validator, validate_interface};
pub use convert::{FromConfigValue, LIST_DELIMITER, convert_entry};
pub use provider::{ConfigurationProvider, ConfigurationProviderBuilder};

// Used by macro expansions.
pub use strata_core::{ConfigError, Environment, Result, Snapshot};
