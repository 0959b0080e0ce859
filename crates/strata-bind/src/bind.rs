//! The bind engine.
//!
//! A configuration interface is a type whose accessors each map to one key
//! below a prefix. [`config_interface!`](crate::config_interface) generates
//! the accessor table; this module validates it and dispatches accessor calls
//! through a [`BoundView`].
//!
//! Binding is eager and reading is lazy: `bind` checks every accessor once,
//! then each accessor call re-reads the current snapshot. A value that was
//! valid at bind time and became invalid after a refresh surfaces as an error
//! from that accessor call.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use strata_core::{ConfigError, Result, Snapshot, compose_key};

use crate::convert::{FromConfigValue, convert_entry};
use crate::provider::ConfigurationProvider;

/// Checks that the value at a key is readable as some type.
pub type Validator = fn(&Snapshot, &str) -> Result<()>;

/// One accessor of a configuration interface.
#[derive(Clone, Copy)]
pub struct AccessorSpec {
    /// Accessor (method) name.
    pub name: &'static str,
    /// Key segment below the view's prefix.
    pub key: &'static str,
    /// Validation for the accessor's return type.
    pub validate: Validator,
}

impl fmt::Debug for AccessorSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessorSpec")
            .field("name", &self.name)
            .field("key", &self.key)
            .finish()
    }
}

/// A type whose accessors are backed by configuration keys.
///
/// Implemented by [`config_interface!`](crate::config_interface).
pub trait ConfigInterface: Sized {
    /// The accessor table, in declaration order.
    fn accessors() -> Vec<AccessorSpec>;

    /// Wraps a bound view.
    fn from_view(view: BoundView) -> Self;
}

/// Anything an accessor may return.
///
/// Every [`FromConfigValue`] type is bindable as a single value; interfaces
/// generated by [`config_interface!`](crate::config_interface) are bindable as
/// nested views.
pub trait Bindable: Sized {
    /// Checks the value at `key` against `snapshot`.
    fn validate(snapshot: &Snapshot, key: &str) -> Result<()>;

    /// Reads the current value at `key` through `provider`.
    fn resolve(provider: &ConfigurationProvider, key: &str) -> Result<Self>;
}

impl<T: FromConfigValue> Bindable for T {
    fn validate(snapshot: &Snapshot, key: &str) -> Result<()> {
        convert_entry::<T>(snapshot, key).map(|_| ())
    }

    fn resolve(provider: &ConfigurationProvider, key: &str) -> Result<Self> {
        provider.get::<T>(key)
    }
}

/// Validates every accessor of `T` bound at `prefix`.
///
/// Nested interfaces are validated recursively with the composed key as
/// their prefix. The first failing accessor is reported.
pub fn validate_interface<T: ConfigInterface>(snapshot: &Snapshot, prefix: &str) -> Result<()> {
    for accessor in T::accessors() {
        (accessor.validate)(snapshot, &compose_key(prefix, accessor.key))?;
    }
    Ok(())
}

/// The live state behind a bound interface.
///
/// Holds the provider, the prefix and the accessor → key table. No values.
#[derive(Clone)]
pub struct BoundView {
    provider: ConfigurationProvider,
    prefix: String,
    keys: Arc<IndexMap<&'static str, String>>,
}

impl BoundView {
    pub(crate) fn new<T: ConfigInterface>(provider: ConfigurationProvider, prefix: &str) -> Self {
        let keys = T::accessors()
            .into_iter()
            .map(|accessor| (accessor.name, compose_key(prefix, accessor.key)))
            .collect();

        Self {
            provider,
            prefix: prefix.to_string(),
            keys: Arc::new(keys),
        }
    }

    /// Returns the prefix this view was bound at.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns the full key an accessor reads.
    pub fn key_of(&self, accessor: &str) -> Option<&str> {
        self.keys.get(accessor).map(String::as_str)
    }

    /// Returns the provider this view reads through.
    pub fn provider(&self) -> &ConfigurationProvider {
        &self.provider
    }

    /// Resolves `accessor` against the current snapshot.
    pub fn get<T: Bindable>(&self, accessor: &str) -> Result<T> {
        let key = self.key_of(accessor).ok_or_else(|| {
            ConfigError::invalid_state(format!(
                "'{}' is not an accessor of the view bound at '{}'",
                accessor, self.prefix
            ))
        })?;
        T::resolve(&self.provider, key)
    }
}

impl fmt::Debug for BoundView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundView")
            .field("prefix", &self.prefix)
            .field("keys", &self.keys)
            .finish()
    }
}
