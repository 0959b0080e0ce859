//! Configuration provider.

use std::fmt;
use std::sync::Arc;

use strata_core::{
    ConfigError, ConfigurationSource, Environment, RefreshStrategy, Refreshable, Result, Snapshot,
};
use tracing::{debug, warn};

use crate::bind::{BoundView, ConfigInterface, validate_interface};
use crate::convert::{FromConfigValue, convert_entry};

/// Binds a [`ConfigurationSource`] and an [`Environment`] to typed access.
///
/// The provider never caches: every `get` and every accessor of a bound view
/// asks the source for the current snapshot. Cloning is cheap and clones
/// share the same source and refresh strategies.
///
/// Refresh strategies registered through the builder are shut down when the
/// last clone (including clones held by bound views) is dropped, or earlier
/// with [`shutdown`](Self::shutdown).
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use strata_bind::{ConfigurationProvider, config_interface};
/// use strata_core::{ConfigurationSource, Environment, Result, Snapshot};
///
/// struct Fixed(Snapshot);
/// impl ConfigurationSource for Fixed {
///     fn get_configuration_for(&self, _: &Environment) -> Result<Snapshot> {
///         Ok(self.0.clone())
///     }
///     fn name(&self) -> &str {
///         "fixed"
///     }
/// }
///
/// config_interface! {
///     pub struct Server {
///         port: u16,
///         hosts: Vec<String>,
///     }
/// }
///
/// let source = Fixed([("server.port", "8080"), ("server.hosts", "a,b")].into_iter().collect());
/// let provider = ConfigurationProvider::new(Arc::new(source));
///
/// assert_eq!(provider.get::<u16>("server.port").unwrap(), 8080);
/// let server: Server = provider.bind("server").unwrap();
/// assert_eq!(server.hosts().unwrap(), vec!["a", "b"]);
/// ```
#[derive(Clone)]
pub struct ConfigurationProvider {
    inner: Arc<ProviderInner>,
}

struct ProviderInner {
    source: Arc<dyn ConfigurationSource>,
    environment: Environment,
    strategies: Vec<Arc<dyn RefreshStrategy>>,
}

impl Drop for ProviderInner {
    fn drop(&mut self) {
        for strategy in &self.strategies {
            strategy.shutdown();
        }
    }
}

impl ConfigurationProvider {
    /// Creates a provider reading the default environment of `source`.
    pub fn new(source: Arc<dyn ConfigurationSource>) -> Self {
        Self::with_environment(source, Environment::root())
    }

    /// Creates a provider reading `environment` of `source`.
    pub fn with_environment(source: Arc<dyn ConfigurationSource>, environment: Environment) -> Self {
        Self {
            inner: Arc::new(ProviderInner {
                source,
                environment,
                strategies: Vec::new(),
            }),
        }
    }

    /// Starts building a provider with refresh strategies attached.
    pub fn builder() -> ConfigurationProviderBuilder {
        ConfigurationProviderBuilder::default()
    }

    /// Returns the environment this provider reads.
    pub fn environment(&self) -> &Environment {
        &self.inner.environment
    }

    /// Returns the underlying source.
    pub fn source(&self) -> &Arc<dyn ConfigurationSource> {
        &self.inner.source
    }

    /// Returns the current snapshot for the provider's environment.
    pub fn all_configuration(&self) -> Result<Snapshot> {
        self.inner
            .source
            .get_configuration_for(&self.inner.environment)
    }

    /// Reads `key` from the current snapshot and converts it to `T`.
    ///
    /// # Errors
    ///
    /// - source errors from reading the snapshot
    /// - `ConfigError::MissingKey` if the key is absent (unless `T` is an `Option`)
    /// - `ConfigError::Conversion` if the value does not parse as `T`
    pub fn get<T: FromConfigValue>(&self, key: &str) -> Result<T> {
        let snapshot = self.all_configuration()?;
        convert_entry(&snapshot, key)
    }

    /// Binds the interface `T` at `prefix`.
    ///
    /// Every accessor (recursively through nested interfaces) is validated
    /// against one current snapshot before the view is returned. The view
    /// itself holds no values; each accessor call reads the snapshot again.
    pub fn bind<T: ConfigInterface>(&self, prefix: &str) -> Result<T> {
        let snapshot = self.all_configuration()?;
        validate_interface::<T>(&snapshot, prefix)?;

        debug!(
            prefix = prefix,
            environment = %self.inner.environment,
            "Bound {}",
            std::any::type_name::<T>()
        );
        Ok(T::from_view(BoundView::new::<T>(self.clone(), prefix)))
    }

    /// Shuts down every refresh strategy attached to this provider.
    pub fn shutdown(&self) {
        for strategy in &self.inner.strategies {
            strategy.shutdown();
        }
    }
}

impl fmt::Debug for ConfigurationProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigurationProvider")
            .field("source", &self.inner.source.name())
            .field("environment", &self.inner.environment)
            .field("strategies", &self.inner.strategies.len())
            .finish()
    }
}

/// Builder for [`ConfigurationProvider`].
#[derive(Default)]
pub struct ConfigurationProviderBuilder {
    source: Option<Arc<dyn ConfigurationSource>>,
    environment: Environment,
    registrations: Vec<(Arc<dyn RefreshStrategy>, Arc<dyn Refreshable>)>,
}

impl ConfigurationProviderBuilder {
    /// Sets the configuration source.
    pub fn with_source(mut self, source: Arc<dyn ConfigurationSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Sets the environment (default: root).
    pub fn with_environment(mut self, environment: impl Into<Environment>) -> Self {
        self.environment = environment.into();
        self
    }

    /// Registers `strategy` to drive `resource`; it is initialized by
    /// [`build`](Self::build).
    pub fn refresh_with(
        mut self,
        strategy: Arc<dyn RefreshStrategy>,
        resource: Arc<dyn Refreshable>,
    ) -> Self {
        self.registrations.push((strategy, resource));
        self
    }

    /// Initializes the registered strategies and builds the provider.
    ///
    /// # Errors
    ///
    /// - `ConfigError::InvalidState` if no source was set
    /// - the first strategy initialization error; strategies already started
    ///   are shut down again
    pub fn build(self) -> Result<ConfigurationProvider> {
        let source = self
            .source
            .ok_or_else(|| ConfigError::invalid_state("a configuration source is required"))?;

        let mut strategies: Vec<Arc<dyn RefreshStrategy>> = Vec::new();
        for (strategy, resource) in self.registrations {
            if let Err(e) = strategy.init(resource) {
                warn!(error = %e, "Refresh strategy failed to initialize");
                strategy.shutdown();
                for started in &strategies {
                    started.shutdown();
                }
                return Err(e);
            }
            strategies.push(strategy);
        }

        Ok(ConfigurationProvider {
            inner: Arc::new(ProviderInner {
                source,
                environment: self.environment,
                strategies,
            }),
        })
    }
}
