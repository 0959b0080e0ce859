//! Configuration source contracts.

use crate::config::Snapshot;
use crate::error::Result;
use crate::types::Environment;

/// A pull-based provider of flat configuration snapshots.
///
/// Sources never push changes. Every call returns a freshly built
/// [`Snapshot`]; callers that want live values simply call again. Reads are
/// blocking and may be issued concurrently from any thread.
///
/// # Implementors
///
/// - `GitConfigurationSource` - reads files from a branch of a git repository
/// - Anything holding a map in memory, for tests
///
/// # Example
///
/// ```
/// use strata_core::{ConfigurationSource, Environment, Result, Snapshot};
///
/// struct Fixed(Snapshot);
///
/// impl ConfigurationSource for Fixed {
///     fn get_configuration_for(&self, _environment: &Environment) -> Result<Snapshot> {
///         Ok(self.0.clone())
///     }
///
///     fn name(&self) -> &str {
///         "fixed"
///     }
/// }
///
/// let source = Fixed([("a", "1")].into_iter().collect());
/// assert_eq!(source.get_configuration().unwrap().get("a"), Some("1"));
/// ```
pub trait ConfigurationSource: Send + Sync {
    /// Returns the snapshot for the default (root) environment.
    ///
    /// # Errors
    ///
    /// Fails with a read error if the backing store cannot be read.
    fn get_configuration(&self) -> Result<Snapshot> {
        self.get_configuration_for(&Environment::root())
    }

    /// Returns the snapshot for `environment`.
    ///
    /// # Errors
    ///
    /// - `ConfigError::MissingEnvironment` if the environment does not map to
    ///   an existing location
    /// - `ConfigError::Read` / `ConfigError::Parse` if a file cannot be read
    /// - `ConfigError::Synchronization` if the source can no longer be used
    fn get_configuration_for(&self, environment: &Environment) -> Result<Snapshot>;

    /// Returns the name of this source, used in logs and error messages.
    fn name(&self) -> &str;
}

/// Anything that can re-synchronize with its backing store.
pub trait Refreshable: Send + Sync {
    /// Brings the local state up to date.
    ///
    /// Safe to call repeatedly. Blocks the calling thread.
    fn refresh(&self) -> Result<()>;
}

impl<S: ConfigurationSource + ?Sized> ConfigurationSource for std::sync::Arc<S> {
    fn get_configuration(&self) -> Result<Snapshot> {
        (**self).get_configuration()
    }

    fn get_configuration_for(&self, environment: &Environment) -> Result<Snapshot> {
        (**self).get_configuration_for(environment)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<R: Refreshable + ?Sized> Refreshable for std::sync::Arc<R> {
    fn refresh(&self) -> Result<()> {
        (**self).refresh()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct MockSource {
        refreshes: AtomicUsize,
    }

    impl ConfigurationSource for MockSource {
        fn get_configuration_for(&self, environment: &Environment) -> Result<Snapshot> {
            if environment.as_str() == "missing" {
                return Err(ConfigError::missing_environment(
                    environment.as_str(),
                    "no such branch",
                ));
            }
            let count = self.refreshes.load(Ordering::SeqCst).to_string();
            Ok([("env", environment.as_str()), ("refreshes", count.as_str())]
                .into_iter()
                .collect())
        }

        fn name(&self) -> &str {
            "mock"
        }
    }

    impl Refreshable for MockSource {
        fn refresh(&self) -> Result<()> {
            self.refreshes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[test]
    fn test_default_environment_is_root() {
        let source = MockSource {
            refreshes: AtomicUsize::new(0),
        };
        let snapshot = source.get_configuration().unwrap();
        assert_eq!(snapshot.get("env"), Some(""));
    }

    #[test]
    fn test_missing_environment() {
        let source = MockSource {
            refreshes: AtomicUsize::new(0),
        };
        let err = source
            .get_configuration_for(&Environment::new("missing"))
            .unwrap_err();
        assert!(err.is_missing_environment());
    }

    #[test]
    fn test_arc_delegation() {
        let source = Arc::new(MockSource {
            refreshes: AtomicUsize::new(0),
        });
        let as_source: Arc<dyn ConfigurationSource> = source.clone();
        let as_refreshable: Arc<dyn Refreshable> = source.clone();

        as_refreshable.refresh().unwrap();
        as_refreshable.refresh().unwrap();

        assert_eq!(as_source.name(), "mock");
        assert_eq!(
            as_source.get_configuration().unwrap().get("refreshes"),
            Some("2")
        );
    }
}
