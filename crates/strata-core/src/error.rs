//! Error types for Strata.
//!
//! Every operation in the system reports failures through [`ConfigError`].
//! The variants are *kinds*, not call sites: callers match on them to tell an
//! environment that is not deployed yet apart from an infrastructure failure,
//! or a missing key apart from a malformed value.
//!
//! # Example
//!
//! ```
//! use strata_core::{ConfigError, Result};
//!
//! fn port(raw: Option<&str>) -> Result<u16> {
//!     let raw = raw.ok_or_else(|| ConfigError::missing_key("server.port"))?;
//!     raw.parse()
//!         .map_err(|e: std::num::ParseIntError| {
//!             ConfigError::conversion("server.port", raw, "u16", e.to_string())
//!         })
//! }
//!
//! assert!(port(None).unwrap_err().is_missing_key());
//! assert!(port(Some("http")).unwrap_err().is_conversion_error());
//! ```

use std::io;
use thiserror::Error;

type Cause = Box<dyn std::error::Error + Send + Sync>;

/// Main error type for Strata operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A configuration source could not be created.
    ///
    /// Raised synchronously from source construction (invalid options,
    /// unreachable remote, unwritable clone directory). Never retried.
    #[error("Failed to create configuration source '{source_name}': {message}")]
    SourceConstruction {
        /// Name of the source being created
        source_name: String,
        /// Description of what went wrong
        message: String,
        /// Underlying error, if any
        #[source]
        cause: Option<Cause>,
    },

    /// A source failed to synchronize its backing store.
    #[error("Failed to synchronize source '{source_name}': {message}")]
    Synchronization {
        /// Name of the source that failed
        source_name: String,
        /// Description of what went wrong
        message: String,
        /// Underlying error, if any
        #[source]
        cause: Option<Cause>,
    },

    /// The environment does not map to an existing physical location.
    #[error("Environment '{environment}' cannot be resolved: {message}")]
    MissingEnvironment {
        /// The environment that was requested
        environment: String,
        /// Why it could not be resolved
        message: String,
    },

    /// A required configuration file could not be read.
    #[error("Failed to read configuration from '{location}': {message}")]
    Read {
        /// File or location that was read
        location: String,
        /// Description of the failure
        message: String,
        /// Underlying error, if any
        #[source]
        cause: Option<Cause>,
    },

    /// Configuration content could not be parsed.
    #[error("Failed to parse configuration from '{source_name}': {message}")]
    Parse {
        /// Source of the content (file name, format)
        source_name: String,
        /// Description of the parse error
        message: String,
        /// Underlying error, if any
        #[source]
        cause: Option<Cause>,
    },

    /// A required property was not found.
    #[error("Property '{key}' not found in configuration")]
    MissingKey {
        /// The key that was requested
        key: String,
    },

    /// A property is present but cannot be converted to the requested type.
    #[error("Cannot convert property '{key}' with value '{value}' to {target}: {message}")]
    Conversion {
        /// The key whose value failed to convert
        key: String,
        /// The raw value
        value: String,
        /// Name of the requested type
        target: String,
        /// Why the conversion failed
        message: String,
    },

    /// A lifecycle operation was invoked in the wrong state.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl ConfigError {
    // ============================================
    // Convenience constructors
    // ============================================

    /// Creates a SourceConstruction error.
    pub fn source_construction(source: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SourceConstruction {
            source_name: source.into(),
            message: message.into(),
            cause: None,
        }
    }

    /// Creates a SourceConstruction error with a cause.
    pub fn source_construction_with_cause<E>(
        source: impl Into<String>,
        message: impl Into<String>,
        cause: E,
    ) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::SourceConstruction {
            source_name: source.into(),
            message: message.into(),
            cause: Some(Box::new(cause)),
        }
    }

    /// Creates a Synchronization error.
    pub fn synchronization(source: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Synchronization {
            source_name: source.into(),
            message: message.into(),
            cause: None,
        }
    }

    /// Creates a Synchronization error with a cause.
    pub fn synchronization_with_cause<E>(
        source: impl Into<String>,
        message: impl Into<String>,
        cause: E,
    ) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Synchronization {
            source_name: source.into(),
            message: message.into(),
            cause: Some(Box::new(cause)),
        }
    }

    /// Creates a MissingEnvironment error.
    pub fn missing_environment(environment: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MissingEnvironment {
            environment: environment.into(),
            message: message.into(),
        }
    }

    /// Creates a Read error.
    pub fn read(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Read {
            location: location.into(),
            message: message.into(),
            cause: None,
        }
    }

    /// Creates a Read error with a cause.
    pub fn read_with_cause<E>(location: impl Into<String>, message: impl Into<String>, cause: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Read {
            location: location.into(),
            message: message.into(),
            cause: Some(Box::new(cause)),
        }
    }

    /// Creates a Parse error without a cause.
    pub fn parse_error(source: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            source_name: source.into(),
            message: message.into(),
            cause: None,
        }
    }

    /// Creates a Parse error with a cause.
    pub fn parse_error_with_cause<E>(
        source: impl Into<String>,
        message: impl Into<String>,
        cause: E,
    ) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Parse {
            source_name: source.into(),
            message: message.into(),
            cause: Some(Box::new(cause)),
        }
    }

    /// Creates a MissingKey error.
    pub fn missing_key(key: impl Into<String>) -> Self {
        Self::MissingKey { key: key.into() }
    }

    /// Creates a Conversion error.
    pub fn conversion(
        key: impl Into<String>,
        value: impl Into<String>,
        target: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Conversion {
            key: key.into(),
            value: value.into(),
            target: target.into(),
            message: message.into(),
        }
    }

    /// Creates an InvalidState error.
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState(message.into())
    }

    // ============================================
    // Query methods
    // ============================================

    /// Returns true if source construction failed.
    pub fn is_source_construction_error(&self) -> bool {
        matches!(self, Self::SourceConstruction { .. })
    }

    /// Returns true if this is a synchronization failure.
    pub fn is_synchronization_error(&self) -> bool {
        matches!(self, Self::Synchronization { .. })
    }

    /// Returns true if the requested environment does not exist.
    pub fn is_missing_environment(&self) -> bool {
        matches!(self, Self::MissingEnvironment { .. })
    }

    /// Returns true if a required file could not be read.
    pub fn is_read_error(&self) -> bool {
        matches!(self, Self::Read { .. })
    }

    /// Returns true if this is a parse error.
    pub fn is_parse_error(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }

    /// Returns true if a requested key is absent.
    pub fn is_missing_key(&self) -> bool {
        matches!(self, Self::MissingKey { .. })
    }

    /// Returns true if a value could not be converted.
    pub fn is_conversion_error(&self) -> bool {
        matches!(self, Self::Conversion { .. })
    }

    /// Returns true if a lifecycle operation was called in the wrong state.
    pub fn is_invalid_state(&self) -> bool {
        matches!(self, Self::InvalidState(_))
    }

    /// Returns true if this is an I/O error.
    pub fn is_io_error(&self) -> bool {
        matches!(self, Self::Io(_))
    }
}

/// Type alias for Results with ConfigError.
pub type Result<T> = std::result::Result<T, ConfigError>;
