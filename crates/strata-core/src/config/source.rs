use crate::config::snapshot::Snapshot;
use serde::{Deserialize, Serialize};

/// A named set of properties read from one place.
///
/// A property source usually corresponds to a single file at a resolved
/// location (e.g. `git:master:application.properties`). Sources are merged
/// into the snapshot a caller sees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertySource {
    /// The name of the property source (e.g., "application.properties").
    pub name: String,

    /// The source origin details (e.g., URI, file path).
    #[serde(default)]
    pub origin: String,

    /// The properties read from this source.
    pub snapshot: Snapshot,
}

impl PropertySource {
    /// Creates a new PropertySource.
    pub fn new(name: impl Into<String>, snapshot: Snapshot) -> Self {
        Self {
            name: name.into(),
            origin: String::new(),
            snapshot,
        }
    }

    /// Sets the origin.
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = origin.into();
        self
    }
}
