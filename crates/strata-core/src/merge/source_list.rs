use crate::config::{PropertySource, Snapshot};

/// Helper to collect and merge multiple `PropertySource`s.
///
/// Sources are applied in insertion order, so the last source added has the
/// highest precedence.
#[derive(Debug, Default)]
pub struct PropertySourceList {
    sources: Vec<PropertySource>,
}

impl PropertySourceList {
    /// Creates a new empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a property source; it overrides every source added before it.
    pub fn add(&mut self, source: PropertySource) {
        self.sources.push(source);
    }

    /// Merges all sources into a single snapshot.
    pub fn merge(&self) -> Snapshot {
        Snapshot::merge(self.sources.iter().map(|s| s.snapshot.clone()))
    }

    /// Consumes the list and merges without cloning.
    pub fn into_snapshot(self) -> Snapshot {
        Snapshot::merge(self.sources.into_iter().map(|s| s.snapshot))
    }

    /// Returns the sources in application order.
    pub fn sources(&self) -> &[PropertySource] {
        &self.sources
    }

    /// Returns the number of sources.
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Returns true if no source was added.
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(name: &str, pairs: &[(&str, &str)]) -> PropertySource {
        PropertySource::new(name, pairs.iter().copied().collect())
    }

    #[test]
    fn test_insertion_order_precedence() {
        let mut list = PropertySourceList::new();
        list.add(source("application.properties", &[("key", "low"), ("a", "1")]));
        list.add(source("override.properties", &[("key", "mid")]));
        list.add(source("local.properties", &[("key", "high")]));

        let merged = list.merge();
        assert_eq!(merged.get("key"), Some("high"));
        assert_eq!(merged.get("a"), Some("1"));
        assert_eq!(list.len(), 3);
        assert_eq!(list.sources()[0].name, "application.properties");
    }

    #[test]
    fn test_into_snapshot_matches_merge() {
        let mut list = PropertySourceList::new();
        list.add(source("one", &[("x", "1")]));
        list.add(source("two", &[("y", "2")]));

        let merged = list.merge();
        assert_eq!(list.into_snapshot(), merged);
    }
}
