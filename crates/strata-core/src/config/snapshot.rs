use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Separator between the segments of a hierarchical key.
pub const KEY_SEPARATOR: char = '.';

/// An immutable, flat view of configuration at one point in time.
///
/// Keys are dot-delimited hierarchies (`server.port`), values are the raw
/// strings found in the backing store. Typed access is the job of the
/// binding layer; a snapshot only stores and looks up text.
///
/// We use `IndexMap` so iteration follows insertion order, which keeps merged
/// output and debug listings predictable.
///
/// A snapshot has no mutating methods. It is assembled from an iterator of
/// pairs, from an `IndexMap`, or by [`Snapshot::merge`].
///
/// # Example
///
/// ```
/// use strata_core::Snapshot;
///
/// let snapshot: Snapshot = [("server.port", "8080"), ("server.host", "localhost")]
///     .into_iter()
///     .collect();
///
/// assert_eq!(snapshot.get("server.port"), Some("8080"));
/// assert_eq!(snapshot.get("server.ssl"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Snapshot {
    #[serde(flatten)]
    inner: IndexMap<String, String>,
}

impl Snapshot {
    /// Creates an empty snapshot.
    pub fn new() -> Self {
        Self {
            inner: IndexMap::new(),
        }
    }

    /// Returns a reference to the internal map.
    pub fn as_inner(&self) -> &IndexMap<String, String> {
        &self.inner
    }

    /// Returns true if the snapshot contains no entries.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Looks up the raw value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.inner.get(key).map(String::as_str)
    }

    /// Returns true if `key` is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.contains_key(key)
    }

    /// Iterates over the keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.inner.keys().map(String::as_str)
    }

    /// Iterates over `(key, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns the entries below `prefix`, with the prefix stripped.
    ///
    /// An empty prefix returns a copy of the whole snapshot.
    pub fn subset(&self, prefix: &str) -> Snapshot {
        if prefix.is_empty() {
            return self.clone();
        }

        self.inner
            .iter()
            .filter_map(|(key, value)| {
                key.strip_prefix(prefix)
                    .and_then(|rest| rest.strip_prefix(KEY_SEPARATOR))
                    .map(|rest| (rest.to_string(), value.clone()))
            })
            .collect()
    }

    /// Merges snapshots in order; a key in a later snapshot replaces the same
    /// key from an earlier one.
    pub fn merge<I>(snapshots: I) -> Snapshot
    where
        I: IntoIterator<Item = Snapshot>,
    {
        let mut inner = IndexMap::new();
        for snapshot in snapshots {
            inner.extend(snapshot.inner);
        }
        Snapshot { inner }
    }
}

/// Joins a key prefix and a segment with [`KEY_SEPARATOR`].
///
/// An empty prefix yields the segment unchanged.
pub fn compose_key(prefix: &str, segment: &str) -> String {
    if prefix.is_empty() {
        segment.to_string()
    } else {
        format!("{}{}{}", prefix, KEY_SEPARATOR, segment)
    }
}

impl<K, V> FromIterator<(K, V)> for Snapshot
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Snapshot {
            inner: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl From<IndexMap<String, String>> for Snapshot {
    fn from(map: IndexMap<String, String>) -> Self {
        Snapshot { inner: map }
    }
}

impl IntoIterator for Snapshot {
    type Item = (String, String);
    type IntoIter = indexmap::map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.into_iter()
    }
}
