#![allow(dead_code)]
use std::fs;
use std::path::{Path, PathBuf};

use strata_core::{PropertySource, Snapshot};

/// Builds a snapshot from key/value pairs.
pub fn snapshot(pairs: &[(&str, &str)]) -> Snapshot {
    pairs.iter().copied().collect()
}

/// Builds a named property source from key/value pairs.
pub fn source(name: &str, pairs: &[(&str, &str)]) -> PropertySource {
    PropertySource::new(name, snapshot(pairs))
}

/// Writes `content` to `dir/relative`, creating parent directories.
pub fn write_file(dir: &Path, relative: &str, content: &str) -> PathBuf {
    let path = dir.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create fixture directory");
    }
    fs::write(&path, content).expect("Failed to write fixture file");
    path
}

/// Returns a nested YAML fixture.
pub fn complex_yaml() -> &'static str {
    r#"
server:
  port: 8080
  host: localhost
  ssl:
    enabled: true
    cert: /path/to/cert
database:
  primary:
    url: jdbc:postgres://local
    pool: 10
features:
  - new-ui
  - beta-api
"#
}
