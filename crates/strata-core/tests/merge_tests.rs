use strata_core::merge::PropertySourceList;
use strata_core::{PropertySource, parse_file};
use tempfile::TempDir;

mod common;

#[test]
fn test_cascading_file_merge_scenario() {
    let dir = TempDir::new().unwrap();
    let base = common::write_file(
        dir.path(),
        "application.properties",
        "server.port=8000\nserver.host=localhost\nlogging.level=INFO\nlogging.file=app.log\n",
    );
    let prod = common::write_file(
        dir.path(),
        "prod/application.yml",
        "server:\n  port: 80\nlogging:\n  level: WARN\n",
    );

    let mut list = PropertySourceList::new();
    for path in [&base, &prod] {
        list.add(PropertySource::new(
            path.display().to_string(),
            parse_file(path).unwrap(),
        ));
    }
    let merged = list.into_snapshot();

    assert_eq!(merged.get("server.port"), Some("80")); // Overridden
    assert_eq!(merged.get("server.host"), Some("localhost")); // Preserved
    assert_eq!(merged.get("logging.level"), Some("WARN")); // Overridden
    assert_eq!(merged.get("logging.file"), Some("app.log")); // Preserved
}

#[test]
fn test_property_source_list_precedence() {
    let mut list = PropertySourceList::new();

    list.add(common::source(
        "defaults",
        &[("app.timeout", "5000"), ("app.retries", "3")],
    ));
    list.add(common::source("app.properties", &[("app.timeout", "1000")]));
    list.add(common::source("local.properties", &[("app.retries", "5")]));

    let merged = list.merge();

    assert_eq!(merged.get("app.timeout"), Some("1000"));
    assert_eq!(merged.get("app.retries"), Some("5"));
}

#[test]
fn test_list_values_replaced() {
    let mut list = PropertySourceList::new();

    list.add(common::source("base", &[("whitelist", "127.0.0.1")]));
    list.add(common::source("overlay", &[("whitelist", "10.0.0.1,10.0.0.2")]));

    let merged = list.merge();
    assert_eq!(merged.get("whitelist"), Some("10.0.0.1,10.0.0.2"));
}

#[test]
fn test_complex_yaml_flattened() {
    let dir = TempDir::new().unwrap();
    let path = common::write_file(dir.path(), "application.yaml", common::complex_yaml());

    let config = parse_file(&path).unwrap();

    assert_eq!(config.get("server.ssl.enabled"), Some("true"));
    assert_eq!(config.get("database.primary.pool"), Some("10"));
    assert_eq!(config.get("features"), Some("new-ui,beta-api"));
    assert_eq!(config.subset("server.ssl").len(), 2);
}
