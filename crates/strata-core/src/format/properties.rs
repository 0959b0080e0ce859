use std::io::Cursor;

use indexmap::IndexMap;
use java_properties::PropertiesIter;

use crate::config::Snapshot;
use crate::error::{ConfigError, Result};
use crate::format::FormatParser;

/// Java `.properties` parser.
///
/// Handles `=`, `:` and whitespace separators, `#`/`!` comments, line
/// continuations and unicode escapes. Keys keep their file order; a key
/// repeated within one file keeps its last value.
pub struct PropertiesFormat;

impl FormatParser for PropertiesFormat {
    fn parse(&self, input: &str) -> Result<Snapshot> {
        let mut entries = IndexMap::new();

        PropertiesIter::new(Cursor::new(input.as_bytes()))
            .read_into(|key, value| {
                entries.insert(key, value);
            })
            .map_err(|e| ConfigError::parse_error("properties", e.to_string()))?;

        Ok(Snapshot::from(entries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_properties() {
        let input = "
        # Server config
        server.port=8080
        server.host: localhost
        app.name = Test App
        ";

        let config = PropertiesFormat.parse(input).unwrap();

        assert_eq!(config.get("server.port"), Some("8080"));
        assert_eq!(config.get("server.host"), Some("localhost"));
        assert_eq!(config.get("app.name"), Some("Test App"));
    }

    #[test]
    fn test_order_and_duplicates() {
        let input = "b=1\na=2\nb=3\n";
        let config = PropertiesFormat.parse(input).unwrap();

        let keys: Vec<&str> = config.keys().collect();
        assert_eq!(keys, vec!["b", "a"]);
        assert_eq!(config.get("b"), Some("3"));
    }

    #[test]
    fn test_continuation_and_escapes() {
        let input = "list=a,\\\n    b,\\\n    c\ngreeting=caf\\u00e9\n";
        let config = PropertiesFormat.parse(input).unwrap();

        assert_eq!(config.get("list"), Some("a,b,c"));
        assert_eq!(config.get("greeting"), Some("café"));
    }

    #[test]
    fn test_empty_input() {
        assert!(PropertiesFormat.parse("").unwrap().is_empty());
        assert!(PropertiesFormat.parse("# only a comment\n").unwrap().is_empty());
    }
}
