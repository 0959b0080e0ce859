use crate::config::Snapshot;
use crate::error::{ConfigError, Result};
use crate::format::FormatParser;
use crate::format::flatten::flatten_document;

pub struct JsonFormat;

impl FormatParser for JsonFormat {
    fn parse(&self, input: &str) -> Result<Snapshot> {
        if input.trim().is_empty() {
            return Ok(Snapshot::new());
        }
        let document: serde_json::Value = serde_json::from_str(input)
            .map_err(|e| ConfigError::parse_error_with_cause("json", e.to_string(), e))?;
        flatten_document("json", document)
    }
}
