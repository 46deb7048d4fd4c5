use serde::Serialize;

use crate::item::FeedItem;
use crate::{PagefeedError, Result};

/// JSON preview of one source's ranked items
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput<'a> {
    pub source: &'a str,
    pub count: usize,
    pub items: &'a [FeedItem],
}

/// Configuration for JSON output
#[derive(Debug, Clone, Default)]
pub struct JsonConfig {
    /// Pretty print JSON output
    pub pretty: bool,
}

/// Render ranked items as JSON (used by dry runs)
pub fn convert_to_json(source_id: &str, items: &[FeedItem], config: &JsonConfig) -> Result<String> {
    let output = JsonOutput { source: source_id, count: items.len(), items };

    let rendered = if config.pretty { serde_json::to_string_pretty(&output) } else { serde_json::to_string(&output) };
    rendered.map_err(|e| PagefeedError::SerializeError(e.to_string()))
}
