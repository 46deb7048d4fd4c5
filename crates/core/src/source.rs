//! Source configuration loading.
//!
//! A config document is either `{ "sources": [ ... ] }` or a bare array of
//! source rows. Each row is deserialized into a lenient [`RawSource`] and then
//! validated and defaulted into an immutable [`SourceConfig`].

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;
use url::Url;

use crate::{PagefeedError, Result};

pub const DEFAULT_MAX_ITEMS: usize = 30;
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 20;
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; blog-rss-feed/1.0)";

/// Everything needed to turn one listing page into one feed.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceConfig {
    /// Unique, non-empty identifier.
    pub id: String,
    /// Listing page URL.
    pub url: String,
    /// Site root, used as the channel link.
    pub site_url: String,
    pub feed_title: String,
    pub feed_description: String,
    /// Where the rendered RSS document is written.
    pub output_rss: PathBuf,
    pub max_items: usize,
    /// Regexes a link must match at least one of (when non-empty).
    pub include_url_patterns: Vec<String>,
    /// Regexes that reject a link on any match.
    pub exclude_url_patterns: Vec<String>,
    /// CSS selectors restricting anchor extraction.
    pub link_scope_selectors: Vec<String>,
    /// Whether JSON-LD blocks are consulted.
    pub use_json_ld: bool,
    pub user_agent: String,
    pub timeout_seconds: u64,
}

impl SourceConfig {
    /// Builds a source with every optional field at its default.
    pub fn new(id: &str, url: &str) -> Result<Self> {
        RawSource { id: Some(id.to_string()), url: Some(url.to_string()), ..Default::default() }.into_config(0)
    }
}

/// A source row as it appears in the config document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSource {
    pub id: Option<String>,
    pub url: Option<String>,
    pub site_url: Option<String>,
    pub feed_title: Option<String>,
    pub feed_description: Option<String>,
    pub output_rss: Option<String>,
    pub max_items: Option<usize>,
    #[serde(default)]
    pub include_url_patterns: Vec<String>,
    #[serde(default)]
    pub exclude_url_patterns: Vec<String>,
    #[serde(default)]
    pub link_scope_selectors: Vec<String>,
    pub use_json_ld: Option<Flag>,
    pub user_agent: Option<String>,
    pub timeout_seconds: Option<u64>,
}

/// A loosely typed boolean: `true`, `1`, `"yes"`, `"off"` and so on.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Flag {
    Bool(bool),
    Number(f64),
    Text(String),
    Other(Value),
}

impl Flag {
    /// Interprets the flag, falling back to `default` for unrecognized values.
    pub fn resolve(&self, default: bool) -> bool {
        match self {
            Flag::Bool(value) => *value,
            Flag::Number(value) => *value != 0.0,
            Flag::Text(text) => match text.trim().to_lowercase().as_str() {
                "1" | "true" | "yes" | "y" | "on" => true,
                "0" | "false" | "no" | "n" | "off" => false,
                _ => default,
            },
            Flag::Other(_) => default,
        }
    }
}

impl RawSource {
    /// Validates the row and applies defaults.
    ///
    /// `index` is the row position, used only in error messages.
    pub fn into_config(self, index: usize) -> Result<SourceConfig> {
        let id = required(self.id, "id", index)?;
        let url = required(self.url, "url", index)?;

        let site_url = match non_empty(self.site_url) {
            Some(site_url) => site_url,
            None => site_root(&url)?,
        };

        Ok(SourceConfig {
            feed_title: non_empty(self.feed_title).unwrap_or_else(|| id.clone()),
            feed_description: non_empty(self.feed_description)
                .unwrap_or_else(|| format!("Generated feed for {url}")),
            output_rss: non_empty(self.output_rss)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(format!("feeds/{id}.rss.xml"))),
            max_items: self.max_items.unwrap_or(DEFAULT_MAX_ITEMS),
            include_url_patterns: self.include_url_patterns,
            exclude_url_patterns: self.exclude_url_patterns,
            link_scope_selectors: self.link_scope_selectors,
            use_json_ld: self.use_json_ld.is_none_or(|flag| flag.resolve(true)),
            user_agent: non_empty(self.user_agent).unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            timeout_seconds: self.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS),
            id,
            url,
            site_url,
        })
    }
}

fn required(value: Option<String>, field: &str, index: usize) -> Result<String> {
    non_empty(value).ok_or_else(|| PagefeedError::ConfigError(format!("source #{index} is missing `{field}`")))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// `scheme://host[:port]` of a listing URL.
fn site_root(url: &str) -> Result<String> {
    let parsed = Url::parse(url).map_err(|e| PagefeedError::InvalidUrl(format!("{url}: {e}")))?;
    let host = parsed
        .host_str()
        .ok_or_else(|| PagefeedError::InvalidUrl(format!("{url}: missing host")))?;

    Ok(match parsed.port() {
        Some(port) => format!("{}://{}:{}", parsed.scheme(), host, port),
        None => format!("{}://{}", parsed.scheme(), host),
    })
}

/// Parses a config document from a JSON string.
pub fn parse_sources(json: &str) -> Result<Vec<SourceConfig>> {
    let raw: Value =
        serde_json::from_str(json).map_err(|e| PagefeedError::ConfigError(format!("invalid JSON: {e}")))?;

    let rows = match raw {
        Value::Array(rows) => rows,
        Value::Object(mut map) => match map.remove("sources") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(rows)) => rows,
            Some(_) => return Err(PagefeedError::ConfigError("`sources` must be an array".to_string())),
        },
        _ => return Err(PagefeedError::ConfigError("Config must be an object or array".to_string())),
    };

    rows.into_iter()
        .enumerate()
        .map(|(index, row)| {
            let raw: RawSource = serde_json::from_value(row)
                .map_err(|e| PagefeedError::ConfigError(format!("source #{index}: {e}")))?;
            raw.into_config(index)
        })
        .collect()
}

/// Reads and parses a config file.
pub fn load_sources(path: &Path) -> Result<Vec<SourceConfig>> {
    if !path.exists() {
        return Err(PagefeedError::FileNotFound(path.to_path_buf()));
    }

    let contents = fs::read_to_string(path)?;
    parse_sources(&contents)
}

/// Narrows `sources` to the one with `source_id`, when given.
pub fn select_sources(sources: Vec<SourceConfig>, source_id: Option<&str>) -> Result<Vec<SourceConfig>> {
    let Some(source_id) = source_id else {
        return Ok(sources);
    };

    let selected: Vec<_> = sources.into_iter().filter(|s| s.id == source_id).collect();
    if selected.is_empty() {
        return Err(PagefeedError::ConfigError(format!("source_id not found: {source_id}")));
    }
    Ok(selected)
}
