//! Candidate extraction from embedded JSON-LD blocks.
//!
//! Every `<script type="application/ld+json">` block is parsed and walked
//! depth-first. Objects whose `@type` names an article type become
//! candidates; traversal always continues into their children, so article
//! nodes nested in `ItemList`, `@graph` or `Blog.blogPost` wrappers are all
//! found.

use serde_json::{Map, Value};

use crate::filter::LinkFilter;
use crate::item::FeedItem;
use crate::normalize::{clean_text, normalize_link, parse_date, title_from_slug};
use crate::observe::Observer;
use crate::parse::Document;
use crate::source::SourceConfig;

/// `@type` values treated as articles.
pub const ARTICLE_TYPES: &[&str] = &["Article", "BlogPosting", "NewsArticle", "TechArticle"];

/// Extracts article candidates from every JSON-LD block in `doc`.
///
/// Returns an empty list when the source has `use_json_ld` turned off.
/// Blocks that are empty or not valid JSON are skipped.
pub fn extract_json_ld_items(
    doc: &Document, source: &SourceConfig, filter: &LinkFilter, observer: &mut dyn Observer,
) -> Vec<FeedItem> {
    if !source.use_json_ld {
        return Vec::new();
    }

    let mut items = Vec::new();
    let walker = Walker { base_url: &source.url, filter };

    for (index, block) in doc.json_ld_blocks().iter().enumerate() {
        let raw = block.trim();
        if raw.is_empty() {
            continue;
        }

        match serde_json::from_str::<Value>(raw) {
            Ok(payload) => walker.walk(&payload, &mut items),
            Err(e) => observer.debug(&format!("skipping malformed JSON-LD block #{index}: {e}")),
        }
    }

    items
}

struct Walker<'a> {
    base_url: &'a str,
    filter: &'a LinkFilter,
}

impl Walker<'_> {
    fn walk(&self, node: &Value, items: &mut Vec<FeedItem>) {
        match node {
            Value::Array(children) => {
                for child in children {
                    self.walk(child, items);
                }
            }
            Value::Object(object) => {
                if is_article(object)
                    && let Some(item) = self.item_from(object)
                {
                    items.push(item);
                }
                for child in object.values() {
                    self.walk(child, items);
                }
            }
            Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {}
        }
    }

    fn item_from(&self, object: &Map<String, Value>) -> Option<FeedItem> {
        let link = normalize_link(node_url(object).unwrap_or_default(), self.base_url)?;
        if !self.filter.should_keep_link(&link) {
            return None;
        }

        let title = first_string(object, &["headline", "name"])
            .and_then(clean_text)
            .unwrap_or_else(|| title_from_slug(&link));
        let summary = first_string(object, &["description"]).and_then(clean_text);
        let published = first_string(object, &["datePublished", "dateCreated", "dateModified"]).and_then(parse_date);

        Some(FeedItem { title, link, summary, published })
    }
}

/// Whether the node's `@type` (a string or list) names an article type.
fn is_article(object: &Map<String, Value>) -> bool {
    match object.get("@type") {
        Some(Value::String(kind)) => ARTICLE_TYPES.contains(&kind.as_str()),
        Some(Value::Array(kinds)) => kinds.iter().any(|kind| match kind {
            Value::String(kind) => ARTICLE_TYPES.contains(&kind.as_str()),
            _ => false,
        }),
        _ => false,
    }
}

/// `url` (string or `{"@id": ...}`), falling back to `mainEntityOfPage`.
fn node_url(object: &Map<String, Value>) -> Option<&str> {
    ["url", "mainEntityOfPage"].iter().find_map(|key| match object.get(*key) {
        Some(Value::String(url)) => Some(url.as_str()),
        Some(Value::Object(inner)) => inner.get("@id").and_then(Value::as_str),
        _ => None,
    })
}

/// The first of `keys` holding a non-empty string.
///
/// Null, `false`, zero, and empty strings, arrays or objects are skipped. Any
/// other non-string value ends the search without a result, the same as a
/// lookup chain that stops at the first truthy value.
fn first_string<'v>(object: &'v Map<String, Value>, keys: &[&str]) -> Option<&'v str> {
    for key in keys {
        match object.get(*key) {
            None | Some(Value::Null) | Some(Value::Bool(false)) => continue,
            Some(Value::Number(n)) if n.as_f64() == Some(0.0) => continue,
            Some(Value::String(s)) if s.is_empty() => continue,
            Some(Value::Array(a)) if a.is_empty() => continue,
            Some(Value::Object(o)) if o.is_empty() => continue,
            Some(Value::String(s)) => return Some(s.as_str()),
            Some(_) => return None,
        }
    }
    None
}
