//! The feed item record shared by every stage of the pipeline.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A single article entry, either a candidate from an extractor or a final
/// ranked record.
///
/// `link` is always an absolute http(s) URL produced by
/// [`crate::normalize::normalize_link`] and acts as the identity key during
/// merging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedItem {
    /// Display title. Never empty.
    pub title: String,
    /// Canonical absolute link.
    pub link: String,
    /// Optional descriptive text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Publish timestamp, always UTC.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published: Option<DateTime<Utc>>,
}

impl FeedItem {
    /// Creates an item with only a title and link.
    pub fn new(title: impl Into<String>, link: impl Into<String>) -> Self {
        Self { title: title.into(), link: link.into(), summary: None, published: None }
    }

    /// Sets the summary.
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    /// Sets the publish timestamp.
    pub fn with_published(mut self, published: DateTime<Utc>) -> Self {
        self.published = Some(published);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_item_builders() {
        let when = Utc.with_ymd_and_hms(2024, 1, 5, 10, 0, 0).unwrap();
        let item = FeedItem::new("Intro", "https://example.com/posts/intro")
            .with_summary("First post")
            .with_published(when);

        assert_eq!(item.title, "Intro");
        assert_eq!(item.summary.as_deref(), Some("First post"));
        assert_eq!(item.published, Some(when));
    }

    #[test]
    fn test_item_serialization_skips_empty_fields() {
        let item = FeedItem::new("Intro", "https://example.com/posts/intro");
        let json = serde_json::to_value(&item).unwrap();

        assert_eq!(json["title"], "Intro");
        assert!(json.get("summary").is_none());
        assert!(json.get("published").is_none());
    }
}
