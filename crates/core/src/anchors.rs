//! Candidate extraction from hyperlink structure.
//!
//! Each `a[href]` (optionally limited to configured scope containers) becomes
//! a candidate when its link survives normalization and filtering. Titles,
//! summaries and dates are read from the anchor and its nearby markup.

use chrono::{DateTime, Utc};

use crate::filter::LinkFilter;
use crate::item::FeedItem;
use crate::normalize::{clean_text, normalize_link, parse_date, title_from_slug};
use crate::observe::Observer;
use crate::parse::{ANCHOR_SELECTOR, Document, Element};
use crate::source::SourceConfig;
use crate::Result;

/// Anchor texts shorter than this are treated as icons or labels.
pub const MIN_TITLE_CHARS: usize = 8;

/// How many ancestors above the anchor are searched for a `<time>`.
pub const DATE_SEARCH_DEPTH: usize = 3;

/// Collects the anchors to consider, honoring scope selectors.
///
/// With selectors, anchors come from each matching container in selector
/// order. Zero anchors under configured scopes is reported as a warning.
///
/// # Errors
///
/// Returns [`crate::PagefeedError::HtmlParseError`] for an invalid selector.
pub fn select_link_anchors<'d>(
    doc: &'d Document, source: &SourceConfig, observer: &mut dyn Observer,
) -> Result<Vec<Element<'d>>> {
    if source.link_scope_selectors.is_empty() {
        return doc.select(ANCHOR_SELECTOR);
    }

    let mut anchors = Vec::new();
    for selector in &source.link_scope_selectors {
        for container in doc.select(selector)? {
            anchors.extend(container.select(ANCHOR_SELECTOR)?);
        }
    }

    if anchors.is_empty() {
        observer.warn(&format!(
            "No anchors found in configured link scopes selectors={:?}",
            source.link_scope_selectors
        ));
    }

    Ok(anchors)
}

/// Extracts article candidates from anchors, in discovery order.
pub fn extract_anchor_items(
    doc: &Document, source: &SourceConfig, filter: &LinkFilter, observer: &mut dyn Observer,
) -> Result<Vec<FeedItem>> {
    let anchors = select_link_anchors(doc, source, observer)?;

    Ok(anchors
        .iter()
        .filter_map(|anchor| item_from_anchor(anchor, &source.url, filter))
        .collect())
}

fn item_from_anchor(anchor: &Element<'_>, base_url: &str, filter: &LinkFilter) -> Option<FeedItem> {
    let link = normalize_link(anchor.attr("href").unwrap_or_default(), base_url)?;
    if !filter.should_keep_link(&link) {
        return None;
    }

    let title = clean_text(&anchor.spaced_text())
        .filter(|text| text.chars().count() >= MIN_TITLE_CHARS)
        .unwrap_or_else(|| title_from_slug(&link));

    let summary = anchor
        .parent()
        .and_then(|parent| clean_text(&parent.spaced_text()))
        .filter(|text| *text != title);

    let published = nearby_date(anchor);

    Some(FeedItem { title, link, summary, published })
}

/// First parseable `<time>` under the anchor or its nearest ancestors.
///
/// The `datetime` attribute wins over visible text when it is non-empty.
fn nearby_date(anchor: &Element<'_>) -> Option<DateTime<Utc>> {
    std::iter::once(*anchor)
        .chain(anchor.ancestors().take(DATE_SEARCH_DEPTH))
        .filter_map(|scope| scope.select_first("time").ok().flatten())
        .find_map(|time| match time.attr("datetime").filter(|value| !value.is_empty()) {
            Some(value) => parse_date(value),
            None => parse_date(&time.spaced_text()),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observe::Observations;
    use crate::PagefeedError;

    fn source() -> SourceConfig {
        SourceConfig::new("blog", "https://example.com/blog/").unwrap()
    }

    fn extract(html: &str, source: &SourceConfig) -> (Vec<FeedItem>, Observations) {
        let doc = Document::parse(html).unwrap();
        let filter = LinkFilter::new(source).unwrap();
        let mut observations = Observations::new();
        let items = extract_anchor_items(&doc, source, &filter, &mut observations).unwrap();
        (items, observations)
    }

    #[test]
    fn test_title_summary_and_date() {
        let html = r#"
            <ul>
              <li>
                <div class="card">
                  <a href="/posts/rust-ownership">Understanding   ownership</a>
                  <span>in five minutes</span>
                </div>
                <time datetime="2024-02-10T08:00:00+01:00">Feb 10</time>
              </li>
            </ul>
        "#;
        let (items, _) = extract(html, &source());

        assert_eq!(items.len(), 1);
        let item = &items[0];
        assert_eq!(item.title, "Understanding ownership");
        assert_eq!(item.link, "https://example.com/posts/rust-ownership");
        assert_eq!(item.summary.as_deref(), Some("Understanding ownership in five minutes"));
        assert_eq!(item.published.unwrap().to_rfc3339(), "2024-02-10T07:00:00+00:00");
    }

    #[test]
    fn test_short_text_uses_slug_title() {
        let html = r#"<p><a href="/posts/deep-dive_part-2">More</a></p>"#;
        let (items, _) = extract(html, &source());

        assert_eq!(items[0].title, "Deep Dive Part 2");
        assert_eq!(items[0].summary.as_deref(), Some("More"));
    }

    #[test]
    fn test_summary_dropped_when_equal_to_title() {
        let html = r#"<h2><a href="/posts/a">A long enough title</a></h2>"#;
        let (items, _) = extract(html, &source());
        assert_eq!(items[0].summary, None);
    }

    #[test]
    fn test_time_text_used_without_datetime_attribute() {
        let html = r#"<article><h3><a href="/posts/a">A long enough title</a></h3><time>January 5, 2024</time></article>"#;
        let (items, _) = extract(html, &source());
        assert_eq!(items[0].published.unwrap().to_rfc3339(), "2024-01-05T00:00:00+00:00");
    }

    #[test]
    fn test_empty_datetime_attribute_falls_back_to_text() {
        let html = r#"<article><a href="/posts/a">A long enough title</a><time datetime="">2024-04-02</time></article>"#;
        let (items, _) = extract(html, &source());
        assert_eq!(items[0].published.unwrap().to_rfc3339(), "2024-04-02T00:00:00+00:00");
    }

    #[test]
    fn test_yearless_time_text_ranks_newest_first() {
        let html = r#"
            <ul>
              <li><a href="/posts/older">The older of the two</a><time>Jan 5</time></li>
              <li><a href="/posts/newer">The newer of the two</a><time>March 10</time></li>
            </ul>
        "#;
        let (items, _) = extract(html, &source());
        let ranked = crate::merge::dedupe_and_rank(items, 10);

        assert!(ranked.iter().all(|item| item.published.is_some()));
        assert_eq!(ranked[0].link, "https://example.com/posts/newer");
    }

    #[test]
    fn test_date_search_limited_to_three_ancestors() {
        let html = r#"
            <section><time datetime="2024-01-01">x</time>
              <div><div><div><div><a href="/posts/deep">A long enough title</a></div></div></div></div>
            </section>
        "#;
        let (items, _) = extract(html, &source());
        assert_eq!(items[0].published, None);
    }

    #[test]
    fn test_unparseable_time_falls_through_to_next_scope() {
        let html = r#"
            <div><time datetime="2024-03-03">March</time>
              <p><a href="/posts/a">A long enough title <time datetime="garbage">?</time></a></p>
            </div>
        "#;
        let (items, _) = extract(html, &source());
        assert_eq!(items[0].published.unwrap().to_rfc3339(), "2024-03-03T00:00:00+00:00");
    }

    #[test]
    fn test_unusable_hrefs_skipped() {
        let html = r##"
            <a href="#top">Back to top link</a>
            <a href="mailto:me@example.com">Email me please</a>
            <a href="javascript:void(0)">Do something</a>
            <a href="">Empty href here</a>
            <a href="https://example.com/blog/">The listing itself</a>
            <a href="/posts/kept">This one is kept</a>
        "##;
        let (items, _) = extract(html, &source());

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].link, "https://example.com/posts/kept");
    }

    #[test]
    fn test_scope_selectors_restrict_anchors() {
        let html = r#"
            <nav><a href="/about">About this site</a></nav>
            <main class="posts"><a href="/posts/one">First post title</a></main>
            <aside class="posts"><a href="/posts/two">Second post title</a></aside>
        "#;
        let source = SourceConfig { link_scope_selectors: vec![".posts".to_string()], ..source() };
        let (items, observations) = extract(html, &source);

        let links: Vec<&str> = items.iter().map(|i| i.link.as_str()).collect();
        assert_eq!(links, vec!["https://example.com/posts/one", "https://example.com/posts/two"]);
        assert!(observations.warnings().is_empty());
    }

    #[test]
    fn test_empty_scope_warns() {
        let html = r#"<main><a href="/posts/one">First post title</a></main>"#;
        let source = SourceConfig { link_scope_selectors: vec!["#missing".to_string()], ..source() };
        let (items, observations) = extract(html, &source);

        assert!(items.is_empty());
        assert_eq!(observations.warnings().len(), 1);
        assert!(observations.warnings()[0].contains("#missing"));
    }

    #[test]
    fn test_invalid_scope_selector_is_error() {
        let doc = Document::parse("<a href='/x'>x</a>").unwrap();
        let source = SourceConfig { link_scope_selectors: vec!["[[bad".to_string()], ..source() };
        let filter = LinkFilter::new(&source).unwrap();
        let result = extract_anchor_items(&doc, &source, &filter, &mut Observations::new());

        assert!(matches!(result, Err(PagefeedError::HtmlParseError(_))));
    }
}
