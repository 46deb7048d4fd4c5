//! HTML parsing and DOM navigation.
//!
//! This module provides the [`Document`] and [`Element`] types, thin
//! wrappers over `scraper` that add the operations the extractors need:
//! CSS selection, parent/ancestor walks and whitespace-aware text.
//!
//! # Example
//!
//! ```rust
//! use pagefeed_core::parse::Document;
//!
//! let html = r#"<ul><li><a href="/a">First post</a></li></ul>"#;
//! let doc = Document::parse(html).unwrap();
//! let anchors = doc.select("a[href]").unwrap();
//!
//! assert_eq!(anchors[0].attr("href"), Some("/a"));
//! assert_eq!(anchors[0].parent().unwrap().tag_name(), "li");
//! ```

use scraper::{ElementRef, Html, Selector};

use crate::{PagefeedError, Result};

/// Selector for embedded JSON-LD metadata blocks.
pub const JSON_LD_SELECTOR: &str = r#"script[type="application/ld+json"]"#;

/// Selector for anchors that carry an `href`.
pub const ANCHOR_SELECTOR: &str = "a[href]";

/// A parsed HTML page.
pub struct Document {
    html: Html,
}

impl Document {
    /// Parses HTML from a string.
    ///
    /// html5ever recovers from any malformed markup, so this never fails in
    /// practice; the `Result` keeps the signature stable for callers.
    pub fn parse(html: &str) -> Result<Self> {
        Ok(Self { html: Html::parse_document(html) })
    }

    /// Selects elements using a CSS selector, in document order.
    ///
    /// # Errors
    ///
    /// Returns [`PagefeedError::HtmlParseError`] if the selector is invalid.
    pub fn select(&self, selector: &str) -> Result<Vec<Element<'_>>> {
        let sel = parse_selector(selector)?;
        Ok(self.html.select(&sel).map(Element::from).collect())
    }

    /// Raw text of every JSON-LD script block, in document order.
    pub fn json_ld_blocks(&self) -> Vec<String> {
        match self.select(JSON_LD_SELECTOR) {
            Ok(scripts) => scripts.iter().map(Element::text).collect(),
            Err(_) => Vec::new(),
        }
    }
}

/// A single element in a [`Document`].
#[derive(Clone, Copy, Debug)]
pub struct Element<'a> {
    element: ElementRef<'a>,
}

impl<'a> From<ElementRef<'a>> for Element<'a> {
    fn from(element: ElementRef<'a>) -> Self {
        Self { element }
    }
}

impl<'a> Element<'a> {
    /// Concatenation of all descendant text nodes, unmodified.
    pub fn text(&self) -> String {
        self.element.text().collect()
    }

    /// Descendant text nodes, each trimmed, joined by single spaces.
    ///
    /// Empty nodes are dropped, so `<a> <b>New</b> post </a>` becomes
    /// `"New post"`.
    pub fn spaced_text(&self) -> String {
        self.element
            .text()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Gets the value of an attribute.
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.element.value().attr(name)
    }

    /// Gets the lowercase tag name.
    pub fn tag_name(&self) -> String {
        self.element.value().name().to_lowercase()
    }

    /// The immediate parent element. `None` at the document root.
    pub fn parent(&self) -> Option<Element<'a>> {
        self.element.parent().and_then(ElementRef::wrap).map(Element::from)
    }

    /// Parent, grandparent and so on, nearest first.
    pub fn ancestors(&self) -> impl Iterator<Item = Element<'a>> + use<'a> {
        self.element.ancestors().filter_map(ElementRef::wrap).map(Element::from)
    }

    /// Selects descendant elements using a CSS selector.
    ///
    /// # Errors
    ///
    /// Returns [`PagefeedError::HtmlParseError`] if the selector is invalid.
    pub fn select(&self, selector: &str) -> Result<Vec<Element<'a>>> {
        let sel = parse_selector(selector)?;
        Ok(self.element.select(&sel).map(Element::from).collect())
    }

    /// The first descendant matching `selector`.
    pub fn select_first(&self, selector: &str) -> Result<Option<Element<'a>>> {
        let sel = parse_selector(selector)?;
        Ok(self.element.select(&sel).next().map(Element::from))
    }
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| PagefeedError::HtmlParseError(format!("Invalid selector {selector:?}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_HTML: &str = r#"
        <!DOCTYPE html>
        <html lang="en">
        <head>
            <title>Listing</title>
            <script type="application/ld+json">{"@type": "Blog"}</script>
            <script type="application/json">{"ignored": true}</script>
        </head>
        <body>
            <main>
                <article class="post">
                    <h2><a href="/posts/one">  Post <em>one</em>  </a></h2>
                    <time datetime="2024-01-05">Jan 5</time>
                </article>
            </main>
            <a name="no-href">Anchor without href</a>
        </body>
        </html>
    "#;

    #[test]
    fn test_parse_document() {
        let doc = Document::parse(SAMPLE_HTML).unwrap();
        assert_eq!(doc.select("title").unwrap()[0].text(), "Listing");
    }

    #[test]
    fn test_select_anchors_with_href() {
        let doc = Document::parse(SAMPLE_HTML).unwrap();
        let anchors = doc.select(ANCHOR_SELECTOR).unwrap();

        assert_eq!(anchors.len(), 1);
        assert_eq!(anchors[0].attr("href"), Some("/posts/one"));
    }

    #[test]
    fn test_spaced_text() {
        let doc = Document::parse(SAMPLE_HTML).unwrap();
        let anchor = doc.select("a[href]").unwrap()[0];

        assert_eq!(anchor.spaced_text(), "Post one");
        assert_eq!(anchor.text(), "  Post one  ");
    }

    #[test]
    fn test_parent_and_ancestors() {
        let doc = Document::parse(SAMPLE_HTML).unwrap();
        let anchor = doc.select("a[href]").unwrap()[0];

        assert_eq!(anchor.parent().unwrap().tag_name(), "h2");

        let names: Vec<String> = anchor.ancestors().map(|el| el.tag_name()).collect();
        assert_eq!(names, vec!["h2", "article", "main", "body", "html"]);
    }

    #[test]
    fn test_select_first_within_element() {
        let doc = Document::parse(SAMPLE_HTML).unwrap();
        let article = doc.select("article.post").unwrap()[0];
        let time = article.select_first("time").unwrap().unwrap();

        assert_eq!(time.attr("datetime"), Some("2024-01-05"));
        assert!(article.select_first("table").unwrap().is_none());
    }

    #[test]
    fn test_json_ld_blocks() {
        let doc = Document::parse(SAMPLE_HTML).unwrap();
        assert_eq!(doc.json_ld_blocks(), vec![r#"{"@type": "Blog"}"#.to_string()]);
    }

    #[test]
    fn test_invalid_selector() {
        let doc = Document::parse(SAMPLE_HTML).unwrap();
        let result = doc.select("[[invalid");

        assert!(matches!(result, Err(PagefeedError::HtmlParseError(_))));
    }
}
