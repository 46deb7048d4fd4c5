//! Per-source orchestration.
//!
//! One source is processed end to end (page -> candidates -> ranked items ->
//! RSS document -> optional write) before the next one starts. A failure in
//! one source is recorded in the [`RunSummary`] and never stops the others.

use std::fs;
use std::path::PathBuf;

use crate::anchors::extract_anchor_items;
use crate::filter::LinkFilter;
use crate::formatters::rss::{Channel, render_rss};
use crate::item::FeedItem;
use crate::jsonld::extract_json_ld_items;
use crate::merge::dedupe_and_rank;
use crate::observe::{Observer, TracingObserver};
use crate::parse::Document;
use crate::source::SourceConfig;
use crate::{PagefeedError, Result};

/// A rendered feed for one source.
#[derive(Debug, Clone)]
pub struct Feed {
    pub source_id: String,
    /// Ranked, truncated items in serialization order.
    pub items: Vec<FeedItem>,
    /// The complete RSS document.
    pub xml: String,
    /// Where the document goes when written.
    pub output: PathBuf,
    /// Whether [`write_feed`] has been applied.
    pub written: bool,
}

/// Runs both extractors and returns the candidates in discovery order:
/// JSON-LD candidates first, then anchor candidates.
pub fn extract_candidates(
    doc: &Document, source: &SourceConfig, filter: &LinkFilter, observer: &mut dyn Observer,
) -> Result<Vec<FeedItem>> {
    let mut candidates = extract_json_ld_items(doc, source, filter, observer);
    candidates.extend(extract_anchor_items(doc, source, filter, observer)?);
    Ok(candidates)
}

/// Builds the in-memory feed for `html` without touching the file system.
pub fn build_feed(html: &str, source: &SourceConfig, observer: &mut dyn Observer) -> Result<Feed> {
    let filter = LinkFilter::new(source)?;
    let doc = Document::parse(html)?;

    let candidates = extract_candidates(&doc, source, &filter, observer)?;
    let items = dedupe_and_rank(candidates, source.max_items);

    if items.is_empty() {
        observer.warn("No items extracted");
    }

    let xml = render_rss(&Channel::from(source), &items)?;

    Ok(Feed { source_id: source.id.clone(), items, xml, output: source.output_rss.clone(), written: false })
}

/// Writes the feed document, creating parent directories as needed.
pub fn write_feed(feed: &mut Feed) -> Result<()> {
    if let Some(parent) = feed.output.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    fs::write(&feed.output, &feed.xml)?;
    feed.written = true;
    Ok(())
}

/// Builds the feed and writes it unless `dry_run` is set.
pub fn process_source(html: &str, source: &SourceConfig, dry_run: bool, observer: &mut dyn Observer) -> Result<Feed> {
    let mut feed = build_feed(html, source, observer)?;

    if dry_run {
        tracing::info!(
            source = %source.id,
            items = feed.items.len(),
            rss = %feed.output.display(),
            "Dry run"
        );
        return Ok(feed);
    }

    write_feed(&mut feed)?;
    tracing::info!(
        source = %source.id,
        items = feed.items.len(),
        rss = %feed.output.display(),
        "Wrote feed"
    );
    Ok(feed)
}

/// Result of processing one source.
#[derive(Debug)]
pub struct SourceOutcome {
    pub source_id: String,
    pub result: Result<Feed>,
}

/// Per-source results of a whole run.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub outcomes: Vec<SourceOutcome>,
}

impl RunSummary {
    /// Number of sources that failed.
    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_err()).count()
    }

    /// Number of sources that succeeded.
    pub fn succeeded(&self) -> usize {
        self.outcomes.len() - self.failed()
    }

    /// True only when every source succeeded.
    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }
}

/// Processes every source in order, isolating failures per source.
///
/// `load_page` supplies the HTML for a source (a live fetch or a local
/// override). Its errors count as failures of that source only.
pub fn process_sources<F>(sources: &[SourceConfig], mut load_page: F, dry_run: bool) -> RunSummary
where
    F: FnMut(&SourceConfig) -> Result<String>,
{
    let mut summary = RunSummary::default();

    for source in sources {
        tracing::info!(source = %source.id, url = %source.url, "Processing source");

        let mut observer = TracingObserver::new(&source.id);
        let result = load_page(source).and_then(|html| process_source(&html, source, dry_run, &mut observer));

        if let Err(e) = &result {
            tracing::error!(source = %source.id, error = %e, "Source failed");
        }
        summary.outcomes.push(SourceOutcome { source_id: source.id.clone(), result });
    }

    summary
}

/// Rejects a local HTML override when more than one source is selected.
pub fn check_override(sources: &[SourceConfig], html_override: Option<&std::path::Path>) -> Result<()> {
    match html_override {
        Some(path) if !path.exists() => Err(PagefeedError::FileNotFound(path.to_path_buf())),
        Some(_) if sources.len() > 1 => Err(PagefeedError::ConfigError(
            "--html-file can only be used when processing one source".to_string(),
        )),
        _ => Ok(()),
    }
}
