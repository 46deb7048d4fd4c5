pub mod anchors;
pub mod error;
pub mod fetch;
pub mod filter;
pub mod formatters;
pub mod item;
pub mod jsonld;
pub mod merge;
pub mod normalize;
pub mod observe;
pub mod parse;
pub mod pipeline;
pub mod source;

pub use anchors::{extract_anchor_items, select_link_anchors};
pub use error::{PagefeedError, Result};
pub use fetch::{FetchConfig, fetch_file};
#[cfg(feature = "fetch")]
pub use fetch::fetch_url;
pub use filter::LinkFilter;
pub use formatters::{Channel, JsonConfig, convert_to_json, format_rss_date, render_rss};
pub use item::FeedItem;
pub use jsonld::extract_json_ld_items;
pub use merge::dedupe_and_rank;
#[doc(hidden)]
pub use normalize::{clean_text, normalize_link, parse_date, same_url, title_from_slug};
pub use observe::{Level, Observations, Observer, TracingObserver};
pub use parse::{Document, Element};
pub use pipeline::{
    Feed, RunSummary, SourceOutcome, build_feed, check_override, extract_candidates, process_source, process_sources,
    write_feed,
};
pub use source::{SourceConfig, load_sources, parse_sources, select_sources};
