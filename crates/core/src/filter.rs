//! Allow/deny URL rules and self-link exclusion.

use regex::Regex;
use url::Url;

use crate::normalize::same_url;
use crate::source::SourceConfig;
use crate::{PagefeedError, Result};

/// Compiled link rules for one source.
///
/// Patterns are searched (not fully matched) against both the absolute link
/// and its path with query, so `^/blog/` and `example\.com/blog/` both work.
#[derive(Debug, Clone)]
pub struct LinkFilter {
    listing_url: String,
    include: Vec<Regex>,
    exclude: Vec<Regex>,
}

impl LinkFilter {
    /// Compiles the include/exclude patterns of `source`.
    ///
    /// # Errors
    ///
    /// Returns [`PagefeedError::InvalidPattern`] for the first pattern that is
    /// not a valid regex.
    pub fn new(source: &SourceConfig) -> Result<Self> {
        Ok(Self {
            listing_url: source.url.clone(),
            include: compile(&source.id, &source.include_url_patterns)?,
            exclude: compile(&source.id, &source.exclude_url_patterns)?,
        })
    }

    /// Whether `link` should become a feed item.
    ///
    /// The listing page itself is always rejected. An empty include list
    /// matches everything; an empty exclude list rejects nothing.
    pub fn should_keep_link(&self, link: &str) -> bool {
        if same_url(link, &self.listing_url) {
            return false;
        }

        let path = path_and_query(link);
        let matches = |re: &Regex| re.is_match(link) || path.as_deref().is_some_and(|p| re.is_match(p));

        if !self.include.is_empty() && !self.include.iter().any(&matches) {
            return false;
        }
        !self.exclude.iter().any(&matches)
    }
}

fn compile(source_id: &str, patterns: &[String]) -> Result<Vec<Regex>> {
    patterns
        .iter()
        .map(|pattern| {
            Regex::new(pattern).map_err(|e| PagefeedError::InvalidPattern {
                source_id: source_id.to_string(),
                pattern: pattern.clone(),
                message: e.to_string(),
            })
        })
        .collect()
}

fn path_and_query(link: &str) -> Option<String> {
    let url = Url::parse(link).ok()?;
    Some(match url.query() {
        Some(query) => format!("{}?{}", url.path(), query),
        None => url.path().to_string(),
    })
}
