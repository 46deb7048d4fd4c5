//! Link and text normalization.
//!
//! Everything in here is a pure function: no state, no I/O, and no errors.
//! Inputs that cannot be normalized produce `None`.

use std::sync::LazyLock;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use regex::Regex;
use url::Url;

static SLUG_SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-_]+").expect("SLUG_SEPARATORS should compile"));

/// Naive date-time layouts tried before falling back to `dateparser`.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Date-only layouts. Midnight UTC is assumed for all of them.
const NAIVE_DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%B %d, %Y", // January 05, 2024
    "%b %d, %Y", // Jan 05, 2024
    "%d %B %Y",  // 05 January 2024
    "%d %b %Y",  // 05 Jan 2024
    "%B %e, %Y", // January 5, 2024
    "%b %e, %Y", // Jan 5, 2024
    "%e %B %Y",  // 5 January 2024
    "%e %b %Y",  // 5 Jan 2024
    "%m/%d/%Y",  // 12/31/2024
    "%d/%m/%Y",  // 31/12/2024 when the first field cannot be a month
];

/// Month and day without a year. The current UTC year is assumed.
const YEARLESS_DATE_FORMATS: &[&str] = &[
    "%b %d %Y", // Jan 5
    "%B %d %Y", // March 10
    "%d %b %Y", // 5 Jan
    "%d %B %Y", // 10 March
];

/// Resolves `href` against `base` into an absolute http(s) URL.
///
/// Returns `None` for empty input, fragment-only links, `mailto:` and
/// `javascript:` links, anything that resolves to a non-http(s) scheme, and
/// URLs without a host.
///
/// # Example
///
/// ```rust
/// use pagefeed_core::normalize::normalize_link;
///
/// let link = normalize_link("/posts/intro", "https://example.com/blog/");
/// assert_eq!(link.as_deref(), Some("https://example.com/posts/intro"));
/// assert_eq!(normalize_link("#top", "https://example.com/"), None);
/// ```
pub fn normalize_link(href: &str, base: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') || href.starts_with("mailto:") || href.starts_with("javascript:") {
        return None;
    }

    let base = Url::parse(base).ok()?;
    let resolved = base.join(href).ok()?;

    if !matches!(resolved.scheme(), "http" | "https") {
        return None;
    }
    if resolved.host_str().is_none_or(str::is_empty) {
        return None;
    }

    Some(resolved.to_string())
}

/// Compares two URLs by scheme, host and path only.
///
/// Trailing slashes are ignored and an empty path counts as `/`. Query
/// strings and fragments never affect the result.
pub fn same_url(a: &str, b: &str) -> bool {
    match (identity_key(a), identity_key(b)) {
        (Some(a), Some(b)) => a == b,
        _ => a == b,
    }
}

fn identity_key(raw: &str) -> Option<String> {
    let url = Url::parse(raw).ok()?;
    let host = url.host_str().unwrap_or_default();
    let port = url.port().map(|p| format!(":{p}")).unwrap_or_default();
    let path = url.path().trim_end_matches('/');
    let path = if path.is_empty() { "/" } else { path };

    Some(format!("{}://{}{}{}", url.scheme(), host, port, path))
}

/// Collapses whitespace runs into single spaces and trims.
///
/// Returns `None` when nothing is left.
pub fn clean_text(value: &str) -> Option<String> {
    let cleaned = value.split_whitespace().collect::<Vec<_>>().join(" ");
    if cleaned.is_empty() { None } else { Some(cleaned) }
}

/// Derives a placeholder title from the last path segment of `link`.
///
/// `-` and `_` runs become spaces and every word is title-cased. Falls back
/// to the raw link when the segment is empty.
///
/// ```rust
/// use pagefeed_core::normalize::title_from_slug;
///
/// assert_eq!(title_from_slug("https://example.com/blog/hello-big_world/"), "Hello Big World");
/// assert_eq!(title_from_slug("https://example.com/"), "https://example.com/");
/// ```
pub fn title_from_slug(link: &str) -> String {
    let segment = match Url::parse(link) {
        Ok(url) => url.path().trim_end_matches('/').rsplit('/').next().unwrap_or_default().to_string(),
        Err(_) => return link.to_string(),
    };

    let spaced = SLUG_SEPARATORS.replace_all(&segment, " ");
    let titled = title_case(spaced.trim());

    if titled.is_empty() { link.to_string() } else { titled }
}

/// Uppercases the first letter of every alphabetic run and lowercases the rest.
fn title_case(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut in_word = false;

    for ch in value.chars() {
        if ch.is_alphabetic() {
            if in_word {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(ch);
            in_word = false;
        }
    }

    out
}

/// Parses a free-text date into UTC.
///
/// RFC 3339 and RFC 2822 are tried first, then a handful of naive layouts,
/// then month-day text in the current year, then `dateparser` for looser
/// natural formats. Bare digit strings are never read as timestamps. Values without an explicit
/// offset are taken as UTC. Unparseable input yields `None`.
///
/// ```rust
/// use pagefeed_core::normalize::parse_date;
///
/// let parsed = parse_date("2024-01-05T12:00:00+02:00").unwrap();
/// assert_eq!(parsed.to_rfc3339(), "2024-01-05T10:00:00+00:00");
/// ```
pub fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(to_utc(dt));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(value) {
        return Some(to_utc(dt));
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    let midnight = NaiveTime::from_hms_opt(0, 0, 0)?;
    for format in NAIVE_DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Some(Utc.from_utc_datetime(&date.and_time(midnight)));
        }
    }

    let this_year = format!("{value} {}", Utc::now().year());
    for format in YEARLESS_DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(&this_year, format) {
            return Some(Utc.from_utc_datetime(&date.and_time(midnight)));
        }
    }

    // dateparser reads bare digit runs as unix timestamps
    if value.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    dateparser::parse_with(value, &Utc, midnight).ok()
}

/// Converts an already-structured timestamp to UTC.
pub fn to_utc<Tz: TimeZone>(value: DateTime<Tz>) -> DateTime<Utc> {
    value.with_timezone(&Utc)
}
