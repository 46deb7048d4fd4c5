//! RSS 2.0 rendering.

use std::io::Write;

use chrono::{DateTime, Utc};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::item::FeedItem;
use crate::source::SourceConfig;
use crate::{PagefeedError, Result};

/// RFC 822 style date used by `pubDate` and `lastBuildDate`.
const RSS_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S %z";

/// Channel-level fields of a feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    pub title: String,
    pub link: String,
    pub description: String,
}

impl From<&SourceConfig> for Channel {
    fn from(source: &SourceConfig) -> Self {
        Self {
            title: source.feed_title.clone(),
            link: source.site_url.clone(),
            description: source.feed_description.clone(),
        }
    }
}

/// Formats a timestamp the way RSS readers expect.
///
/// ```rust
/// use chrono::{TimeZone, Utc};
/// use pagefeed_core::formatters::rss::format_rss_date;
///
/// let when = Utc.with_ymd_and_hms(2024, 1, 5, 10, 0, 0).unwrap();
/// assert_eq!(format_rss_date(&when), "Fri, 05 Jan 2024 10:00:00 +0000");
/// ```
pub fn format_rss_date(value: &DateTime<Utc>) -> String {
    value.format(RSS_DATE_FORMAT).to_string()
}

/// The newest publish date among `items`.
pub fn newest_timestamp(items: &[FeedItem]) -> Option<DateTime<Utc>> {
    items.iter().filter_map(|item| item.published).max()
}

/// Renders a complete RSS 2.0 document, XML declaration included.
///
/// `lastBuildDate` is the newest item date and is omitted when no item is
/// dated. Every item carries a permalink `guid` equal to its link.
pub fn render_rss(channel: &Channel, items: &[FeedItem]) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    write_event(&mut writer, Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;

    let mut rss = BytesStart::new("rss");
    rss.push_attribute(("version", "2.0"));
    write_event(&mut writer, Event::Start(rss))?;
    write_event(&mut writer, Event::Start(BytesStart::new("channel")))?;

    write_text_element(&mut writer, "title", &channel.title)?;
    write_text_element(&mut writer, "link", &channel.link)?;
    write_text_element(&mut writer, "description", &channel.description)?;
    if let Some(latest) = newest_timestamp(items) {
        write_text_element(&mut writer, "lastBuildDate", &format_rss_date(&latest))?;
    }

    for item in items {
        write_event(&mut writer, Event::Start(BytesStart::new("item")))?;
        write_text_element(&mut writer, "title", &item.title)?;
        write_text_element(&mut writer, "link", &item.link)?;

        let mut guid = BytesStart::new("guid");
        guid.push_attribute(("isPermaLink", "true"));
        write_event(&mut writer, Event::Start(guid))?;
        write_event(&mut writer, Event::Text(BytesText::new(&item.link)))?;
        write_event(&mut writer, Event::End(BytesEnd::new("guid")))?;

        if let Some(summary) = &item.summary {
            write_text_element(&mut writer, "description", summary)?;
        }
        if let Some(published) = &item.published {
            write_text_element(&mut writer, "pubDate", &format_rss_date(published))?;
        }
        write_event(&mut writer, Event::End(BytesEnd::new("item")))?;
    }

    write_event(&mut writer, Event::End(BytesEnd::new("channel")))?;
    write_event(&mut writer, Event::End(BytesEnd::new("rss")))?;

    let mut xml = String::from_utf8(writer.into_inner()).map_err(|e| PagefeedError::SerializeError(e.to_string()))?;
    xml.push('\n');
    Ok(xml)
}

fn write_text_element<W: Write>(writer: &mut Writer<W>, name: &str, text: &str) -> Result<()> {
    write_event(writer, Event::Start(BytesStart::new(name)))?;
    write_event(writer, Event::Text(BytesText::new(text)))?;
    write_event(writer, Event::End(BytesEnd::new(name)))
}

fn write_event<W: Write>(writer: &mut Writer<W>, event: Event<'_>) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|e| PagefeedError::SerializeError(e.to_string()))
}
