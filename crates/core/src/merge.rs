//! Deduplication, ranking and truncation of candidates.

use std::cmp::Reverse;
use std::collections::HashMap;

use crate::item::FeedItem;
use crate::normalize::title_from_slug;

/// A merged record and the position of its link's first occurrence.
#[derive(Debug, Clone)]
struct Slot {
    item: FeedItem,
    first_seen: usize,
}

/// Merges candidates that share a link, ranks them and keeps `max_items`.
///
/// Candidates must already be normalized; links are compared as exact
/// strings. The first occurrence of a link fixes the record. Later
/// occurrences only fill gaps:
///
/// - an empty summary or publish date is filled in;
/// - a placeholder title (the one [`title_from_slug`] derives from the link)
///   is replaced by a non-empty title.
///
/// Dated items come first, newest first. Undated items follow in discovery
/// order. Remaining ties keep discovery order.
pub fn dedupe_and_rank(candidates: Vec<FeedItem>, max_items: usize) -> Vec<FeedItem> {
    let mut slots: Vec<Slot> = Vec::new();
    let mut by_link: HashMap<String, usize> = HashMap::new();

    for (index, candidate) in candidates.into_iter().enumerate() {
        match by_link.get(&candidate.link) {
            Some(&slot) => merge_into(&mut slots[slot].item, candidate),
            None => {
                by_link.insert(candidate.link.clone(), slots.len());
                slots.push(Slot { item: candidate, first_seen: index });
            }
        }
    }

    slots.sort_by_key(|slot| (slot.item.published.is_none(), Reverse(slot.item.published), slot.first_seen));

    slots.into_iter().take(max_items).map(|slot| slot.item).collect()
}

fn merge_into(existing: &mut FeedItem, incoming: FeedItem) {
    if existing.summary.is_none() && incoming.summary.is_some() {
        existing.summary = incoming.summary;
    }
    if existing.published.is_none() && incoming.published.is_some() {
        existing.published = incoming.published;
    }
    if !incoming.title.is_empty() && existing.title == title_from_slug(&existing.link) {
        existing.title = incoming.title;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, d, 12, 0, 0).unwrap()
    }

    fn item(path: &str) -> FeedItem {
        let link = format!("https://example.com/posts/{path}");
        FeedItem::new(title_from_slug(&link), link)
    }

    fn links(items: &[FeedItem]) -> Vec<String> {
        items.iter().map(|i| i.link.rsplit('/').next().unwrap().to_string()).collect()
    }

    #[test]
    fn test_dated_first_newest_first_then_discovery_order() {
        let candidates = vec![
            item("undated-a"),
            item("old").with_published(day(1)),
            item("undated-b"),
            item("new").with_published(day(9)),
            item("mid").with_published(day(5)),
        ];
        let ranked = dedupe_and_rank(candidates, 10);

        assert_eq!(links(&ranked), vec!["new", "mid", "old", "undated-a", "undated-b"]);
    }

    #[test]
    fn test_equal_timestamps_keep_discovery_order() {
        let candidates = vec![
            item("b").with_published(day(3)),
            item("a").with_published(day(3)),
            item("c").with_published(day(3)),
        ];
        assert_eq!(links(&dedupe_and_rank(candidates, 10)), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_duplicates_fill_gaps_without_overwriting() {
        let candidates = vec![
            FeedItem::new("Structured title", "https://example.com/posts/x").with_published(day(2)),
            FeedItem::new("Read: Structured", "https://example.com/posts/x")
                .with_summary("From the anchor")
                .with_published(day(8)),
        ];
        let ranked = dedupe_and_rank(candidates, 10);

        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].title, "Structured title");
        assert_eq!(ranked[0].summary.as_deref(), Some("From the anchor"));
        assert_eq!(ranked[0].published, Some(day(2)));
    }

    #[test]
    fn test_placeholder_title_upgraded() {
        let candidates = vec![item("hello-world"), FeedItem::new("Hello, World!", "https://example.com/posts/hello-world")];
        let ranked = dedupe_and_rank(candidates, 10);
        assert_eq!(ranked[0].title, "Hello, World!");
    }

    #[test]
    fn test_duplicate_position_is_first_seen() {
        let candidates = vec![item("a"), item("b"), item("a").with_published(day(1))];
        let ranked = dedupe_and_rank(candidates, 10);

        assert_eq!(links(&ranked), vec!["a", "b"]);
        assert_eq!(ranked[0].published, Some(day(1)));
    }

    #[test]
    fn test_merge_is_idempotent() {
        let candidates = vec![
            item("a").with_published(day(4)),
            item("b"),
            FeedItem::new("Real C title", "https://example.com/posts/c").with_summary("c"),
            item("d").with_published(day(7)),
        ];
        let once = dedupe_and_rank(candidates.clone(), 10);
        let doubled: Vec<FeedItem> = candidates.iter().chain(candidates.iter()).cloned().collect();
        let twice = dedupe_and_rank(doubled, 10);

        assert_eq!(once, twice);
    }

    #[test]
    fn test_truncation_is_prefix_of_full_sort() {
        let candidates: Vec<FeedItem> = (1..=9)
            .map(|n| {
                let base = item(&format!("p{n}"));
                if n % 2 == 0 { base.with_published(day(n)) } else { base }
            })
            .collect();
        let full = dedupe_and_rank(candidates.clone(), usize::MAX);

        for max in 0..=10 {
            let truncated = dedupe_and_rank(candidates.clone(), max);
            assert!(truncated.len() <= max);
            assert_eq!(truncated[..], full[..truncated.len()]);
        }
    }

    #[test]
    fn test_dated_never_after_undated() {
        let candidates = vec![item("u1"), item("d1").with_published(day(2)), item("u2"), item("d2").with_published(day(6))];
        let ranked = dedupe_and_rank(candidates, 10);

        let first_undated = ranked.iter().position(|i| i.published.is_none()).unwrap();
        assert!(ranked[first_undated..].iter().all(|i| i.published.is_none()));
        assert!(ranked[..first_undated].windows(2).all(|w| w[0].published >= w[1].published));
    }
}
