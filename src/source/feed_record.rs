//! The post summary handed back to the presentation layer.
//!
//! A `FeedRecord` can only be built through [`FeedRecord::new`], which
//! refuses entries without a title or link, so every record that leaves this
//! crate is renderable as a link.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;
use std::cmp::Ordering;

/// One blog post summary, normalised from a feed `<item>`.
///
/// ## Sorting
///
/// `FeedRecord` implements [`Ord`] for **reverse-chronological** ordering:
/// newer posts sort before older ones, and posts whose timestamp could not be
/// parsed sort last.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedRecord {
    title: String,
    link: String,
    /// Timestamp text exactly as found in the feed (may be empty).
    published_at: String,
    #[serde(skip)]
    published: Option<DateTime<Utc>>,
}

impl FeedRecord {
    /// Returns `None` when `title` or `link` is empty.
    pub fn new(
        title: impl Into<String>,
        link: impl Into<String>,
        published_at: impl Into<String>,
    ) -> Option<Self> {
        let title = title.into();
        let link = link.into();
        if title.is_empty() || link.is_empty() {
            return None;
        }

        let published_at = published_at.into();
        let published = parse_timestamp(&published_at);
        Some(Self {
            title,
            link,
            published_at,
            published,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn link(&self) -> &str {
        &self.link
    }

    pub fn published_at(&self) -> &str {
        &self.published_at
    }

    /// Parsed form of [`published_at`](Self::published_at), if it parsed.
    pub fn published(&self) -> Option<DateTime<Utc>> {
        self.published
    }
}

/// RSS uses RFC 2822; some mirrors rewrite dates as RFC 3339 or plain
/// ISO dates. A weekday that disagrees with the date is ignored.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let parsed = DateTime::parse_from_rfc2822(raw)
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .ok()
        .or_else(|| DateTime::parse_from_rfc2822(strip_weekday(raw)?).ok());
    if let Some(dt) = parsed {
        return Some(dt.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()?
                .and_hms_opt(0, 0, 0)
        })
        .map(|naive| naive.and_utc())
}

/// `"Tue, 01 Jan 2020 ..."` -> `"01 Jan 2020 ..."`.
fn strip_weekday(raw: &str) -> Option<&str> {
    let (day, rest) = raw.split_once(',')?;
    let day = day.trim();
    (day.len() == 3 && day.chars().all(|c| c.is_ascii_alphabetic())).then(|| rest.trim_start())
}

// ---------------------------------------------------------------------------
// Ordering — reverse chronological (newest first)
// ---------------------------------------------------------------------------

impl Ord for FeedRecord {
    fn cmp(&self, other: &Self) -> Ordering {
        // `None` is less than `Some(_)`, so undated records sink to the bottom.
        other.published.cmp(&self.published)
    }
}

impl PartialOrd for FeedRecord {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
