//! Best-effort feed extraction.
//!
//! Mirrors sometimes reformat or truncate the upstream document, so this
//! module does not parse XML. It scans for `<item>` segments with regular
//! expressions and pulls the first `<title>`, `<link>` and `<pubDate>` out of
//! each one. Nothing here can fail: garbage in yields an empty `Vec`.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use super::FeedRecord;

static ITEM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<item(?:\s[^>]*)?>(.*?)</item\s*>").unwrap());
static TITLE_RE: Lazy<Regex> = Lazy::new(|| tag_regex("title"));
static LINK_RE: Lazy<Regex> = Lazy::new(|| tag_regex("link"));
static PUB_DATE_RE: Lazy<Regex> = Lazy::new(|| tag_regex("pubDate"));
static CDATA_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<!\[CDATA\[(.*?)\]\]>").unwrap());
static ENTITY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)&(#\d+|#x[0-9a-f]+|[a-z]+);").unwrap());

fn tag_regex(tag: &str) -> Regex {
    Regex::new(&format!(r"(?is)<{tag}(?:\s[^>]*)?>(.*?)</{tag}\s*>")).unwrap()
}

/// Extract at most `max_records` posts from `raw`, newest first.
///
/// Only the first `2 * max_records` `<item>` segments are examined, whether
/// or not they turn out to be valid.
pub fn normalize(raw: &str, max_records: usize) -> Vec<FeedRecord> {
    let scan_limit = max_records.saturating_mul(2);

    let mut records: Vec<FeedRecord> = ITEM_RE
        .captures_iter(raw)
        .take(scan_limit)
        .filter_map(|item| {
            let segment = item.get(1)?.as_str();
            FeedRecord::new(
                extract_tag(segment, &TITLE_RE),
                extract_tag(segment, &LINK_RE),
                extract_tag(segment, &PUB_DATE_RE),
            )
        })
        .collect();

    // Stable: equal timestamps keep document order.
    records.sort();
    records.truncate(max_records);
    records
}

/// Inner text of the first match of `tag_re`, cleaned up. Empty if absent.
fn extract_tag(segment: &str, tag_re: &Regex) -> String {
    tag_re
        .captures(segment)
        .and_then(|caps| caps.get(1))
        .map(|inner| clean_text(inner.as_str()))
        .unwrap_or_default()
}

/// CDATA unwrap, then entity decode, then trim. The order matters: entities
/// inside a CDATA section are still decoded.
fn clean_text(raw: &str) -> String {
    let unwrapped = strip_cdata(raw);
    decode_entities(&unwrapped).trim().to_string()
}

fn strip_cdata(raw: &str) -> String {
    CDATA_RE.replace_all(raw, "$1").into_owned()
}

/// Decode the five XML named entities plus decimal and hex character
/// references. Anything unrecognised is left exactly as written.
pub fn decode_entities(raw: &str) -> String {
    ENTITY_RE
        .replace_all(raw, |caps: &Captures| {
            let whole = &caps[0];
            decode_entity(&caps[1]).map_or_else(|| whole.to_string(), String::from)
        })
        .into_owned()
}

fn decode_entity(entity: &str) -> Option<char> {
    if let Some(numeric) = entity.strip_prefix('#') {
        let code = match numeric.strip_prefix(|c: char| c == 'x' || c == 'X') {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => numeric.parse::<u32>().ok()?,
        };
        // Control characters other than whitespace count as malformed.
        return char::from_u32(code)
            .filter(|c| !c.is_control() || matches!(c, '\t' | '\n' | '\r'));
    }

    match entity.to_ascii_lowercase().as_str() {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => None,
    }
}
