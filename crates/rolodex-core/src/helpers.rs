//! Pure formatting and derivation helpers used by the dashboards.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use url::Url;

const CURRENCY_TIERS: [(f64, &str); 4] = [
    (1_000_000_000_000.0, "T"),
    (1_000_000_000.0, "B"),
    (1_000_000.0, "M"),
    (1_000.0, "K"),
];

const MERGE_KEYWORDS: &[&str] = &["merge"];
const SELL_KEYWORDS: &[&str] = &["sell", "sale", "divest"];
const SPINOFF_KEYWORDS: &[&str] = &["spin-off", "spinoff", "spin off", "spins off"];
const ACQUIRE_KEYWORDS: &[&str] = &["acquir", "buy", "purchase", "takeover"];

/// Scan order matters: the first category with a matching keyword wins.
const RELATIONSHIP_VERBS: [(&[&str], &str); 4] = [
    (MERGE_KEYWORDS, "merges with"),
    (SELL_KEYWORDS, "sells"),
    (SPINOFF_KEYWORDS, "spins off"),
    (ACQUIRE_KEYWORDS, "acquires"),
];

const DEFAULT_RELATIONSHIP_VERB: &str = "buys";

pub const INVALID_DATE: &str = "Invalid Date";

/// Entities that carry an ISO-8601 date used for recency ordering.
pub trait Dated {
    fn date(&self) -> &str;
}

/// `$1.2M`-style amount, or `Undisclosed` when there is no amount.
pub fn format_currency_abbreviated(amount: Option<f64>) -> String {
    let Some(value) = amount else {
        return "Undisclosed".to_string();
    };
    let abs = value.abs();
    let sign = if value < 0.0 { "-" } else { "" };
    for (unit, suffix) in CURRENCY_TIERS {
        if abs >= unit {
            return format!("{sign}${:.1}{suffix}", round_half_up(abs / unit, 1));
        }
    }
    format!("{sign}${:.0}", round_half_up(abs, 0))
}

// `{:.N}` alone rounds exact ties to even; amounts round ties upward.
fn round_half_up(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

/// Accepts plain dates (`2025-08-07`) as well as RFC 3339 timestamps.
pub fn parse_iso_date(iso: &str) -> Option<NaiveDate> {
    let trimmed = iso.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(ts.date_naive());
    }
    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|ts| ts.date())
}

/// `8/7/25`
pub fn format_date_compact(iso: &str) -> String {
    match parse_iso_date(iso) {
        Some(date) => format!(
            "{}/{}/{:02}",
            date.month(),
            date.day(),
            date.year().rem_euclid(100)
        ),
        None => INVALID_DATE.to_string(),
    }
}

/// `Aug 07, 2025`
pub fn format_date_verbose(iso: &str) -> String {
    match parse_iso_date(iso) {
        Some(date) => date.format("%b %d, %Y").to_string(),
        None => INVALID_DATE.to_string(),
    }
}

pub fn extract_domain(url: Option<&str>) -> Option<String> {
    let raw = url?.trim();
    if raw.is_empty() {
        return None;
    }
    let parsed = Url::parse(raw).ok()?;
    let host = parsed.host_str()?;
    Some(host.strip_prefix("www.").unwrap_or(host).to_string())
}

pub fn slugify(text: &str) -> String {
    let expanded = text.replace('&', " and ");
    let mut out = String::with_capacity(expanded.len());
    let mut prev_dash = false;
    for ch in expanded.chars() {
        if ch.is_ascii_alphanumeric() {
            out.push(ch.to_ascii_lowercase());
            prev_dash = false;
        } else if !prev_dash {
            out.push('-');
            prev_dash = true;
        }
    }
    out.trim_matches('-').to_string()
}

/// Verb phrase describing how the parties in a deal headline relate.
pub fn classify_relationship_verb(title: &str) -> &'static str {
    let haystack = title.to_lowercase();
    RELATIONSHIP_VERBS
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|keyword| haystack.contains(keyword)))
        .map(|(_, verb)| *verb)
        .unwrap_or(DEFAULT_RELATIONSHIP_VERB)
}

/// Newest `n` items by date, ties keeping their input order.
pub fn select_most_recent<T>(items: &[T], n: usize) -> Vec<T>
where
    T: Dated + Clone,
{
    let mut sorted = items.to_vec();
    sorted.sort_by(|a, b| b.date().cmp(a.date()));
    sorted.truncate(n);
    sorted
}
