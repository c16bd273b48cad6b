//! Pure field normalizers.
//!
//! Every function here takes one raw value and returns a canonical typed
//! value or `None`. Malformed input degrades to missing; nothing in this
//! module can fail.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::collections::HashSet;

/// The missing-value sentinel used across the source APIs.
const MISSING: &str = "N/A";

pub fn is_missing(raw: &str) -> bool {
    let trimmed = raw.trim();
    trimmed.is_empty() || trimmed == MISSING
}

/// "142 min" → 142. Anything unparseable is missing, not an error.
pub fn clean_runtime(raw: &str) -> Option<u32> {
    let trimmed = raw.trim();
    if is_missing(trimmed) {
        return None;
    }
    let digits = trimmed.strip_suffix("min").map(str::trim_end).unwrap_or(trimmed);
    digits.parse().ok()
}

/// "1,234,567" → 1234567.
pub fn clean_vote_count(raw: &str) -> Option<u64> {
    if is_missing(raw) {
        return None;
    }
    raw.trim().replace(',', "").parse().ok()
}

/// "$30,039,175" → 30039175.
pub fn clean_currency(raw: &str) -> Option<u64> {
    if is_missing(raw) {
        return None;
    }
    raw.trim().replace(['$', ','], "").parse().ok()
}

/// "94%" → "94". Kept as a string: the value stays numeric-ready while "N/A"
/// and friends collapse to missing without a parse step.
pub fn clean_percent(raw: &str) -> Option<String> {
    if is_missing(raw) {
        return None;
    }
    Some(raw.trim().trim_end_matches('%').to_string())
}

/// "94%" → 94, for assembling the canonical row.
pub fn parse_percent_score(raw: &str) -> Option<u8> {
    clean_percent(raw)?.parse().ok()
}

/// "8.3" (a 0-10 rating) → 83 on the 0-100 scale.
pub fn parse_audience_score(raw: &str) -> Option<u8> {
    if is_missing(raw) {
        return None;
    }
    let rating: f64 = raw.trim().parse().ok()?;
    if !(0.0..=10.0).contains(&rating) {
        return None;
    }
    Some((rating * 10.0).round() as u8)
}

/// Splits a delimited name/label list on commas and semicolons, trimming each
/// element and dropping empties.
pub fn split_list(raw: &str) -> Vec<String> {
    if is_missing(raw) {
        return Vec::new();
    }
    raw.split([',', ';'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

static ROLE_ANNOTATION: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*\([A-Za-z ]+\)").unwrap());

/// Removes parenthetical role annotations: "John Irving (novel)" → "John Irving".
pub fn strip_role_annotations(raw: &str) -> String {
    ROLE_ANNOTATION.replace_all(raw, "").to_string()
}

/// Applies the configured country alias table; unmapped values pass through.
pub fn map_countries(countries: Vec<String>, aliases: &HashMap<String, String>) -> Vec<String> {
    countries
        .into_iter()
        .map(|c| aliases.get(&c).cloned().unwrap_or(c))
        .collect()
}

/// Parses the release-date formats the sources emit.
pub fn parse_wire_date(raw: &str) -> Option<NaiveDate> {
    if is_missing(raw) {
        return None;
    }
    let trimmed = raw.trim();
    NaiveDate::parse_from_str(trimmed, "%d %b %Y")
        .or_else(|_| NaiveDate::parse_from_str(trimmed, "%Y-%m-%d"))
        .ok()
}

/// The comparison key for name/label equality: case-folded, whitespace-trimmed.
pub fn norm_key(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Deduplicates a list by normalized value, keeping the first-seen spelling.
/// Idempotent: running it twice gives the same list.
pub fn dedupe_names<I>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for name in names {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            continue;
        }
        if seen.insert(norm_key(trimmed)) {
            out.push(trimmed.to_string());
        }
    }
    out
}

/// cast − leads as a set difference over normalized names. Empty or missing
/// input on either side yields an empty result, not an error.
pub fn supporting_difference(cast: &[String], leads: &[String]) -> Vec<String> {
    if cast.is_empty() || leads.is_empty() {
        return Vec::new();
    }
    let lead_keys: HashSet<String> = leads.iter().map(|n| norm_key(n)).collect();
    cast.iter()
        .filter(|name| !lead_keys.contains(&norm_key(name)))
        .cloned()
        .collect()
}
