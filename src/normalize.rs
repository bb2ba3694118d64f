//! Field normalization: folds resolution and source tags into one display
//! `quality` value.
//!
//! The remap tables reflect the list owner's preferences: common HD
//! resolutions and Blu-ray are implied, so they disappear from the output.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

use crate::models::{NormalizedRecord, RawParse};
use crate::release::parse_release;

// ============================================================================
// REMAP TABLES
// ============================================================================

pub static RESOLUTION_REMAP: Lazy<HashMap<&str, &str>> = Lazy::new(|| {
    let mut m = HashMap::new();
    m.insert("2160p", "4K");
    m.insert("1080p", "");
    m.insert("720p", "");
    m
});

pub static QUALITY_REMAP: Lazy<HashMap<&str, &str>> = Lazy::new(|| {
    let mut m = HashMap::new();
    m.insert("Blu-ray", "");
    m.insert("WEB-DL", "WEB");
    m.insert("WEBRip", "WEB");
    m
});

/// Regex to collapse runs of whitespace into a single space
static MULTI_SPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

// ============================================================================
// NORMALIZATION
// ============================================================================

fn remap<'a>(table: &HashMap<&str, &'a str>, value: Option<&'a str>) -> &'a str {
    let value = value.unwrap_or("");
    table.get(value).copied().unwrap_or(value)
}

/// Trim and collapse whitespace; whitespace-only input becomes `None`.
fn clean(value: &str) -> Option<String> {
    let collapsed = MULTI_SPACE.replace_all(value.trim(), " ");
    if collapsed.is_empty() {
        None
    } else {
        Some(collapsed.into_owned())
    }
}

/// Combine mapped resolution and mapped quality: `"4K WEB"`, `"WEB"`, or `None`.
pub fn combine_quality(resolution: Option<&str>, quality: Option<&str>) -> Option<String> {
    let res = remap(&RESOLUTION_REMAP, resolution);
    let qual = remap(&QUALITY_REMAP, quality);
    clean(&format!("{} {}", res, qual))
}

/// Map one raw parse onto a normalized record. Pure.
pub fn normalize(raw: &RawParse) -> NormalizedRecord {
    NormalizedRecord {
        title: raw.title.as_deref().and_then(clean),
        year: raw.year,
        quality: combine_quality(raw.resolution.as_deref(), raw.quality.as_deref()),
    }
}

/// Parse and normalize a whole list, one record per line.
pub fn normalize_list(text: &str) -> Vec<NormalizedRecord> {
    text.lines().map(|line| normalize(&parse_release(line))).collect()
}
