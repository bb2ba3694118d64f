//! Release-name tokenizer.
//!
//! Splits scene-style names like `Movie.Name.2020.1080p.BluRay.x264-GRP`
//! into title, year, resolution and source tag. Never fails: anything it
//! cannot recognise is left absent.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::RawParse;

// ============================================================================
// REGEX PATTERNS
// ============================================================================

/// Container extensions at the end of a name: ".mkv", ".mp4", ...
static FILE_EXTENSION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\.(mkv|mp4|avi|m4v|mov|wmv|torrent)$").unwrap());

/// Dots and underscores used as word separators
static SEPARATORS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[._]+").unwrap());

static MULTI_SPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s{2,}").unwrap());

static YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(19\d{2}|20\d{2})\b").unwrap());

static RESOLUTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:(\d{3,4})p|(4k|uhd))\b").unwrap());

/// Source tags, longest alternatives first (leftmost-first matching).
static QUALITY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(blu-?ray|web[- ]?dl|web[- ]?rip|hdtv|dvd-?rip|bd-?rip|br-?rip|hd-?rip|cam-?rip|hdcam|telesync|dvdscr|web)\b",
    )
    .unwrap()
});

/// Unambiguous technical tags that end the title part. Bare "web" is left
/// out since it also shows up in real titles.
static TECH_BOUNDARY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:\d{3,4}p|4k|uhd|blu-?ray|web[- ]?dl|web[- ]?rip|hdtv|dvd-?rip|bd-?rip|br-?rip|hd-?rip|cam-?rip|hdcam|telesync|dvdscr|remux|x26[45]|h 26[45]|h26[45]|hevc|xvid|10bit|hdr|proper|repack)\b",
    )
    .unwrap()
});

/// Leftover punctuation at the end of a title: "Movie (", "Movie -", "Movie ["
static TRAILING_DEBRIS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\s\(\[\{\-]+$").unwrap());

// ============================================================================
// PARSING
// ============================================================================

/// Canonical spelling for a matched source tag.
fn canonical_quality(raw: &str) -> String {
    let key: String = raw
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_lowercase();
    match key.as_str() {
        "bluray" => "Blu-ray",
        "webdl" => "WEB-DL",
        "webrip" => "WEBRip",
        "web" => "WEB",
        "hdtv" => "HDTV",
        "dvdrip" => "DVDRip",
        "bdrip" => "BDRip",
        "brrip" => "BRRip",
        "hdrip" => "HDRip",
        "camrip" | "hdcam" => "CAM",
        "telesync" => "Telesync",
        "dvdscr" => "DVDScr",
        _ => raw,
    }
    .to_string()
}

fn canonical_resolution(caps: &regex::Captures) -> String {
    match (caps.get(1), caps.get(2)) {
        (Some(lines), _) => format!("{}p", lines.as_str()),
        _ => "2160p".to_string(),
    }
}

/// Parse one release name into its raw fields.
pub fn parse_release(line: &str) -> RawParse {
    let trimmed = line.trim();
    let without_ext = FILE_EXTENSION.replace(trimmed, "");
    let spaced = SEPARATORS.replace_all(&without_ext, " ");
    let cleaned = MULTI_SPACE.replace_all(spaced.trim(), " ").to_string();

    let boundary = TECH_BOUNDARY.find(&cleaned).map(|m| m.start());

    // A year at position 0 belongs to the title ("1917", "2001 A Space Odyssey")
    let year_match = YEAR
        .find_iter(&cleaned)
        .filter(|m| m.start() > 0)
        .filter(|m| boundary.map_or(true, |b| m.start() < b))
        .last();

    // Without a year only the technical boundary can end the title, so a
    // title word like "Web" is never read as a source tag.
    let (title_end, tail_start) = match (year_match, boundary) {
        (Some(m), _) => (m.start(), m.end()),
        (None, Some(b)) => (b, b),
        (None, None) => (cleaned.len(), cleaned.len()),
    };
    let tail = &cleaned[tail_start..];

    let resolution = RESOLUTION.captures(tail).map(|c| canonical_resolution(&c));
    let quality = QUALITY.find(tail).map(|m| canonical_quality(m.as_str()));

    let title = TRAILING_DEBRIS
        .replace(&cleaned[..title_end], "")
        .trim()
        .to_string();

    RawParse {
        title: (!title.is_empty()).then_some(title),
        year: year_match.and_then(|m| m.as_str().parse().ok()),
        resolution,
        quality,
    }
}
