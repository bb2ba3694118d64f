//! Core data models for the release-list pipeline.
//!
//! One `RawParse` is produced per input line, normalized into a
//! `NormalizedRecord`, and finally paired with its lookup result as an
//! `EnrichedRecord`. Row order is the user's list order throughout.

use serde::Serialize;

// ============================================================================
// Parse Models
// ============================================================================

/// Fields tokenized out of one release name. Any of them may be missing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawParse {
    pub title: Option<String>,
    pub year: Option<u32>,
    pub resolution: Option<String>,
    pub quality: Option<String>,
}

/// A release with resolution folded into a display `quality` string.
///
/// `quality` is never `Some("")`: a combination that trims to nothing is `None`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NormalizedRecord {
    pub title: Option<String>,
    pub year: Option<u32>,
    pub quality: Option<String>,
}

/// A normalized record plus its (possibly absent) reference link.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnrichedRecord {
    pub record: NormalizedRecord,
    pub imdb_link: Option<String>,
}

// ============================================================================
// Lookup Models
// ============================================================================

/// A single ranked hit returned by a movie search backend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchHit {
    pub id: String,
    pub title: Option<String>,
    /// Content kind as reported by the service ("feature", "TV series", "podcast series", ...)
    pub kind: Option<String>,
    pub year: Option<u32>,
}

/// Row that exhausted every query strategy; written to the incomplete log.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ErrorLogEntry {
    pub title: Option<String>,
    pub year: Option<u32>,
}

impl ErrorLogEntry {
    /// Tab-separated log line (without newline). Absent fields are empty.
    pub fn to_line(&self) -> String {
        format!(
            "{}\t{}",
            self.title.as_deref().unwrap_or(""),
            self.year.map(|y| y.to_string()).unwrap_or_default()
        )
    }
}

// ============================================================================
// Output Models
// ============================================================================

/// How a resolved link is rendered in the output cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LinkStyle {
    /// Plain URL
    #[default]
    Bare,
    /// `=HYPERLINK("...")` formula so spreadsheet imports keep the link clickable
    Excel,
}

impl LinkStyle {
    pub fn render(self, link: &str) -> String {
        match self {
            LinkStyle::Bare => link.to_string(),
            LinkStyle::Excel => format!("=HYPERLINK(\"{}\")", link),
        }
    }
}

/// CSV row layout: `year,title,quality,IMDB`.
#[derive(Debug, Serialize)]
pub struct CsvRow<'a> {
    pub year: Option<u32>,
    pub title: Option<&'a str>,
    pub quality: Option<&'a str>,
    #[serde(rename = "IMDB")]
    pub imdb: Option<&'a str>,
}

impl<'a> From<&'a EnrichedRecord> for CsvRow<'a> {
    fn from(r: &'a EnrichedRecord) -> Self {
        Self {
            year: r.record.year,
            title: r.record.title.as_deref(),
            quality: r.record.quality.as_deref(),
            imdb: r.imdb_link.as_deref(),
        }
    }
}
