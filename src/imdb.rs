//! Blocking IMDb search backend built on the public suggestion endpoint.

use serde::Deserialize;
use std::time::Duration;

use crate::error::LookupError;
use crate::lookup::MovieSearch;
use crate::models::SearchHit;

const SUGGESTION_BASE_URL: &str = "https://v3.sg.media-imdb.com/suggestion/x";
const TITLE_BASE_URL: &str = "https://www.imdb.com/title";
const REQUEST_TIMEOUT_SECS: u64 = 30;
const USER_AGENT: &str = concat!("torrent-list-csv/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize)]
struct SuggestionResponse {
    #[serde(default)]
    d: Vec<SuggestionItem>,
}

#[derive(Debug, Deserialize)]
struct SuggestionItem {
    id: String,
    /// Display title
    l: Option<String>,
    /// Human-readable kind ("feature", "TV series", "Podcast Series")
    q: Option<String>,
    /// Machine kind ("movie", "tvSeries", "podcastSeries")
    qid: Option<String>,
    y: Option<u32>,
}

/// Decode a suggestion response body into ranked title hits.
///
/// Entries that are not titles (people `nm…`, lists, keywords) are dropped;
/// service order is kept.
pub fn parse_suggestions(body: &str) -> Result<Vec<SearchHit>, LookupError> {
    let response: SuggestionResponse = serde_json::from_str(body)?;
    Ok(response
        .d
        .into_iter()
        .filter(|item| item.id.starts_with("tt"))
        .map(|item| SearchHit {
            id: item.id,
            title: item.l,
            kind: item.q.or(item.qid),
            year: item.y,
        })
        .collect())
}

pub struct ImdbClient {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl ImdbClient {
    pub fn new() -> Result<Self, LookupError> {
        Self::with_base_url(SUGGESTION_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, LookupError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    fn suggestion_url(&self, query: &str) -> String {
        format!(
            "{}/{}.json",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(query.trim())
        )
    }
}

impl MovieSearch for ImdbClient {
    fn search(&self, query: &str) -> Result<Vec<SearchHit>, LookupError> {
        let url = self.suggestion_url(query);
        tracing::debug!(%url, "imdb search");

        let response = self.client.get(&url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Status(status.as_u16()));
        }
        let body = response.text()?;
        parse_suggestions(&body)
    }

    fn reference_url(&self, hit: &SearchHit) -> String {
        title_url(&hit.id)
    }
}

/// Canonical title page: `https://www.imdb.com/title/tt0000000/`
pub fn title_url(id: &str) -> String {
    format!("{}/{}/", TITLE_BASE_URL, id)
}
