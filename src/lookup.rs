//! Multi-strategy link resolution.
//!
//! Every search is preceded by a random courtesy delay. Strategies are tried
//! in a fresh random order per title until one yields a usable hit; if none
//! does, the row is appended to the incomplete log and resolves to `None`.

use rand::seq::SliceRandom;
use rand::Rng;
use std::time::Duration;

use crate::error::LookupError;
use crate::error_log::IncompleteLog;
use crate::models::{ErrorLogEntry, SearchHit};

/// Result kinds the service mixes in with films and shows.
pub const IGNORED_CONTENT_KINDS: [&str; 3] = ["podcast series", "podcastseries", "podcast"];

// ============================================================================
// Seams
// ============================================================================

/// A ranked movie search backend.
pub trait MovieSearch {
    fn search(&self, query: &str) -> Result<Vec<SearchHit>, LookupError>;

    /// Canonical reference link for a hit.
    fn reference_url(&self, hit: &SearchHit) -> String;
}

/// Blocking pause before each search attempt.
pub trait Pause {
    fn pause(&mut self, duration: Duration);
}

pub struct ThreadSleep;

impl Pause for ThreadSleep {
    fn pause(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Anything that can turn a title/year into an optional link.
pub trait LinkResolver {
    fn resolve(&mut self, title: Option<&str>, year: Option<u32>) -> Option<String>;
}

// ============================================================================
// Courtesy delay
// ============================================================================

/// Uniform delay bounds, inclusive.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DelayRange {
    min: Duration,
    max: Duration,
}

impl DelayRange {
    pub const DEFAULT_MIN_SECS: f64 = 1.0;
    pub const DEFAULT_MAX_SECS: f64 = 3.0;

    /// Returns `None` for negative, non-finite or inverted bounds.
    pub fn from_secs(min: f64, max: f64) -> Option<Self> {
        if !min.is_finite() || !max.is_finite() || min < 0.0 || min > max {
            return None;
        }
        Some(Self {
            min: Duration::from_secs_f64(min),
            max: Duration::from_secs_f64(max),
        })
    }

    pub fn zero() -> Self {
        Self {
            min: Duration::ZERO,
            max: Duration::ZERO,
        }
    }

    pub fn sample<R: Rng>(&self, rng: &mut R) -> Duration {
        if self.min == self.max {
            return self.min;
        }
        let secs = rng.gen_range(self.min.as_secs_f64()..=self.max.as_secs_f64());
        Duration::from_secs_f64(secs)
    }
}

impl Default for DelayRange {
    fn default() -> Self {
        Self {
            min: Duration::from_secs_f64(Self::DEFAULT_MIN_SECS),
            max: Duration::from_secs_f64(Self::DEFAULT_MAX_SECS),
        }
    }
}

// ============================================================================
// Query strategies
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QueryStrategy {
    /// "Title 2010"
    TitleYear,
    /// "Title"
    Title,
    /// "2010 Title"
    YearTitle,
    /// "Title (2010)"
    TitleParenYear,
    /// "Title" without punctuation
    TitleStripped,
}

impl QueryStrategy {
    pub const ALL: [QueryStrategy; 5] = [
        QueryStrategy::TitleYear,
        QueryStrategy::Title,
        QueryStrategy::YearTitle,
        QueryStrategy::TitleParenYear,
        QueryStrategy::TitleStripped,
    ];

    /// Query text, or `None` when a field this phrasing needs is absent.
    pub fn query(self, title: Option<&str>, year: Option<u32>) -> Option<String> {
        let title = title?;
        match self {
            QueryStrategy::TitleYear => year.map(|y| format!("{} {}", title, y)),
            QueryStrategy::Title => Some(title.to_string()),
            QueryStrategy::YearTitle => year.map(|y| format!("{} {}", y, title)),
            QueryStrategy::TitleParenYear => year.map(|y| format!("{} ({})", title, y)),
            QueryStrategy::TitleStripped => Some(strip_punctuation(title)),
        }
    }
}

/// Drop ASCII punctuation except apostrophes and ampersands, then collapse spaces.
/// "Mission: Impossible - Fallout" -> "Mission Impossible Fallout"
pub fn strip_punctuation(title: &str) -> String {
    let kept: String = title
        .chars()
        .map(|c| {
            if c.is_ascii_punctuation() && c != '\'' && c != '&' {
                ' '
            } else {
                c
            }
        })
        .collect();
    kept.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn is_ignored_kind(kind: Option<&str>) -> bool {
    kind.map_or(false, |k| {
        let lower = k.to_lowercase();
        IGNORED_CONTENT_KINDS.contains(&lower.as_str())
    })
}

/// Outcome of one strategy attempt.
#[derive(Debug)]
pub enum StrategyOutcome {
    Found(String),
    NoMatch,
    ServiceError(LookupError),
}

// ============================================================================
// Resolver
// ============================================================================

pub struct Resolver<S, R, P> {
    search: S,
    rng: R,
    pause: P,
    delay: DelayRange,
    log: IncompleteLog,
}

impl<S: MovieSearch, R: Rng, P: Pause> Resolver<S, R, P> {
    pub fn new(search: S, rng: R, pause: P, delay: DelayRange, log: IncompleteLog) -> Self {
        Self {
            search,
            rng,
            pause,
            delay,
            log,
        }
    }

    /// Strategy order for one title: a uniform random permutation.
    fn shuffled_strategies(&mut self) -> [QueryStrategy; 5] {
        let mut order = QueryStrategy::ALL;
        order.shuffle(&mut self.rng);
        order
    }

    /// Run one strategy: delay, search, drop ignored kinds, take the top hit.
    pub fn attempt(
        &mut self,
        strategy: QueryStrategy,
        title: Option<&str>,
        year: Option<u32>,
    ) -> StrategyOutcome {
        let Some(query) = strategy.query(title, year) else {
            return StrategyOutcome::NoMatch;
        };

        let delay = self.delay.sample(&mut self.rng);
        self.pause.pause(delay);

        match self.search.search(&query) {
            Ok(hits) => match hits.iter().find(|h| !is_ignored_kind(h.kind.as_deref())) {
                Some(hit) => StrategyOutcome::Found(self.search.reference_url(hit)),
                None => StrategyOutcome::NoMatch,
            },
            Err(e) => StrategyOutcome::ServiceError(e),
        }
    }

    /// Resolve a title/year to a link, logging the row when every strategy misses.
    pub fn resolve(&mut self, title: Option<&str>, year: Option<u32>) -> Option<String> {
        for strategy in self.shuffled_strategies() {
            match self.attempt(strategy, title, year) {
                StrategyOutcome::Found(link) => {
                    tracing::debug!(?strategy, ?title, ?year, %link, "resolved");
                    return Some(link);
                }
                StrategyOutcome::NoMatch => {
                    tracing::debug!(?strategy, ?title, ?year, "no match");
                }
                StrategyOutcome::ServiceError(e) => {
                    tracing::debug!(?strategy, ?title, ?year, error = %e, "search failed");
                }
            }
        }

        let entry = ErrorLogEntry {
            title: title.map(String::from),
            year,
        };
        tracing::info!(?title, ?year, "no strategy matched, logging as incomplete");
        if let Err(e) = self.log.append(&entry) {
            tracing::warn!(path = %self.log.path().display(), error = %e, "failed to append incomplete log");
        }
        None
    }
}

impl<S: MovieSearch, R: Rng, P: Pause> LinkResolver for Resolver<S, R, P> {
    fn resolve(&mut self, title: Option<&str>, year: Option<u32>) -> Option<String> {
        Resolver::resolve(self, title, year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::cell::RefCell;
    use std::collections::HashMap;

    fn hit(id: &str, kind: &str) -> SearchHit {
        SearchHit {
            id: id.to_string(),
            title: None,
            kind: Some(kind.to_string()),
            year: None,
        }
    }

    /// Canned responses by exact query; unknown queries return no hits.
    #[derive(Default)]
    struct FakeSearch {
        responses: HashMap<String, Result<Vec<SearchHit>, u16>>,
        queries: RefCell<Vec<String>>,
    }

    impl FakeSearch {
        fn with(mut self, query: &str, response: Result<Vec<SearchHit>, u16>) -> Self {
            self.responses.insert(query.to_string(), response);
            self
        }
    }

    impl MovieSearch for FakeSearch {
        fn search(&self, query: &str) -> Result<Vec<SearchHit>, LookupError> {
            self.queries.borrow_mut().push(query.to_string());
            match self.responses.get(query) {
                Some(Ok(hits)) => Ok(hits.clone()),
                Some(Err(status)) => Err(LookupError::Status(*status)),
                None => Ok(Vec::new()),
            }
        }

        fn reference_url(&self, hit: &SearchHit) -> String {
            format!("https://example/{}", hit.id)
        }
    }

    #[derive(Default)]
    struct RecordedPause(Vec<Duration>);

    impl Pause for &mut RecordedPause {
        fn pause(&mut self, duration: Duration) {
            self.0.push(duration);
        }
    }

    fn resolver<'a>(
        search: FakeSearch,
        pause: &'a mut RecordedPause,
        log: IncompleteLog,
    ) -> Resolver<FakeSearch, StdRng, &'a mut RecordedPause> {
        Resolver::new(search, StdRng::seed_from_u64(7), pause, DelayRange::zero(), log)
    }

    #[test]
    fn test_query_phrasings() {
        let t = Some("Mission: Impossible");
        assert_eq!(QueryStrategy::TitleYear.query(t, Some(1996)).unwrap(), "Mission: Impossible 1996");
        assert_eq!(QueryStrategy::Title.query(t, Some(1996)).unwrap(), "Mission: Impossible");
        assert_eq!(QueryStrategy::YearTitle.query(t, Some(1996)).unwrap(), "1996 Mission: Impossible");
        assert_eq!(QueryStrategy::TitleParenYear.query(t, Some(1996)).unwrap(), "Mission: Impossible (1996)");
        assert_eq!(QueryStrategy::TitleStripped.query(t, Some(1996)).unwrap(), "Mission Impossible");
    }

    #[test]
    fn test_query_missing_fields() {
        assert_eq!(QueryStrategy::TitleYear.query(Some("Heat"), None), None);
        assert_eq!(QueryStrategy::Title.query(Some("Heat"), None).as_deref(), Some("Heat"));
        for s in QueryStrategy::ALL {
            assert_eq!(s.query(None, Some(1995)), None);
        }
    }

    #[test]
    fn test_strip_punctuation() {
        assert_eq!(strip_punctuation("Mission: Impossible - Fallout"), "Mission Impossible Fallout");
        assert_eq!(strip_punctuation("Marvel's The Avengers"), "Marvel's The Avengers");
        assert_eq!(strip_punctuation("Fast & Furious"), "Fast & Furious");
    }

    #[test]
    fn test_ignored_kinds() {
        assert!(is_ignored_kind(Some("Podcast Series")));
        assert!(is_ignored_kind(Some("podcastSeries")));
        assert!(is_ignored_kind(Some("podcast")));
        assert!(!is_ignored_kind(Some("feature")));
        assert!(!is_ignored_kind(None));
    }

    #[test]
    fn test_delay_range() {
        assert!(DelayRange::from_secs(3.0, 1.0).is_none());
        assert!(DelayRange::from_secs(-1.0, 1.0).is_none());
        let range = DelayRange::from_secs(1.0, 3.0).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..100 {
            let d = range.sample(&mut rng);
            assert!(d >= Duration::from_secs(1) && d <= Duration::from_secs(3));
        }
        assert_eq!(DelayRange::zero().sample(&mut rng), Duration::ZERO);
    }

    #[test]
    fn test_shuffle_covers_every_strategy() {
        let dir = tempfile::tempdir().unwrap();
        let mut pause = RecordedPause::default();
        let mut r = resolver(FakeSearch::default(), &mut pause, IncompleteLog::new(dir.path().join("log.txt")));
        let orders: Vec<Vec<QueryStrategy>> = (0..20).map(|_| r.shuffled_strategies().to_vec()).collect();
        for order in &orders {
            let mut sorted = order.clone();
            sorted.sort_by_key(|s| QueryStrategy::ALL.iter().position(|a| a == s));
            assert_eq!(sorted, QueryStrategy::ALL.to_vec());
        }
        assert!(
            orders.iter().any(|o| *o != orders[0]),
            "shuffle returned the same order on every call"
        );
    }

    #[test]
    fn test_resolve_first_usable_hit() {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("log.txt");
        let search = FakeSearch::default()
            .with("Inception", Ok(vec![hit("tt5295894", "Podcast Series"), hit("tt1375666", "feature")]))
            .with("Inception 2010", Ok(vec![hit("tt1375666", "feature")]))
            .with("2010 Inception", Ok(vec![hit("tt1375666", "feature")]))
            .with("Inception (2010)", Ok(vec![hit("tt1375666", "feature")]));
        let mut pause = RecordedPause::default();
        let mut r = resolver(search, &mut pause, IncompleteLog::new(&log_path));

        let link = r.resolve(Some("Inception"), Some(2010));
        assert_eq!(link.as_deref(), Some("https://example/tt1375666"));
        assert_eq!(r.search.queries.borrow().len(), 1);
        assert!(!log_path.exists());
    }

    #[test]
    fn test_resolve_exhausted_logs_once() {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("log.txt");
        let mut pause = RecordedPause::default();
        let mut r = resolver(FakeSearch::default(), &mut pause, IncompleteLog::new(&log_path));

        assert_eq!(r.resolve(Some("Some Title"), Some(1999)), None);

        let mut queries = r.search.queries.borrow().clone();
        queries.sort();
        assert_eq!(
            queries,
            vec!["1999 Some Title", "Some Title", "Some Title", "Some Title (1999)", "Some Title 1999"]
        );
        drop(r);
        // Delay before every attempt, including the first
        assert_eq!(pause.0.len(), 5);
        assert_eq!(std::fs::read_to_string(&log_path).unwrap(), "Some Title\t1999\n");
    }

    #[test]
    fn test_resolve_service_errors_fall_through() {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("log.txt");
        let search = FakeSearch::default()
            .with("Heat 1995", Err(503))
            .with("1995 Heat", Err(429))
            .with("Heat (1995)", Err(500))
            .with("Heat", Ok(vec![hit("tt0113277", "feature")]));
        let mut pause = RecordedPause::default();
        let mut r = resolver(search, &mut pause, IncompleteLog::new(&log_path));

        assert_eq!(r.resolve(Some("Heat"), Some(1995)).as_deref(), Some("https://example/tt0113277"));
        assert!(!log_path.exists());
    }

    #[test]
    fn test_resolve_only_ignored_kinds_is_a_miss() {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("log.txt");
        let podcast = Ok(vec![hit("tt9999999", "podcastseries")]);
        let search = FakeSearch::default()
            .with("Serial", podcast.clone())
            .with("Serial 2014", podcast.clone())
            .with("2014 Serial", podcast.clone())
            .with("Serial (2014)", podcast);
        let mut pause = RecordedPause::default();
        let mut r = resolver(search, &mut pause, IncompleteLog::new(&log_path));

        assert_eq!(r.resolve(Some("Serial"), Some(2014)), None);
        assert_eq!(std::fs::read_to_string(&log_path).unwrap(), "Serial\t2014\n");
    }

    #[test]
    fn test_resolve_absent_title_skips_network() {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("log.txt");
        let mut pause = RecordedPause::default();
        let mut r = resolver(FakeSearch::default(), &mut pause, IncompleteLog::new(&log_path));

        assert_eq!(r.resolve(None, Some(2004)), None);
        assert!(r.search.queries.borrow().is_empty());
        drop(r);
        assert!(pause.0.is_empty());
        assert_eq!(std::fs::read_to_string(&log_path).unwrap(), "\t2004\n");
    }

    #[test]
    fn test_resolve_log_failure_is_swallowed() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be opened for append
        let mut pause = RecordedPause::default();
        let mut r = resolver(FakeSearch::default(), &mut pause, IncompleteLog::new(dir.path()));
        assert_eq!(r.resolve(Some("Nothing"), Some(2000)), None);
    }
}
