//! Enrichment loop: resolves a link for every record, in input order.
//!
//! Rows are processed one at a time. Progress only advances on a resolved
//! row; rows that end up without a link keep their place with `imdb_link: None`.

use crate::lookup::LinkResolver;
use crate::models::{EnrichedRecord, LinkStyle, NormalizedRecord};
use crate::progress::ProgressSink;

/// Progress accounting threaded through one enrichment pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EnrichState {
    pub processed: usize,
    pub total: usize,
}

impl EnrichState {
    pub fn new(total: usize) -> Self {
        Self { processed: 0, total }
    }
}

fn enrich_one<L: LinkResolver + ?Sized>(
    state: &mut EnrichState,
    record: NormalizedRecord,
    resolver: &mut L,
    style: LinkStyle,
    progress: &mut dyn ProgressSink,
) -> EnrichedRecord {
    let link = resolver.resolve(record.title.as_deref(), record.year);

    let imdb_link = link.map(|link| {
        state.processed += 1;
        progress.update(state.processed, state.total);
        style.render(&link)
    });

    EnrichedRecord { record, imdb_link }
}

/// Resolve links for all records. Output has the same length and order as input.
pub fn enrich<L: LinkResolver + ?Sized>(
    records: Vec<NormalizedRecord>,
    resolver: &mut L,
    style: LinkStyle,
    progress: &mut dyn ProgressSink,
) -> (Vec<EnrichedRecord>, EnrichState) {
    let mut state = EnrichState::new(records.len());
    let mut enriched = Vec::with_capacity(records.len());

    if !records.is_empty() {
        progress.update(0, state.total);
    }
    for record in records {
        enriched.push(enrich_one(&mut state, record, resolver, style, progress));
    }

    (enriched, state)
}
