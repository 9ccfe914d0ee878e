use super::{MetadataCache, MetadataLookup};
use crate::models::{EnrichedEvent, RawPlayEvent};
use anyhow::Result;
use tracing::{debug, info};

/// Result of joining raw plays with metadata
#[derive(Debug, Default)]
pub struct EnrichmentOutcome {
    pub events: Vec<EnrichedEvent>,
    /// Plays whose song had no usable metadata
    pub dropped: usize,
}

/// Joins raw plays to song metadata held in a prefilled cache
pub struct EventEnricher<'a> {
    cache: &'a MetadataCache,
}

impl<'a> EventEnricher<'a> {
    pub fn new(cache: &'a MetadataCache) -> Self {
        Self { cache }
    }

    /// Enrich plays in input order. Plays with unknown songs, or with
    /// metadata lacking a title or artist, are dropped.
    pub fn enrich(&self, plays: Vec<RawPlayEvent>) -> EnrichmentOutcome {
        let mut outcome = EnrichmentOutcome::default();
        for play in plays {
            match self.cache.get(&play.song_id) {
                Some(metadata)
                    if !metadata.title.trim().is_empty() && !metadata.artist.trim().is_empty() =>
                {
                    outcome.events.push(EnrichedEvent::from_parts(play, metadata));
                }
                _ => {
                    debug!(
                        song_id = %play.song_id,
                        user_id = %play.user_id,
                        "dropping play without metadata"
                    );
                    outcome.dropped += 1;
                }
            }
        }
        outcome
    }
}

/// Prefetch metadata for every distinct song in `plays`, then enrich them
pub fn enrich_plays(
    lookup: &dyn MetadataLookup,
    plays: Vec<RawPlayEvent>,
) -> Result<EnrichmentOutcome> {
    let cache = MetadataCache::prefetch(lookup, plays.iter().map(|p| p.song_id.as_str()))?;
    let outcome = EventEnricher::new(&cache).enrich(plays);
    info!(
        enriched = outcome.events.len(),
        dropped = outcome.dropped,
        "enrichment complete"
    );
    Ok(outcome)
}
