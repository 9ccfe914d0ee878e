use super::AnalyticsEngine;
use super::tally::PlayTally;
use crate::models::EnrichedEvent;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;

/// A ranked song with the labels of its first play in range
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SongRank {
    pub song_id: String,
    pub title: String,
    pub artist: String,
    pub plays: usize,
}

fn in_range<'a>(
    events: &'a [EnrichedEvent],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> impl Iterator<Item = &'a EnrichedEvent> {
    events
        .iter()
        .filter(move |event| event.timestamp >= start && event.timestamp <= end)
}

impl AnalyticsEngine {
    /// Ids of the `n` most played songs with a play in `[start, end]`.
    ///
    /// Songs with equal counts keep the order in which they were first played.
    pub fn top_songs(
        events: &[EnrichedEvent],
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        n: usize,
    ) -> Vec<String> {
        if n == 0 || start > end {
            return Vec::new();
        }

        let mut tally = PlayTally::new();
        for event in in_range(events, start, end) {
            tally.record(event.song_id.as_str());
        }
        tally
            .ranked()
            .into_iter()
            .take(n)
            .map(|(song_id, _)| song_id.to_string())
            .collect()
    }

    /// [`AnalyticsEngine::top_songs`] with play counts and the title and
    /// artist of each song's first play in range
    pub fn rank_songs(
        events: &[EnrichedEvent],
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        n: usize,
    ) -> Vec<SongRank> {
        let top = Self::top_songs(events, start, end, n);
        let mut ranks: HashMap<&str, SongRank> = HashMap::new();
        for event in in_range(events, start, end) {
            if !top.contains(&event.song_id) {
                continue;
            }
            ranks
                .entry(event.song_id.as_str())
                .or_insert_with(|| SongRank {
                    song_id: event.song_id.clone(),
                    title: event.title.clone(),
                    artist: event.artist.clone(),
                    plays: 0,
                })
                .plays += 1;
        }

        top.iter()
            .filter_map(|song_id| ranks.remove(song_id.as_str()))
            .collect()
    }
}
