use super::AnalyticsEngine;
use super::calendar::{self, YearMonth};
use super::tally::PlayTally;
use crate::models::EnrichedEvent;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Most played song and artist of one user in one calendar month
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthSummary {
    pub year: i32,
    pub month: u32,
    pub top_song_title: String,
    pub top_artist_name: String,
    pub plays: usize,
}

/// Per-month summaries, oldest first. Months without plays are omitted;
/// `has_any_data` is false when every month was empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Timeline {
    pub has_any_data: bool,
    pub entries: Vec<MonthSummary>,
}

impl Timeline {
    fn from_entries(entries: Vec<MonthSummary>) -> Self {
        Timeline {
            has_any_data: !entries.is_empty(),
            entries,
        }
    }
}

#[derive(Default)]
struct MonthBucket<'a> {
    plays: usize,
    songs: PlayTally<&'a str>,
    artists: PlayTally<&'a str>,
    titles: HashMap<&'a str, &'a str>,
}

impl<'a> MonthBucket<'a> {
    fn record(&mut self, event: &'a EnrichedEvent) {
        self.plays += 1;
        self.songs.record(event.song_id.as_str());
        self.artists.record(event.artist.as_str());
        self.titles
            .entry(event.song_id.as_str())
            .or_insert(event.title.as_str());
    }

    fn summarize(&self, month: YearMonth) -> Option<MonthSummary> {
        let (song_id, _) = self.songs.leader()?;
        let (artist, _) = self.artists.leader()?;
        Some(MonthSummary {
            year: month.year,
            month: month.month,
            top_song_title: self.titles.get(song_id).copied().unwrap_or(song_id).to_string(),
            top_artist_name: artist.to_string(),
            plays: self.plays,
        })
    }
}

impl AnalyticsEngine {
    /// Monthly listening summary for `user_id` over the `months` calendar
    /// months ending with the month of the latest play in `events`
    pub fn timeline(events: &[EnrichedEvent], user_id: &str, months: u32) -> Timeline {
        let Some(reference) = calendar::reference_instant(events) else {
            return Timeline::from_entries(Vec::new());
        };
        let Some(oldest) = calendar::window_start(&reference, months) else {
            return Timeline::from_entries(Vec::new());
        };

        let mut buckets: BTreeMap<YearMonth, MonthBucket> = BTreeMap::new();
        for event in events.iter().filter(|event| event.user_id == user_id) {
            let month = YearMonth::of(&event.timestamp);
            // nothing is later than the reference month
            if month >= oldest {
                buckets.entry(month).or_default().record(event);
            }
        }

        let entries = buckets
            .iter()
            .filter_map(|(month, bucket)| bucket.summarize(*month))
            .collect();
        Timeline::from_entries(entries)
    }
}
