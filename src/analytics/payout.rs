use super::AnalyticsEngine;
use super::calendar;
use crate::models::EnrichedEvent;
use serde::{Serialize, Serializer};
use std::fmt;

/// Currency units paid per streamed minute
pub const RATE_PER_MINUTE: f64 = 0.001;

/// Streams must last strictly longer than this to be paid
pub const MIN_PAID_STREAM_MS: u64 = 10_000;

const MS_PER_MINUTE: f64 = 60_000.0;

/// Royalty owed to one artist over a window of calendar months
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Payout {
    pub artist: String,
    pub months: u32,
    pub streams: usize,
    pub total_ms: u64,
    /// Unrounded amount; round only for display
    #[serde(serialize_with = "serialize_cents")]
    pub amount: f64,
}

fn round_to_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

fn serialize_cents<S: Serializer>(amount: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(round_to_cents(*amount))
}

impl Payout {
    pub fn minutes(&self) -> f64 {
        self.total_ms as f64 / MS_PER_MINUTE
    }

    /// Amount rounded to cents
    pub fn rounded(&self) -> f64 {
        round_to_cents(self.amount)
    }
}

impl fmt::Display for Payout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.rounded())
    }
}

impl AnalyticsEngine {
    /// Royalty for `artist_name` (matched case-insensitively) from the start
    /// of the calendar month `months - 1` months before the latest play up
    /// to the latest play
    pub fn payout(events: &[EnrichedEvent], artist_name: &str, months: u32) -> Payout {
        let window_start = calendar::reference_instant(events)
            .and_then(|reference| calendar::window_start(&reference, months))
            .map(|month| month.first_instant());

        let (streams, total_ms) = match window_start {
            Some(start) => {
                let wanted = artist_name.to_lowercase();
                events
                    .iter()
                    .filter(|event| event.duration_ms > MIN_PAID_STREAM_MS)
                    .filter(|event| start.is_none_or(|start| event.timestamp >= start))
                    .filter(|event| event.artist.to_lowercase() == wanted)
                    .fold((0usize, 0u64), |(streams, total), event| {
                        (streams + 1, total.saturating_add(event.duration_ms))
                    })
            }
            // no events, or a zero-month window
            None => (0, 0),
        };

        let minutes = total_ms as f64 / MS_PER_MINUTE;
        Payout {
            artist: artist_name.to_string(),
            months,
            streams,
            total_ms,
            amount: minutes * RATE_PER_MINUTE,
        }
    }
}
