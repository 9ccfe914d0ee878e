use crate::analytics::{Payout, SongRank, Timeline, YearMonth};
use anyhow::Result;
use serde::Serialize;

/// Renders query results as printable lines
pub struct ReportFormatter;

impl ReportFormatter {
    pub fn top_songs(ranked: &[SongRank]) -> Vec<String> {
        if ranked.is_empty() {
            return vec!["No plays in the requested range.".to_string()];
        }
        ranked
            .iter()
            .enumerate()
            .map(|(i, rank)| {
                let unit = if rank.plays == 1 { "play" } else { "plays" };
                format!(
                    "{}. {} - \"{}\" by {} ({} {})",
                    i + 1,
                    rank.song_id,
                    rank.title,
                    rank.artist,
                    rank.plays,
                    unit
                )
            })
            .collect()
    }

    pub fn timeline(user_id: &str, months: u32, timeline: &Timeline) -> Vec<String> {
        if !timeline.has_any_data {
            return vec![format!("No data for user {user_id} in the last {months} months.")];
        }
        timeline
            .entries
            .iter()
            .map(|entry| {
                let month = YearMonth {
                    year: entry.year,
                    month: entry.month,
                };
                format!("{month}: {} | {}", entry.top_song_title, entry.top_artist_name)
            })
            .collect()
    }

    pub fn payout(payout: &Payout) -> Vec<String> {
        vec![format!(
            "{}: {} ({} qualifying streams, {:.1} min)",
            payout.artist,
            payout,
            payout.streams,
            payout.minutes()
        )]
    }

    /// Pretty JSON for `--json` output
    pub fn json<T: Serialize>(value: &T) -> Result<Vec<String>> {
        Ok(vec![serde_json::to_string_pretty(value)?])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::MonthSummary;

    #[test]
    fn test_top_songs_lines() {
        let ranked = vec![
            SongRank {
                song_id: "A".to_string(),
                title: "Alpha".to_string(),
                artist: "X".to_string(),
                plays: 2,
            },
            SongRank {
                song_id: "B".to_string(),
                title: "Beta".to_string(),
                artist: "Y".to_string(),
                plays: 1,
            },
        ];

        assert_eq!(
            ReportFormatter::top_songs(&ranked),
            vec![
                "1. A - \"Alpha\" by X (2 plays)".to_string(),
                "2. B - \"Beta\" by Y (1 play)".to_string(),
            ]
        );
        assert_eq!(
            ReportFormatter::top_songs(&[]),
            vec!["No plays in the requested range.".to_string()]
        );
    }

    #[test]
    fn test_timeline_lines() {
        let timeline = Timeline {
            has_any_data: true,
            entries: vec![MonthSummary {
                year: 2025,
                month: 1,
                top_song_title: "Alpha".to_string(),
                top_artist_name: "X".to_string(),
                plays: 3,
            }],
        };
        assert_eq!(
            ReportFormatter::timeline("u1", 3, &timeline),
            vec!["2025-01: Alpha | X".to_string()]
        );

        let empty = Timeline {
            has_any_data: false,
            entries: Vec::new(),
        };
        assert_eq!(
            ReportFormatter::timeline("u1", 3, &empty),
            vec!["No data for user u1 in the last 3 months.".to_string()]
        );
    }

    #[test]
    fn test_payout_line() {
        let payout = Payout {
            artist: "X".to_string(),
            months: 1,
            streams: 1,
            total_ms: 600_000,
            amount: 0.01,
        };
        assert_eq!(
            ReportFormatter::payout(&payout),
            vec!["X: $0.01 (1 qualifying streams, 10.0 min)".to_string()]
        );
    }

    #[test]
    fn test_json_uses_camel_case_and_rounded_amount() {
        let timeline = Timeline {
            has_any_data: true,
            entries: vec![MonthSummary {
                year: 2025,
                month: 3,
                top_song_title: "Alpha".to_string(),
                top_artist_name: "X".to_string(),
                plays: 1,
            }],
        };
        let json = ReportFormatter::json(&timeline).unwrap().join("\n");
        assert!(json.contains("\"hasAnyData\": true"), "{json}");
        assert!(json.contains("\"topSongTitle\": \"Alpha\""), "{json}");
        assert!(json.contains("\"topArtistName\": \"X\""), "{json}");

        let ranked = vec![SongRank {
            song_id: "A".to_string(),
            title: "Alpha".to_string(),
            artist: "X".to_string(),
            plays: 2,
        }];
        let json = ReportFormatter::json(&ranked).unwrap().join("\n");
        assert!(json.contains("\"songId\": \"A\""), "{json}");

        let payout = Payout {
            artist: "X".to_string(),
            months: 1,
            streams: 4,
            total_ms: 160_000,
            amount: 160_000.0 / 60_000.0 * 0.001,
        };
        let value: serde_json::Value =
            serde_json::from_str(&ReportFormatter::json(&payout).unwrap().join("\n")).unwrap();
        assert_eq!(value["totalMs"], 160_000);
        assert_eq!(value["amount"], 0.0);
    }
}
