use anyhow::{Result, anyhow};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// One row of the raw plays CSV, before metadata is joined in
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawPlayEvent {
    #[serde(rename = "userId", alias = "user_id")]
    pub user_id: String,
    #[serde(rename = "songId", alias = "song_id")]
    pub song_id: String,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "durationMs", alias = "duration_ms")]
    pub duration_ms: u64,
}

/// Song attributes returned by the metadata service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SongMetadata {
    pub title: String,
    pub artist: String,
    #[serde(rename = "releaseDate", default)]
    pub release_date: Option<String>,
}

/// A play event joined with the metadata of its song.
///
/// The camelCase field names are the interchange format between the
/// enrichment step and the analytics queries; keep them stable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedEvent {
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "songId")]
    pub song_id: String,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "durationMs")]
    pub duration_ms: u64,
    pub title: String,
    pub artist: String,
    #[serde(rename = "releaseDate")]
    pub release_date: String,
}

impl EnrichedEvent {
    /// Join a raw play with its song metadata
    pub fn from_parts(play: RawPlayEvent, metadata: &SongMetadata) -> Self {
        EnrichedEvent {
            user_id: play.user_id,
            song_id: play.song_id,
            timestamp: play.timestamp,
            duration_ms: play.duration_ms,
            title: metadata.title.clone(),
            artist: metadata.artist.clone(),
            release_date: metadata.release_date.clone().unwrap_or_default(),
        }
    }
}

/// Parse a timestamp as RFC 3339, or as a naive date/datetime taken to be UTC
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date.and_time(chrono::NaiveTime::MIN).and_utc());
    }
    Err(anyhow!("Unrecognized timestamp: '{}'", value))
}

/// Parse a query range bound. A bare date covers the whole day: the start
/// bound is its first millisecond, the end bound its last.
pub fn parse_range_bound(value: &str, is_end: bool) -> Result<DateTime<Utc>> {
    if let Ok(date) = NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d") {
        let time = if is_end {
            chrono::NaiveTime::from_hms_milli_opt(23, 59, 59, 999)
                .ok_or_else(|| anyhow!("Invalid end-of-day time"))?
        } else {
            chrono::NaiveTime::MIN
        };
        return Ok(date.and_time(time).and_utc());
    }
    parse_timestamp(value)
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_timestamp_formats() {
        let expected = Utc.with_ymd_and_hms(2025, 3, 5, 14, 30, 0).unwrap();
        assert_eq!(parse_timestamp("2025-03-05T14:30:00Z").unwrap(), expected);
        assert_eq!(parse_timestamp("2025-03-05T15:30:00+01:00").unwrap(), expected);
        assert_eq!(parse_timestamp("2025-03-05 14:30:00").unwrap(), expected);
        assert_eq!(parse_timestamp("2025-03-05T14:30:00").unwrap(), expected);
        assert_eq!(
            parse_timestamp("2025-03-05").unwrap(),
            Utc.with_ymd_and_hms(2025, 3, 5, 0, 0, 0).unwrap()
        );
        assert!(parse_timestamp("yesterday").is_err());
    }

    #[test]
    fn test_parse_range_bound_covers_whole_days() {
        let start = parse_range_bound("2025-03-01", false).unwrap();
        let end = parse_range_bound("2025-03-31", true).unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap());
        assert_eq!(
            end,
            Utc.with_ymd_and_hms(2025, 3, 31, 23, 59, 59).unwrap()
                + chrono::Duration::milliseconds(999)
        );
        assert_eq!(
            parse_range_bound("2025-03-31T10:00:00Z", true).unwrap(),
            Utc.with_ymd_and_hms(2025, 3, 31, 10, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_enriched_event_field_names() {
        let event = EnrichedEvent {
            user_id: "u1".to_string(),
            song_id: "s1".to_string(),
            timestamp: Utc.with_ymd_and_hms(2025, 3, 5, 0, 0, 0).unwrap(),
            duration_ms: 180_000,
            title: "Song".to_string(),
            artist: "Artist".to_string(),
            release_date: "2020-01-01".to_string(),
        };
        let json = serde_json::to_value(&event).unwrap();
        for field in [
            "userId",
            "songId",
            "timestamp",
            "durationMs",
            "title",
            "artist",
            "releaseDate",
        ] {
            assert!(json.get(field).is_some(), "missing field {field}");
        }
        let back: EnrichedEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn test_metadata_without_release_date() {
        let metadata: SongMetadata =
            serde_json::from_str(r#"{"title":"T","artist":"A"}"#).unwrap();
        assert_eq!(metadata.release_date, None);
    }
}
