use super::MetadataLookup;
use crate::models::SongMetadata;
use anyhow::{Context, Result};
use std::collections::HashMap;
use tracing::{info, warn};

/// Read-only table of song metadata, filled once before enrichment starts
#[derive(Debug, Default)]
pub struct MetadataCache {
    entries: HashMap<String, Option<SongMetadata>>,
}

impl MetadataCache {
    /// Look up every distinct song id exactly once and remember the answer,
    /// including "not found"
    pub fn prefetch<'a, I>(lookup: &dyn MetadataLookup, song_ids: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut entries = HashMap::new();
        for song_id in song_ids {
            if entries.contains_key(song_id) {
                continue;
            }
            let metadata = lookup
                .lookup(song_id)
                .with_context(|| format!("Metadata lookup failed for song '{song_id}'"))?;
            if metadata.is_none() {
                warn!(song_id, "song not found in metadata service");
            }
            entries.insert(song_id.to_string(), metadata);
        }

        let found = entries.values().filter(|m| m.is_some()).count();
        info!(
            distinct_songs = entries.len(),
            found,
            missing = entries.len() - found,
            "metadata prefetch complete"
        );
        Ok(MetadataCache { entries })
    }

    /// Build a cache from already known metadata
    #[cfg(test)]
    pub fn from_entries(entries: HashMap<String, SongMetadata>) -> Self {
        MetadataCache {
            entries: entries.into_iter().map(|(k, v)| (k, Some(v))).collect(),
        }
    }

    pub fn get(&self, song_id: &str) -> Option<&SongMetadata> {
        self.entries.get(song_id).and_then(Option::as_ref)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::super::MockMetadataLookup;
    use super::*;
    use mockall::predicate::eq;

    fn metadata(title: &str, artist: &str) -> SongMetadata {
        SongMetadata {
            title: title.to_string(),
            artist: artist.to_string(),
            release_date: None,
        }
    }

    #[test]
    fn test_prefetch_looks_up_each_song_once() {
        let mut lookup = MockMetadataLookup::new();
        lookup
            .expect_lookup()
            .with(eq("a"))
            .times(1)
            .returning(|_| Ok(Some(metadata("Song A", "Artist"))));
        lookup
            .expect_lookup()
            .with(eq("missing"))
            .times(1)
            .returning(|_| Ok(None));

        let cache = MetadataCache::prefetch(&lookup, ["a", "missing", "a", "missing"]).unwrap();

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("a").map(|m| m.title.as_str()), Some("Song A"));
        assert!(cache.get("missing").is_none());
        assert!(cache.get("never-asked").is_none());
    }

    #[test]
    fn test_prefetch_propagates_lookup_errors() {
        let mut lookup = MockMetadataLookup::new();
        lookup
            .expect_lookup()
            .returning(|_| Err(anyhow::anyhow!("connection refused")));

        let err = MetadataCache::prefetch(&lookup, ["a"]).unwrap_err();
        assert!(err.to_string().contains("'a'"));
    }
}
