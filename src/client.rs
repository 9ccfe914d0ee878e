use crate::config::Config;
use crate::enrichment::MetadataLookup;
use crate::models::SongMetadata;
use anyhow::Result;
use std::time::Duration;
use tracing::debug;
use ureq::Agent;
use urlencoding::encode;

/// A simple client for the song metadata HTTP service
pub struct MetadataClient {
    agent: Agent,
    base_url: String,
}

impl MetadataClient {
    /// Create a new client with configuration from environment
    pub fn new(config: Config) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build();

        MetadataClient {
            agent,
            base_url: config.metadata_base_url,
        }
    }

    fn song_url(&self, song_id: &str) -> String {
        format!(
            "{}/songs/{}",
            self.base_url.trim_end_matches('/'),
            encode(song_id)
        )
    }

    /// Fetch metadata for one song; a 404 means the service does not know it
    pub fn fetch_song(&self, song_id: &str) -> Result<Option<SongMetadata>> {
        let url = self.song_url(song_id);
        debug!(%url, "fetching song metadata");

        let response = match self.agent.get(&url).call() {
            Ok(response) => response,
            Err(ureq::Error::Status(404, _)) => return Ok(None),
            Err(ureq::Error::Status(code, _)) => {
                return Err(anyhow::anyhow!(
                    "Metadata service returned status {} for song '{}'",
                    code,
                    song_id
                ));
            }
            Err(e) => return Err(anyhow::anyhow!("HTTP request failed: {}", e)),
        };

        let metadata: SongMetadata = response.into_json().map_err(|e| {
            anyhow::anyhow!("Failed to parse metadata for song '{}': {}", song_id, e)
        })?;

        Ok(Some(metadata))
    }
}

impl MetadataLookup for MetadataClient {
    fn lookup(&self, song_id: &str) -> Result<Option<SongMetadata>> {
        self.fetch_song(song_id)
    }
}
