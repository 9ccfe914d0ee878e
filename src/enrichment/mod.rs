pub mod cache;
pub mod enricher;
pub mod store;

pub use cache::*;
pub use enricher::*;
pub use store::*;

use crate::models::SongMetadata;
use anyhow::Result;

/// Key-value lookup of song metadata by song id.
///
/// `Ok(None)` means the song is unknown; errors are reserved for the
/// lookup itself failing.
#[cfg_attr(test, mockall::automock)]
pub trait MetadataLookup {
    fn lookup(&self, song_id: &str) -> Result<Option<SongMetadata>>;
}
