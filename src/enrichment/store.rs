use crate::models::{EnrichedEvent, RawPlayEvent};
use anyhow::{Context, Result};
use std::io::Read;
use std::path::Path;
use tracing::info;

/// Read raw plays from a CSV file with a header row
pub fn read_plays_csv(path: &Path) -> Result<Vec<RawPlayEvent>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open plays file '{}'", path.display()))?;
    let plays = read_plays(file)?;
    info!(path = %path.display(), plays = plays.len(), "loaded raw plays");
    Ok(plays)
}

/// Parse raw plays from any CSV source
pub fn read_plays<R: Read>(source: R) -> Result<Vec<RawPlayEvent>> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(source);
    let mut plays = Vec::new();
    for (index, record) in reader.deserialize().enumerate() {
        // header is line 1
        let play: RawPlayEvent =
            record.with_context(|| format!("Invalid play on line {}", index + 2))?;
        plays.push(play);
    }
    Ok(plays)
}

/// Load the enriched event list from its JSON file
pub fn load_events(path: &Path) -> Result<Vec<EnrichedEvent>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read events file '{}'", path.display()))?;
    let events: Vec<EnrichedEvent> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse events file '{}'", path.display()))?;
    info!(path = %path.display(), events = events.len(), "loaded enriched events");
    Ok(events)
}

/// Write the enriched event list as pretty-printed JSON
pub fn save_events(path: &Path, events: &[EnrichedEvent]) -> Result<()> {
    let content = serde_json::to_string_pretty(events)?;
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write events file '{}'", path.display()))?;
    info!(path = %path.display(), events = events.len(), "saved enriched events");
    Ok(())
}
