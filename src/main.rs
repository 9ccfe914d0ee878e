use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod analytics;
mod client;
mod config;
mod enrichment;
mod models;
mod report;

use crate::analytics::AnalyticsEngine;
use crate::client::MetadataClient;
use crate::config::load_config;
use crate::enrichment::MetadataLookup;
use crate::models::{EnrichedEvent, parse_range_bound};
use crate::report::ReportFormatter;

const DEFAULT_EVENTS_FILE: &str = "enriched_events.json";

#[derive(Parser)]
#[command(name = "stream-royalties")]
#[command(about = "Streaming play analytics: top songs, listening timelines and artist payouts")]
#[command(version)]
struct Args {
    /// Quiet mode - only log warnings and errors
    #[arg(short = 'q', long = "quiet", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Join raw plays with song metadata and write the enriched events file
    Enrich {
        /// CSV of raw plays (userId,songId,timestamp,durationMs)
        #[arg(long)]
        plays: PathBuf,

        /// Where to write the enriched events JSON
        #[arg(short = 'o', long = "out", default_value = DEFAULT_EVENTS_FILE)]
        out: PathBuf,
    },
    /// Most played songs within a date range (bounds inclusive)
    TopSongs {
        #[command(flatten)]
        source: EventSource,

        /// Range start, YYYY-MM-DD or RFC 3339
        #[arg(long)]
        start: String,

        /// Range end, YYYY-MM-DD (whole day included) or RFC 3339
        #[arg(long)]
        end: String,

        /// Number of songs to list
        #[arg(short = 'n', long = "count", default_value_t = 10)]
        n: usize,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Top song and artist per month for one user
    Timeline {
        #[command(flatten)]
        source: EventSource,

        #[arg(long = "user")]
        user_id: String,

        /// Number of calendar months ending with the latest play
        #[arg(long, default_value_t = 6)]
        months: u32,

        #[arg(long)]
        json: bool,
    },
    /// Royalty owed to an artist over recent calendar months
    Payout {
        #[command(flatten)]
        source: EventSource,

        /// Artist name, matched case-insensitively
        #[arg(long)]
        artist: String,

        #[arg(long, default_value_t = 1)]
        months: u32,

        #[arg(long)]
        json: bool,
    },
}

/// Where a query reads its events from
#[derive(clap::Args)]
struct EventSource {
    /// Enriched events JSON file
    #[arg(long, conflicts_with = "plays")]
    events: Option<PathBuf>,

    /// Raw plays CSV, enriched on demand and cached
    #[arg(long)]
    plays: Option<PathBuf>,

    /// Enriched events cache used with --plays
    #[arg(long, default_value = DEFAULT_EVENTS_FILE)]
    cache: PathBuf,

    /// Re-enrich even if the cache exists
    #[arg(long)]
    refresh: bool,
}

impl EventSource {
    fn load(&self) -> Result<Vec<EnrichedEvent>> {
        if let Some(events) = &self.events {
            return enrichment::load_events(events);
        }
        match &self.plays {
            Some(plays) if self.refresh || !self.cache.exists() => {
                info!(cache = %self.cache.display(), "enriching plays");
                enrich_to_file(plays, &self.cache)
            }
            Some(_) => {
                info!(cache = %self.cache.display(), "reusing enriched events cache");
                enrichment::load_events(&self.cache)
            }
            None => enrichment::load_events(&self.cache),
        }
    }
}

fn enrich_to_file(plays: &Path, out: &Path) -> Result<Vec<EnrichedEvent>> {
    let client = MetadataClient::new(load_config()?);
    enrich_with(&client, plays, out)
}

/// Enrich a plays CSV and write the events file. Stdout is left to the
/// report so `--json` output stays parseable.
fn enrich_with(
    lookup: &dyn MetadataLookup,
    plays: &Path,
    out: &Path,
) -> Result<Vec<EnrichedEvent>> {
    let plays = enrichment::read_plays_csv(plays)?;
    let outcome = enrichment::enrich_plays(lookup, plays)?;
    enrichment::save_events(out, &outcome.events)?;
    if outcome.dropped > 0 {
        warn!(dropped = outcome.dropped, "plays dropped for missing metadata");
    }
    Ok(outcome.events)
}

fn init_logging(quiet: bool) {
    let default_filter = if quiet {
        "stream_royalties=warn"
    } else {
        "stream_royalties=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn print_lines(lines: Vec<String>) {
    for line in lines {
        println!("{line}");
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.quiet);

    match args.command {
        Command::Enrich { plays, out } => {
            let events = enrich_to_file(&plays, &out)?;
            println!("Wrote {} enriched events to {}", events.len(), out.display());
        }
        Command::TopSongs {
            source,
            start,
            end,
            n,
            json,
        } => {
            let start = parse_range_bound(&start, false)?;
            let end = parse_range_bound(&end, true)?;
            let events = source.load()?;
            let ranked = AnalyticsEngine::rank_songs(&events, start, end, n);
            print_lines(if json {
                ReportFormatter::json(&ranked)?
            } else {
                ReportFormatter::top_songs(&ranked)
            });
        }
        Command::Timeline {
            source,
            user_id,
            months,
            json,
        } => {
            let events = source.load()?;
            let timeline = AnalyticsEngine::timeline(&events, &user_id, months);
            print_lines(if json {
                ReportFormatter::json(&timeline)?
            } else {
                ReportFormatter::timeline(&user_id, months, &timeline)
            });
        }
        Command::Payout {
            source,
            artist,
            months,
            json,
        } => {
            let events = source.load()?;
            let payout = AnalyticsEngine::payout(&events, &artist, months);
            print_lines(if json {
                ReportFormatter::json(&payout)?
            } else {
                ReportFormatter::payout(&payout)
            });
        }
    }

    Ok(())
}
