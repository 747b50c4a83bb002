//! Define the record subcommand
use super::{open_fix_source, optional_tour_storage};
use crate::config::Config;
use crate::db::open_db_connection;
use crate::location::LocationWatch;
use crate::offline::{save_or_queue, SaveOutcome};
use crate::tour::{format_duration, Tour, TourRecorder};
use chrono::Utc;
use log::{info, trace, warn};
use std::path::PathBuf;
use structopt::StructOpt;

/// Record a tour from GPS fixes until the stream ends
#[derive(Debug, StructOpt)]
pub struct RecordOpts {
    /// File of "lat,lon[,timestamp_ms[,accuracy]]" lines, reads stdin if not provided or "-"
    #[structopt(short, long, parse(from_os_str))]
    input: Option<PathBuf>,
}

pub fn record_command(
    config: Config,
    opts: RecordOpts,
) -> Result<(), Box<dyn std::error::Error>> {
    let source = open_fix_source(opts.input.as_deref())?;
    let watch = LocationWatch::start(source);
    info!("Recording started");

    let mut recorder = TourRecorder::new();
    for position in watch {
        trace!("Recorded fix {:?}", position.location);
        recorder.record(&position);
    }

    match recorder.finish(Utc::now()) {
        Some(tour) => save_tour(&config, &tour),
        None => {
            warn!("No fixes were recorded, nothing to save");
            Ok(())
        }
    }
}

/// Print a summary of the finished tour and hand it to the backend or the offline queue
pub(super) fn save_tour(config: &Config, tour: &Tour) -> Result<(), Box<dyn std::error::Error>> {
    println!(
        "Distance: {:.2} km, Duration: {}, Average speed: {:.1} km/h",
        tour.distance,
        format_duration(tour.duration),
        tour.average_speed
    );
    let conn = open_db_connection()?;
    let storage = optional_tour_storage(config);
    match save_or_queue(&conn, storage.as_deref(), tour)? {
        SaveOutcome::Saved(stored) => {
            println!("Saved tour {}", stored.id.as_deref().unwrap_or("-"))
        }
        SaveOutcome::Queued => println!("Tour queued, run `moto-track sync` to upload it later"),
    }
    Ok(())
}
