//! Define the application's command line interface
use crate::config::Config;
use crate::gps::{parse_coordinates, Location};
use crate::location::{FixReader, PositionSource};
use crate::services::{GeocodingService, TourStorage};
use crate::Error;
use log::{debug, error, warn};
use simplelog::LevelFilter;
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};
use structopt::StructOpt;

mod delete;
use delete::{delete_command, DeleteOpts};
mod geocode;
use geocode::{geocode_command, GeocodeOpts};
mod list_tours;
use list_tours::{list_tours_command, ListToursOpts};
mod navigate;
use navigate::{navigate_command, NavigateOpts};
mod record;
use record::{record_command, RecordOpts};
mod route;
use route::{route_command, RouteOpts};
mod show;
use show::{show_command, ShowOpts};
mod stats;
use stats::{stats_command, StatsOpts};
mod sync;
use sync::{sync_command, SyncOpts};
mod tile;
use tile::{tile_command, TileOpts};

/// Record, navigate and review motorcycle tours
#[derive(Debug, StructOpt)]
#[structopt(name = "moto-track")]
pub struct Cli {
    /// Set logging level to debug, use a second time (e.g. -vv) to set logging to trace
    #[structopt(short, long, parse(from_occurrences))]
    verbose: i32,
    /// Suppress info logging messages use a second time (e.g. -qq) to hide warnings
    #[structopt(short, long, parse(from_occurrences))]
    quiet: i32,
    #[structopt(subcommand)]
    cmd: Command,
}

impl Cli {
    /// Return the verbose flag counts as a log level filter
    pub fn verbosity(&self, default: LevelFilter) -> LevelFilter {
        if self.quiet == 1 {
            LevelFilter::Warn
        } else if self.quiet > 1 {
            LevelFilter::Error
        } else if self.verbose == 1 {
            LevelFilter::Debug
        } else if self.verbose > 1 {
            LevelFilter::Trace
        } else {
            default
        }
    }

    /// Consume options struct and return the result of subcommand execution
    pub fn execute_subcommand(self, config: Config) -> Result<(), Box<dyn std::error::Error>> {
        self.cmd.execute(config)
    }
}

#[derive(Debug, StructOpt)]
pub enum Command {
    /// Delete a tour from the backend
    #[structopt(name = "delete")]
    Delete(DeleteOpts),
    /// Look up the coordinates of an address
    #[structopt(name = "geocode")]
    Geocode(GeocodeOpts),
    /// List tours stored in the backend
    #[structopt(name = "list-tours")]
    ListTours(ListToursOpts),
    /// Follow a route to a destination while recording the ride
    #[structopt(name = "navigate")]
    Navigate(NavigateOpts),
    /// Record a tour from a stream of GPS fixes
    #[structopt(name = "record")]
    Record(RecordOpts),
    /// Plan a driving route between two places
    #[structopt(name = "route")]
    Route(RouteOpts),
    /// Show the details of a single tour
    #[structopt(name = "show")]
    Show(ShowOpts),
    /// Show distance and speed statistics of stored tours
    #[structopt(name = "stats")]
    Stats(StatsOpts),
    /// Upload tours that were queued while the backend was unreachable
    #[structopt(name = "sync")]
    Sync(SyncOpts),
    /// Download the map tile covering a position
    #[structopt(name = "tile")]
    Tile(TileOpts),
}

impl Command {
    /// Consume enum variant and return the result of the command's execution
    fn execute(self, config: Config) -> Result<(), Box<dyn std::error::Error>> {
        match self {
            Command::Delete(opts) => delete_command(config, opts),
            Command::Geocode(opts) => geocode_command(config, opts),
            Command::ListTours(opts) => list_tours_command(config, opts),
            Command::Navigate(opts) => navigate_command(config, opts),
            Command::Record(opts) => record_command(config, opts),
            Command::Route(opts) => route_command(config, opts),
            Command::Show(opts) => show_command(config, opts),
            Command::Stats(opts) => stats_command(config, opts),
            Command::Sync(opts) => sync_command(config, opts),
            Command::Tile(opts) => tile_command(config, opts),
        }
    }
}

fn parse_month(src: &str) -> Result<u32, String> {
    match src.parse::<u32>() {
        Ok(month) if (1..=12).contains(&month) => Ok(month),
        _ => Err(format!("month must be a number from 1 to 12, got '{}'", src)),
    }
}

/// Resolve a command line place, either literal `lat,lon` coordinates or an address
fn resolve_place(geocoder: &dyn GeocodingService, place: &str) -> Option<Location> {
    if let Some(location) = parse_coordinates(place) {
        return Some(location);
    }
    match geocoder.geocode(place) {
        Ok(Some(result)) => {
            debug!("Resolved '{}' to {}", place, result.display_name);
            Some(result.location())
        }
        Ok(None) => {
            warn!("No geocoding result for '{}'", place);
            None
        }
        Err(e) => {
            error!("Error geocoding '{}': {}", place, e);
            None
        }
    }
}

/// Read fixes from the file, or stdin if none is given or "-" is used
fn open_fix_source(input: Option<&Path>) -> Result<Box<dyn PositionSource + Send>, Error> {
    match input {
        Some(path) if path.to_string_lossy() != "-" => {
            Ok(Box::new(FixReader::new(BufReader::new(File::open(path)?))))
        }
        _ => Ok(Box::new(FixReader::new(BufReader::new(io::stdin())))),
    }
}

/// The backend is optional for recording, tours are queued without one
fn optional_tour_storage(config: &Config) -> Option<Box<dyn TourStorage>> {
    match config.get_tour_storage_handler() {
        Ok(storage) => Some(storage),
        Err(e) => {
            warn!("Tour storage unavailable: {}", e);
            None
        }
    }
}

/// Write data to the file, if no path is provided or "-" is used data is written to stdout
fn write_output(path: Option<PathBuf>, data: &[u8]) -> io::Result<()> {
    match path {
        Some(path) if path.to_string_lossy() != "-" => {
            let mut fp = File::create(path)?;
            fp.write_all(data)
        }
        _ => write_to_stdout(data),
    }
}

fn write_to_stdout(data: &[u8]) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    handle.write_all(data)
}
