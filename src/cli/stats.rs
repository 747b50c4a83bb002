//! Define the stats subcommand
use crate::config::Config;
use crate::stats::{available_years, filter_by_year, monthly_distance, TourStatistics};
use chrono::{Datelike, Utc};
use structopt::StructOpt;

static MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Show distance, time and speed statistics for a year
#[derive(Debug, StructOpt)]
pub struct StatsOpts {
    /// Year to summarize, defaults to the current year
    #[structopt(short, long)]
    year: Option<i32>,
}

pub fn stats_command(
    config: Config,
    opts: StatsOpts,
) -> Result<(), Box<dyn std::error::Error>> {
    let storage = config.get_tour_storage_handler()?;
    let tours = storage.list_tours()?;
    let year = opts.year.unwrap_or_else(|| Utc::now().year());

    let stats = TourStatistics::from_tours(&filter_by_year(&tours, year));
    println!("Statistics for {}", year);
    println!("\tTours: {}", stats.tour_count);
    println!("\tTotal distance: {:0.2} km", stats.total_distance_km);
    println!("\tTotal time: {:0.2} h", stats.total_hours);
    println!("\tAverage distance: {:0.2} km", stats.mean_distance_km);
    println!("\tAverage speed: {:0.2} km/h", stats.mean_average_speed);
    println!("\tTop average speed: {:0.2} km/h", stats.max_average_speed);

    println!("Monthly distance [km]");
    for (name, distance) in MONTHS.iter().zip(monthly_distance(&tours, year).iter()) {
        println!("\t{}: {:0.2}", name, distance);
    }

    let years: Vec<String> = available_years(&tours, Utc::now().year())
        .iter()
        .map(|y| y.to_string())
        .collect();
    println!("Years with tours: {}", years.join(", "));

    Ok(())
}
