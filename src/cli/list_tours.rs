//! Define the list-tours subcommand
use super::parse_month;
use crate::config::Config;
use crate::stats::{filter_by_month, filter_by_year};
use crate::tour::{format_duration, Tour};
use structopt::StructOpt;

/// List tours stored in the backend, newest first
#[derive(Debug, StructOpt)]
pub struct ListToursOpts {
    /// Only list tours from this year
    #[structopt(short, long)]
    year: Option<i32>,
    /// Only list tours from this month (1-12), requires --year
    #[structopt(short, long, requires = "year", parse(try_from_str = parse_month))]
    month: Option<u32>,
    /// Reverse tour ordering to be old -> new
    #[structopt(short, long)]
    reverse: bool,
    /// Limit results returned to "N" entries
    #[structopt(short, long)]
    number: Option<usize>,
}

pub fn list_tours_command(
    config: Config,
    opts: ListToursOpts,
) -> Result<(), Box<dyn std::error::Error>> {
    let storage = config.get_tour_storage_handler()?;
    let tours = storage.list_tours()?;

    let mut selected: Vec<&Tour> = match (opts.year, opts.month) {
        (Some(year), Some(month)) => filter_by_month(&tours, year, month),
        (Some(year), None) => filter_by_year(&tours, year),
        _ => tours.iter().collect(),
    };
    if opts.reverse {
        selected.reverse();
    }
    if let Some(number) = opts.number {
        selected.truncate(number);
    }

    println!("Date\t\tDistance[km]\tDuration\tSpeed[km/h]\tID");
    for tour in selected {
        println!(
            "{}\t{:0.2}\t\t{}\t\t{:0.1}\t\t{}",
            tour.start_time()
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "-".to_string()),
            tour.distance,
            format_duration(tour.duration),
            tour.average_speed,
            tour.id.as_deref().unwrap_or("-")
        );
    }

    Ok(())
}
