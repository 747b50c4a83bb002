//! Define the show subcommand
use crate::config::Config;
use crate::tour::format_duration;
use crate::Error;
use structopt::StructOpt;

/// Show the details of a tour
#[derive(Debug, StructOpt)]
pub struct ShowOpts {
    /// ID of the tour (use list-tours command to see IDs)
    #[structopt(name = "TOUR_ID")]
    id: String,
    /// Print every recorded route point
    #[structopt(short, long)]
    points: bool,
}

pub fn show_command(config: Config, opts: ShowOpts) -> Result<(), Box<dyn std::error::Error>> {
    let storage = config.get_tour_storage_handler()?;
    let tour = match storage.get_tour(&opts.id)? {
        Some(tour) => tour,
        None => return Err(Box::new(Error::TourDoesNotExistError(opts.id))),
    };

    let format_time = |t: Option<chrono::DateTime<chrono::Utc>>| {
        t.map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "-".to_string())
    };
    println!("Tour {}", tour.id.as_deref().unwrap_or(&opts.id));
    println!("\tStart: {}", format_time(tour.start_time()));
    println!("\tEnd: {}", format_time(tour.end_time()));
    println!(
        "\tDistance: {:0.2} km, Duration: {}, Average speed: {:0.1} km/h",
        tour.distance,
        format_duration(tour.duration),
        tour.average_speed
    );
    println!("\tRoute points: {}", tour.route_points.len());
    if opts.points {
        for point in &tour.route_points {
            println!("\t * {:.6},{:.6}\t{}", point.lat, point.lng, format_time(point.time()));
        }
    }

    Ok(())
}
