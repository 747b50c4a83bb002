//! Define the route subcommand
use super::{resolve_place, write_output};
use crate::config::Config;
use crate::tour::format_duration;
use log::error;
use serde_json::json;
use std::path::PathBuf;
use structopt::clap::AppSettings;
use structopt::StructOpt;

/// Request a driving route and print its length and duration
#[derive(Debug, StructOpt)]
#[structopt(setting = AppSettings::AllowLeadingHyphen)]
pub struct RouteOpts {
    /// Start of the route as an address or "lat,lon"
    #[structopt(name = "FROM", allow_hyphen_values = true)]
    from: String,
    /// End of the route as an address or "lat,lon"
    #[structopt(name = "TO", allow_hyphen_values = true)]
    to: String,
    /// write the route as a GeoJSON LineString to this file, "-" writes to stdout
    #[structopt(short, long, parse(from_os_str))]
    output: Option<PathBuf>,
}

pub fn route_command(
    config: Config,
    opts: RouteOpts,
) -> Result<(), Box<dyn std::error::Error>> {
    let geocoder = config.get_geocoding_handler()?;
    let router = config.get_routing_handler()?;

    let (start, end) = match (
        resolve_place(geocoder.as_ref(), &opts.from),
        resolve_place(geocoder.as_ref(), &opts.to),
    ) {
        (Some(start), Some(end)) => (start, end),
        _ => {
            error!("Could not resolve both route endpoints, no route to show");
            return Ok(());
        }
    };

    let route = match router.route(&start, &end) {
        Ok(Some(route)) => route,
        Ok(None) => {
            error!("No route found from '{}' to '{}'", opts.from, opts.to);
            return Ok(());
        }
        Err(e) => {
            error!("Error fetching route: {}", e);
            return Ok(());
        }
    };

    println!(
        "Distance: {:.1} km, Duration: {}, Points: {}",
        route.distance_m / 1000.0,
        format_duration(route.duration_s),
        route.coordinates.len()
    );
    if opts.output.is_some() {
        let coordinates: Vec<[f64; 2]> = route
            .coordinates
            .iter()
            .map(|loc| [loc.longitude(), loc.latitude()])
            .collect();
        let geojson = json!({
            "type": "LineString",
            "coordinates": coordinates,
        });
        write_output(opts.output, serde_json::to_string_pretty(&geojson)?.as_bytes())?;
    }

    Ok(())
}
