//! Define the geocode subcommand
use crate::config::Config;
use crate::Error;
use structopt::StructOpt;

/// Look up the coordinates of an address
#[derive(Debug, StructOpt)]
pub struct GeocodeOpts {
    /// Free form address, e.g. "Bundesplatz 3, Bern"
    #[structopt(name = "ADDRESS")]
    address: String,
}

pub fn geocode_command(
    config: Config,
    opts: GeocodeOpts,
) -> Result<(), Box<dyn std::error::Error>> {
    let geocoder = config.get_geocoding_handler()?;
    match geocoder.geocode(&opts.address)? {
        Some(result) => {
            println!("{:.6},{:.6}\t{}", result.lat, result.lon, result.display_name);
            Ok(())
        }
        None => Err(Box::new(Error::Other(format!(
            "No location found for '{}'",
            opts.address
        )))),
    }
}
