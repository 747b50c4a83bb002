//! Define the tile subcommand
use super::write_output;
use crate::config::Config;
use crate::gps::{parse_coordinates, Location};
use log::{error, info};
use std::path::PathBuf;
use structopt::clap::AppSettings;
use structopt::StructOpt;

fn parse_location(src: &str) -> Result<Location, String> {
    parse_coordinates(src).ok_or_else(|| format!("expected \"lat,lon\", got '{}'", src))
}

/// Download the map tile covering a position
#[derive(Debug, StructOpt)]
#[structopt(setting = AppSettings::AllowLeadingHyphen)]
pub struct TileOpts {
    /// Position as "lat,lon", defaults to the configured default position
    #[structopt(
        name = "LAT,LON",
        allow_hyphen_values = true,
        parse(try_from_str = parse_location)
    )]
    position: Option<Location>,
    /// Zoom level, limited to the maximum the tile provider serves
    #[structopt(short, long, default_value = "13")]
    zoom: u8,
    /// file to write the tile image to, if not provided or "-" is used data is written to stdout
    #[structopt(short, long, parse(from_os_str))]
    output: Option<PathBuf>,
}

pub fn tile_command(
    config: Config,
    opts: TileOpts,
) -> Result<(), Box<dyn std::error::Error>> {
    let tiles = config.get_tile_handler()?;
    let position = opts.position.unwrap_or_else(|| config.default_position());
    let tile = tiles.tile_for(&position, opts.zoom);
    info!("Fetching tile {}/{}/{}", tile.zoom, tile.x, tile.y);

    match tiles.fetch_tile(&tile) {
        Ok(data) => write_output(opts.output, &data)?,
        Err(e) => error!("Error loading map tile {}: {}", tiles.tile_url(&tile), e),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_latitudes_are_positions() {
        let opts = TileOpts::from_iter_safe(&["tile", "-33.8568,151.2153", "-z", "15"]).unwrap();
        assert_eq!(opts.position, Some(Location::new(-33.8568, 151.2153)));
        assert_eq!(opts.zoom, 15);

        let opts = TileOpts::from_iter_safe(&["tile"]).unwrap();
        assert_eq!(opts.position, None);
        assert!(TileOpts::from_iter_safe(&["tile", "-91.0,8.0"]).is_err());
    }
}
