//! Slippy map tiles used to render the map background
use crate::config::{FromServiceConfig, ServiceConfig};
use crate::gps::Location;
use crate::Error;
use std::f64::consts::PI;
mod xyz;
pub use xyz::Xyz;

/// Web mercator cannot represent latitudes beyond this value
const MAX_LATITUDE: f64 = 85.051_128_78;

/// Address of a single tile in the xyz scheme
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tile {
    pub x: u32,
    pub y: u32,
    pub zoom: u8,
}

impl Tile {
    /// Return the tile containing the location at the given zoom level
    pub fn from_location(location: &Location, zoom: u8) -> Self {
        let n = 2f64.powi(zoom as i32);
        let lat = location.latitude().clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
        let x = ((location.longitude() + 180.0) / 360.0 * n).floor();
        let y = ((1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / PI) / 2.0 * n).floor();
        let max = n - 1.0;
        Tile {
            x: x.clamp(0.0, max) as u32,
            y: y.clamp(0.0, max) as u32,
            zoom,
        }
    }
}

/// trait that defines how map tiles are addressed and fetched
pub trait TileService {
    fn tile_url(&self, tile: &Tile) -> String;

    /// Download the image data of a tile
    fn fetch_tile(&self, tile: &Tile) -> Result<Vec<u8>, Error>;

    fn max_zoom(&self) -> u8;

    /// Tile containing the location, zoom is limited to what the provider serves
    fn tile_for(&self, location: &Location, zoom: u8) -> Tile {
        Tile::from_location(location, zoom.min(self.max_zoom()))
    }
}

pub fn new_tile_handler(
    config: &ServiceConfig,
    dark_mode: bool,
) -> Result<Box<dyn TileService>, Error> {
    match config.handler() {
        "xyz" => {
            let mut handler = Xyz::from_config(config)?;
            handler.set_dark_mode(dark_mode);
            Ok(Box::new(handler))
        }
        _ => Err(Error::UnknownServiceHandler(format!(
            "no map tile handler exists for: {}",
            config.handler()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiles_follow_slippy_map_numbering() {
        let zurich = Location::new(47.3769, 8.5472);
        assert_eq!(Tile::from_location(&zurich, 0), Tile { x: 0, y: 0, zoom: 0 });
        assert_eq!(
            Tile::from_location(&zurich, 13),
            Tile {
                x: 4290,
                y: 2868,
                zoom: 13
            }
        );
    }

    #[test]
    fn extreme_coordinates_stay_on_the_grid() {
        let pole = Tile::from_location(&Location::new(90.0, 180.0), 3);
        assert_eq!((pole.x, pole.y), (7, 0));
        let south = Tile::from_location(&Location::new(-90.0, -180.0), 3);
        assert_eq!((south.x, south.y), (0, 7));
    }
}
