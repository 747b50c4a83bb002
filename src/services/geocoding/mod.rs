//! Resolve free form addresses into coordinates using an external geocoder
use crate::config::{FromServiceConfig, ServiceConfig};
use crate::gps::Location;
use crate::Error;
mod nominatim;
pub use nominatim::Nominatim;

/// Best match returned for an address search
#[derive(Clone, Debug, PartialEq)]
pub struct GeocodingResult {
    pub lat: f64,
    pub lon: f64,
    pub display_name: String,
}

impl GeocodingResult {
    pub fn location(&self) -> Location {
        Location::new(self.lat, self.lon)
    }
}

/// trait that defines how an address is turned into a location
pub trait GeocodingService {
    /// Return the best match for the address, Ok(None) if nothing matched
    fn geocode(&self, address: &str) -> Result<Option<GeocodingResult>, Error>;
}

pub fn new_geocoding_handler(config: &ServiceConfig) -> Result<Box<dyn GeocodingService>, Error> {
    match config.handler() {
        "nominatim" => Ok(Box::new(Nominatim::from_config(config)?)),
        _ => Err(Error::UnknownServiceHandler(format!(
            "no geocoding handler exists for: {}",
            config.handler()
        ))),
    }
}
