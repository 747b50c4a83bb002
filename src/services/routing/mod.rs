//! Request driving routes between two locations from an external router
use crate::config::{FromServiceConfig, ServiceConfig};
use crate::gps::Location;
use crate::Error;
mod osrm;
pub use osrm::Osrm;

/// A driving route as returned by the routing service
#[derive(Clone, Debug, PartialEq)]
pub struct Route {
    /// route polyline from start to end
    pub coordinates: Vec<Location>,
    pub distance_m: f64,
    pub duration_s: f64,
}

/// trait that defines how a route between two locations is requested
pub trait RoutingService {
    /// Return the best route between the locations, Ok(None) if the router found none
    fn route(&self, start: &Location, end: &Location) -> Result<Option<Route>, Error>;
}

pub fn new_routing_handler(config: &ServiceConfig) -> Result<Box<dyn RoutingService>, Error> {
    match config.handler() {
        "osrm" => Ok(Box::new(Osrm::from_config(config)?)),
        _ => Err(Error::UnknownServiceHandler(format!(
            "no routing handler exists for: {}",
            config.handler()
        ))),
    }
}
