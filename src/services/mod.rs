//! Service module that exports interfaces to external applications, APIs, etc.
use crate::Error;
use reqwest::blocking::Client;
use std::time::Duration;

pub mod geocoding;
pub mod routing;
pub mod storage;
pub mod tiles;

// rexport some traits and utilty functions
pub use geocoding::{new_geocoding_handler, GeocodingResult, GeocodingService};
pub use routing::{new_routing_handler, Route, RoutingService};
pub use storage::{new_tour_storage_handler, TourStorage};
pub use tiles::{new_tile_handler, Tile, TileService};

/// User agent sent with every request, public OSM services reject anonymous clients
pub const DEFAULT_USER_AGENT: &str = concat!("moto-track/", env!("CARGO_PKG_VERSION"));

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Build a blocking client, a timeout of zero disables the request timeout
fn http_client(user_agent: &str, timeout_secs: u64) -> Result<Client, Error> {
    let timeout = if timeout_secs > 0 {
        Some(Duration::from_secs(timeout_secs))
    } else {
        None
    };
    Ok(Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .build()?)
}
