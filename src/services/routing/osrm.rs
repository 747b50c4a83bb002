//! Request routes from an OSRM server using the version 1 route API
use super::{Route, RoutingService};
use crate::gps::Location;
use crate::services::{http_client, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT};
use crate::Error;
use log::{debug, error};
use moto_track_derive::FromServiceConfig;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Geometry {
    /// GeoJSON ordering, [longitude, latitude]
    coordinates: Vec<[f64; 2]>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    geometry: Geometry,
    distance: f64,
    duration: f64,
}

#[derive(Debug, Deserialize)]
struct RouteResponse {
    code: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

/// Defines the connection parameters to request routes from an OSRM instance
#[derive(Clone, Debug, FromServiceConfig)]
pub struct Osrm {
    base_url: String,
    profile: String,
    user_agent: String,
    timeout_secs: u64,
}

impl Osrm {
    pub fn new(base_url: String, profile: String) -> Self {
        Osrm {
            base_url,
            profile,
            ..Default::default()
        }
    }

    fn request_url(&self, start: &Location, end: &Location) -> String {
        format!(
            "{}/route/v1/{}/{},{};{},{}",
            self.base_url.trim_end_matches('/'),
            self.profile,
            start.longitude(),
            start.latitude(),
            end.longitude(),
            end.latitude()
        )
    }
}

impl Default for Osrm {
    fn default() -> Self {
        Osrm {
            base_url: "https://router.project-osrm.org".to_string(),
            profile: "driving".to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl RoutingService for Osrm {
    fn route(&self, start: &Location, end: &Location) -> Result<Option<Route>, Error> {
        let client = http_client(&self.user_agent, self.timeout_secs)?;
        let request_url = self.request_url(start, end);
        debug!("Requesting route: {}", request_url);
        let resp = client
            .get(&request_url)
            .query(&[("overview", "full"), ("geometries", "geojson")])
            .send()?;

        // OSRM reports failures like NoRoute as JSON with a 4xx status code
        let code = resp.status();
        let body = resp.text()?;
        match serde_json::from_str::<RouteResponse>(&body) {
            Ok(json) => Ok(route_from_response(json)),
            Err(e) if code.is_success() => Err(Error::Json(e)),
            Err(_) => Err(Error::RequestError(code, body)),
        }
    }
}

fn route_from_response(json: RouteResponse) -> Option<Route> {
    if json.code != "Ok" {
        error!(
            "OSRM error code: {} {}",
            json.code,
            json.message.unwrap_or_default()
        );
        return None;
    }
    let route = json.routes.into_iter().next()?;
    debug!(
        "Route geometry coordinates count: {}",
        route.geometry.coordinates.len()
    );
    Some(Route {
        coordinates: route
            .geometry
            .coordinates
            .into_iter()
            .map(|[lon, lat]| Location::new(lat, lon))
            .collect(),
        distance_m: route.distance,
        duration_s: route.duration,
    })
}
