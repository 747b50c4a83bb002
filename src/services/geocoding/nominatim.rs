//! Geocode addresses using the OpenStreetMap Nominatim search API
use super::{GeocodingResult, GeocodingService};
use crate::services::{http_client, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT};
use crate::Error;
use log::{debug, warn};
use moto_track_derive::FromServiceConfig;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct SearchResult {
    lat: String,
    lon: String,
    display_name: String,
}

/// Defines the connection parameters to search an instance of Nominatim
#[derive(Clone, Debug, FromServiceConfig)]
pub struct Nominatim {
    base_url: String,
    user_agent: String,
    timeout_secs: u64,
}

impl Nominatim {
    pub fn new(base_url: String) -> Self {
        Nominatim {
            base_url,
            ..Default::default()
        }
    }

    fn request_url(&self) -> String {
        format!("{}/search", self.base_url.trim_end_matches('/'))
    }
}

impl Default for Nominatim {
    fn default() -> Self {
        Nominatim {
            base_url: "https://nominatim.openstreetmap.org".to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl GeocodingService for Nominatim {
    fn geocode(&self, address: &str) -> Result<Option<GeocodingResult>, Error> {
        let client = http_client(&self.user_agent, self.timeout_secs)?;
        debug!("Geocoding address '{}' with {}", address, self.request_url());
        let resp = client
            .get(&self.request_url())
            .query(&[("format", "json"), ("q", address)])
            .send()?;
        if resp.status().is_success() {
            let results: Vec<SearchResult> = resp.json()?;
            first_result(results)
        } else {
            let code = resp.status();
            Err(Error::RequestError(
                code,
                "Nominatim search failed".to_string(),
            ))
        }
    }
}

/// Convert the first search hit, nominatim returns coordinates as strings
fn first_result(results: Vec<SearchResult>) -> Result<Option<GeocodingResult>, Error> {
    let first = match results.into_iter().next() {
        Some(first) => first,
        None => return Ok(None),
    };
    let parse = |value: &str| {
        value.parse::<f64>().map_err(|_| {
            warn!("Nominatim returned an invalid coordinate: {}", value);
            Error::Other(format!("invalid coordinate in geocoding result: {}", value))
        })
    };
    Ok(Some(GeocodingResult {
        lat: parse(&first.lat)?,
        lon: parse(&first.lon)?,
        display_name: first.display_name,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FromServiceConfig, ServiceConfig};

    #[test]
    fn first_hit_is_parsed() {
        let body = r#"[
            {"place_id": 1, "lat": "47.3768866", "lon": "8.5416940", "display_name": "Zürich, Schweiz"},
            {"place_id": 2, "lat": "47.0", "lon": "8.0", "display_name": "Somewhere else"}
        ]"#;
        let results: Vec<SearchResult> = serde_json::from_str(body).unwrap();
        let result = first_result(results).unwrap().unwrap();
        assert_eq!(result.lat, 47.3768866);
        assert_eq!(result.lon, 8.541694);
        assert_eq!(result.display_name, "Zürich, Schweiz");
    }

    #[test]
    fn no_hits_is_none() {
        assert_eq!(first_result(Vec::new()).unwrap(), None);
    }

    #[test]
    fn garbage_coordinates_are_errors() {
        let results = vec![SearchResult {
            lat: "north".to_string(),
            lon: "8.0".to_string(),
            display_name: String::new(),
        }];
        assert!(first_result(results).is_err());
    }

    #[test]
    fn handler_reads_its_config() {
        let mut cfg = ServiceConfig::new("nominatim");
        cfg.set_parameter("base_url", "http://localhost:8080/".into());
        cfg.set_parameter("timeout_secs", 5.into());
        let nominatim = Nominatim::from_config(&cfg).unwrap();
        assert_eq!(nominatim.request_url(), "http://localhost:8080/search");
        assert_eq!(nominatim.timeout_secs, 5);
        assert_eq!(nominatim.user_agent, DEFAULT_USER_AGENT);
    }
}
