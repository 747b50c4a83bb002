//! Store application configuration that gets read from disk
use crate::gps::Location;
use crate::navigation::{DEFAULT_ARRIVAL_RADIUS_M, DEFAULT_OFF_ROUTE_THRESHOLD_M};
use crate::services::{
    new_geocoding_handler, new_routing_handler, new_tile_handler, new_tour_storage_handler,
    GeocodingService, RoutingService, TileService, TourStorage,
};
use crate::Error;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_yaml::Value;
use simplelog::LevelFilter;
use std::collections::HashMap;
use std::io::prelude::*;
use std::str::FromStr;

/// Defines the allowed keys under the services map
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceType {
    Geocoding,
    MapTiles,
    Routing,
    TourStorage,
}

/// Type alias for clarity
pub type ServiceParameters = HashMap<String, Value>;

/// Configuration options for a single service of any type
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServiceConfig {
    handler: String,
    #[serde(default)]
    configuration: ServiceParameters,
}

impl ServiceConfig {
    pub fn new(handler: &str) -> Self {
        ServiceConfig {
            handler: handler.to_string(),
            configuration: HashMap::new(),
        }
    }

    pub fn handler(&self) -> &str {
        &self.handler
    }

    pub fn parameters(&self) -> impl Iterator<Item = &String> + '_ {
        self.configuration.keys()
    }

    pub fn get_parameter(&self, key: &str) -> Option<&Value> {
        self.configuration.get(key)
    }

    pub fn set_parameter(&mut self, key: &str, value: Value) {
        self.configuration.insert(key.to_string(), value);
    }

    pub fn get_parameter_as_string(&self, key: &str) -> Option<Result<String, Error>> {
        self.configuration.get(key).map(|value| {
            value
                .as_str()
                .map(|v| v.to_string())
                .ok_or_else(|| self.invalid_value(key, "a string", value))
        })
    }

    pub fn get_parameter_as_i64(&self, key: &str) -> Option<Result<i64, Error>> {
        self.configuration.get(key).map(|value| {
            value
                .as_i64()
                .ok_or_else(|| self.invalid_value(key, "an integer", value))
        })
    }

    pub fn get_parameter_as_f64(&self, key: &str) -> Option<Result<f64, Error>> {
        self.configuration.get(key).map(|value| {
            value
                .as_f64()
                .ok_or_else(|| self.invalid_value(key, "a floating point value", value))
        })
    }

    pub fn get_parameter_as_bool(&self, key: &str) -> Option<Result<bool, Error>> {
        self.configuration.get(key).map(|value| {
            value
                .as_bool()
                .ok_or_else(|| self.invalid_value(key, "a boolean", value))
        })
    }

    fn invalid_value(&self, key: &str, expected: &str, value: &Value) -> Error {
        Error::InvalidConfigurationValue(format!(
            "invalid value for {}.{}, expected {}: {:?}",
            &self.handler, key, expected, value
        ))
    }
}

/// Create a service handler from a config entry, implemented with `#[derive(FromServiceConfig)]`
pub trait FromServiceConfig: Sized {
    fn from_config(config: &ServiceConfig) -> Result<Self, Error>;
}

/// Thresholds applied while following a planned route
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    pub off_route_threshold_m: f64,
    pub arrival_radius_m: f64,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        NavigationConfig {
            off_route_threshold_m: DEFAULT_OFF_ROUTE_THRESHOLD_M,
            arrival_radius_m: DEFAULT_ARRIVAL_RADIUS_M,
        }
    }
}

/// Configuration struct that we can create from the config file used
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(
        deserialize_with = "deserialize_level_filter",
        serialize_with = "serialize_level_filter"
    )]
    log_level: LevelFilter,
    dark_mode: bool,
    default_position: Location,
    navigation: NavigationConfig,
    services: HashMap<ServiceType, ServiceConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            log_level: default_level_filter(),
            dark_mode: false,
            // Zürich
            default_position: Location::new(47.3769, 8.5472),
            navigation: NavigationConfig::default(),
            services: HashMap::new(),
        }
    }
}

impl Config {
    pub fn load<T: Read>(source: &mut T) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_reader(source)
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn dark_mode(&self) -> bool {
        self.dark_mode
    }

    pub fn default_position(&self) -> Location {
        self.default_position
    }

    pub fn navigation(&self) -> &NavigationConfig {
        &self.navigation
    }

    pub fn set_service(&mut self, service: ServiceType, config: ServiceConfig) {
        self.services.insert(service, config);
    }

    fn service_config(&self, service: ServiceType, default_handler: &str) -> ServiceConfig {
        self.services
            .get(&service)
            .cloned()
            .unwrap_or_else(|| ServiceConfig::new(default_handler))
    }

    pub fn get_geocoding_handler(&self) -> Result<Box<dyn GeocodingService>, Error> {
        new_geocoding_handler(&self.service_config(ServiceType::Geocoding, "nominatim"))
    }

    pub fn get_routing_handler(&self) -> Result<Box<dyn RoutingService>, Error> {
        new_routing_handler(&self.service_config(ServiceType::Routing, "osrm"))
    }

    pub fn get_tile_handler(&self) -> Result<Box<dyn TileService>, Error> {
        new_tile_handler(&self.service_config(ServiceType::MapTiles, "xyz"), self.dark_mode)
    }

    pub fn get_tour_storage_handler(&self) -> Result<Box<dyn TourStorage>, Error> {
        match self.services.get(&ServiceType::TourStorage) {
            Some(cfg) => new_tour_storage_handler(cfg),
            None => Err(Error::UnknownServiceHandler(
                "no service configuration defined for tour storage".to_string(),
            )),
        }
    }
}

fn deserialize_level_filter<'de, D>(deserializer: D) -> Result<LevelFilter, D::Error>
where
    D: Deserializer<'de>,
{
    let buf = String::deserialize(deserializer)?;
    LevelFilter::from_str(&buf)
        .map_err(|_| serde::de::Error::custom(format!("invalid level value: {}", buf)))
}

fn serialize_level_filter<S>(level: &LevelFilter, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&level.to_string())
}

fn default_level_filter() -> LevelFilter {
    LevelFilter::Info
}
