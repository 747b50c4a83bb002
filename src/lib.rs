//! Record motorcycle tours from GPS fixes, navigate planned routes and keep a tour history
pub mod cli;
pub mod config;
pub mod db;
mod error;
pub mod gps;
pub mod location;
pub mod navigation;
pub mod offline;
pub mod services;
pub mod stats;
pub mod tour;

pub use db::{create_database, data_dir, open_db_connection};
pub use error::Error;
pub use gps::Location;
pub use navigation::{NavigationUpdate, RouteTracker};
pub use tour::{RoutePoint, Tour};
