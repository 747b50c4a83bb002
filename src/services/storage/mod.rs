//! Persist completed tours to a remote backend
use crate::config::{FromServiceConfig, ServiceConfig};
use crate::tour::Tour;
use crate::Error;
mod supabase;
pub use supabase::Supabase;

/// trait that defines the remote tour store
pub trait TourStorage {
    /// Insert a tour and return the stored row with backend assigned id and created_at
    fn insert_tour(&self, tour: &Tour) -> Result<Tour, Error>;

    /// Return all tours, newest first
    fn list_tours(&self) -> Result<Vec<Tour>, Error>;

    fn get_tour(&self, id: &str) -> Result<Option<Tour>, Error>;

    fn delete_tour(&self, id: &str) -> Result<(), Error>;
}

pub fn new_tour_storage_handler(config: &ServiceConfig) -> Result<Box<dyn TourStorage>, Error> {
    match config.handler() {
        "supabase" => {
            let handler = Supabase::from_config(config)?;
            handler.validate()?;
            Ok(Box::new(handler))
        }
        _ => Err(Error::UnknownServiceHandler(format!(
            "no tour storage handler exists for: {}",
            config.handler()
        ))),
    }
}
