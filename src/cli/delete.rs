//! Define the delete subcommand
use crate::config::Config;
use crate::Error;
use log::info;
use structopt::StructOpt;

/// Delete a tour from the backend
#[derive(Debug, StructOpt)]
pub struct DeleteOpts {
    /// ID of the tour to delete (use list-tours command to see IDs)
    #[structopt(name = "TOUR_ID")]
    id: String,
}

pub fn delete_command(
    config: Config,
    opts: DeleteOpts,
) -> Result<(), Box<dyn std::error::Error>> {
    let storage = config.get_tour_storage_handler()?;
    if storage.get_tour(&opts.id)?.is_none() {
        return Err(Box::new(Error::TourDoesNotExistError(opts.id)));
    }
    storage.delete_tour(&opts.id)?;
    info!("Deleted tour {}", opts.id);
    Ok(())
}
