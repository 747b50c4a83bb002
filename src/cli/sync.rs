//! Define the sync subcommand
use crate::config::Config;
use crate::db::open_db_connection;
use crate::offline::{clear_pending_tours, pending_tours, sync_pending_tours};
use crate::tour::format_duration;
use structopt::StructOpt;

/// Upload tours queued while the backend was unreachable
#[derive(Debug, StructOpt)]
pub struct SyncOpts {
    /// List the queued tours instead of uploading them
    #[structopt(short, long)]
    list: bool,
    /// Drop all queued tours without uploading them
    #[structopt(short, long, conflicts_with = "list")]
    clear: bool,
}

pub fn sync_command(config: Config, opts: SyncOpts) -> Result<(), Box<dyn std::error::Error>> {
    let conn = open_db_connection()?;
    if opts.list {
        println!("Queued\t\t\tDistance[km]\tDuration");
        for pending in pending_tours(&conn)? {
            println!(
                "{}\t{:0.2}\t\t{}",
                pending.queued_at.format("%Y-%m-%d %H:%M:%S"),
                pending.tour.distance,
                format_duration(pending.tour.duration)
            );
        }
        return Ok(());
    }
    if opts.clear {
        let count = clear_pending_tours(&conn)?;
        println!("Removed {} queued tours", count);
        return Ok(());
    }

    let storage = config.get_tour_storage_handler()?;
    let summary = sync_pending_tours(&conn, storage.as_ref())?;
    println!(
        "Uploaded {} tours, {} still queued",
        summary.synced, summary.failed
    );
    Ok(())
}
