//! Local database location and connection helpers
use log::debug;
use rusqlite::{Connection, Result};
use std::path::PathBuf;

mod schema;
pub use schema::{create_database, create_tables};

static APP_DIR_NAME: &str = "moto-track";
static DATABASE_NAME: &str = "moto-track.db";

/// Directory holding the application's local data
pub fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_default()
        .join(APP_DIR_NAME)
}

pub fn db_path() -> PathBuf {
    data_dir().join(DATABASE_NAME)
}

pub fn open_db_connection() -> Result<Connection> {
    let db = db_path();
    debug!("Connected to local database located at: {:?}", db);
    Connection::open(&db)
}
