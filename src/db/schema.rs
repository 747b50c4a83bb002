use super::{db_path, open_db_connection};
use log::debug;
use rusqlite::{params, Connection, Result};

/// Create the database and required tables
pub fn create_database() -> Result<()> {
    let db = db_path();
    if db.exists() {
        debug!(
            "Skipping database initialization, pre-existing database found at {:?}",
            db
        );
        return Ok(());
    }

    let mut conn = open_db_connection()?;
    create_tables(&mut conn)?;
    debug!("Completed database initialization");
    Ok(())
}

/// Create any missing tables on an open connection
pub fn create_tables(conn: &mut Connection) -> Result<()> {
    let tx = conn.transaction()?;
    tx.execute(
        "create table if not exists pending_tours (
            payload    text not null, -- tour serialized as json
            queued_at  datetime not null,
            id         integer primary key
        )",
        params![],
    )?;
    tx.commit()
}
