//! Queue tours locally while the backend can't be reached and upload them later
use crate::services::TourStorage;
use crate::tour::Tour;
use crate::Error;
use chrono::{DateTime, Utc};
use log::{debug, error, info, warn};
use rusqlite::{params, Connection};

/// A tour waiting in the local queue
#[derive(Clone, Debug, PartialEq)]
pub struct PendingTour {
    pub id: i64,
    pub queued_at: DateTime<Utc>,
    pub tour: Tour,
}

/// Counts from a single pass over the queue
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SyncSummary {
    pub synced: usize,
    pub failed: usize,
}

/// Where a finished tour ended up
#[derive(Clone, Debug, PartialEq)]
pub enum SaveOutcome {
    /// stored by the backend, includes the assigned id
    Saved(Tour),
    Queued,
}

pub fn add_pending_tour(conn: &Connection, tour: &Tour) -> Result<(), Error> {
    let payload = serde_json::to_string(tour)?;
    conn.execute(
        "insert into pending_tours (payload, queued_at) values (?1, ?2)",
        params![payload, Utc::now()],
    )?;
    debug!("Queued tour as pending row {}", conn.last_insert_rowid());
    Ok(())
}

/// Return every queued tour, oldest first
pub fn pending_tours(conn: &Connection) -> Result<Vec<PendingTour>, Error> {
    let mut stmt =
        conn.prepare("select id, queued_at, payload from pending_tours order by queued_at, id")?;
    let mut rows = stmt.query(params![])?;
    let mut pending = Vec::new();
    while let Some(row) = rows.next()? {
        let id: i64 = row.get(0)?;
        let payload: String = row.get(2)?;
        match serde_json::from_str(&payload) {
            Ok(tour) => pending.push(PendingTour {
                id,
                queued_at: row.get(1)?,
                tour,
            }),
            Err(e) => warn!("Skipping unreadable pending tour {}: {}", id, e),
        }
    }
    Ok(pending)
}

/// Empty the queue, returns the number of removed rows
pub fn clear_pending_tours(conn: &Connection) -> Result<usize, Error> {
    let count = conn.execute("delete from pending_tours", params![])?;
    info!("Cleared {} pending tours", count);
    Ok(count)
}

fn remove_pending_tour(conn: &Connection, id: i64) -> Result<(), Error> {
    conn.execute("delete from pending_tours where id = ?1", params![id])?;
    Ok(())
}

/// Upload queued tours one at a time, failed uploads stay in the queue
pub fn sync_pending_tours(
    conn: &Connection,
    storage: &dyn TourStorage,
) -> Result<SyncSummary, Error> {
    let mut summary = SyncSummary::default();
    for pending in pending_tours(conn)? {
        match storage.insert_tour(&pending.tour) {
            Ok(_) => {
                remove_pending_tour(conn, pending.id)?;
                summary.synced += 1;
            }
            Err(e) => {
                error!("Failed to sync pending tour {}: {}", pending.id, e);
                summary.failed += 1;
            }
        }
    }
    if summary.synced > 0 {
        info!("Synced {} pending tours", summary.synced);
    }
    Ok(summary)
}

/// Store a finished tour, queueing it when there's no backend or the insert fails
pub fn save_or_queue(
    conn: &Connection,
    storage: Option<&dyn TourStorage>,
    tour: &Tour,
) -> Result<SaveOutcome, Error> {
    let storage = match storage {
        Some(storage) => storage,
        None => {
            add_pending_tour(conn, tour)?;
            warn!("No tour storage configured, tour was queued");
            return Ok(SaveOutcome::Queued);
        }
    };

    match storage.insert_tour(tour) {
        Ok(stored) => {
            info!("Tour saved");
            if let Err(e) = sync_pending_tours(conn, storage) {
                error!("Error syncing pending tours: {}", e);
            }
            Ok(SaveOutcome::Saved(stored))
        }
        Err(e) => {
            error!("Error saving tour: {}", e);
            add_pending_tour(conn, tour)?;
            warn!("Tour was queued and will be uploaded on the next sync");
            Ok(SaveOutcome::Queued)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_tables;
    use reqwest::StatusCode;
    use std::cell::{Cell, RefCell};

    /// Backend stub that can be switched offline
    #[derive(Default)]
    struct MemoryStorage {
        offline: Cell<bool>,
        rows: RefCell<Vec<Tour>>,
    }

    impl TourStorage for MemoryStorage {
        fn insert_tour(&self, tour: &Tour) -> Result<Tour, Error> {
            if self.offline.get() {
                return Err(Error::RequestError(
                    StatusCode::SERVICE_UNAVAILABLE,
                    "offline".to_string(),
                ));
            }
            let mut stored = tour.clone();
            stored.id = Some(format!("tour-{}", self.rows.borrow().len() + 1));
            self.rows.borrow_mut().push(stored.clone());
            Ok(stored)
        }

        fn list_tours(&self) -> Result<Vec<Tour>, Error> {
            Ok(self.rows.borrow().clone())
        }

        fn get_tour(&self, id: &str) -> Result<Option<Tour>, Error> {
            Ok(self
                .rows
                .borrow()
                .iter()
                .find(|t| t.id.as_deref() == Some(id))
                .cloned())
        }

        fn delete_tour(&self, id: &str) -> Result<(), Error> {
            self.rows.borrow_mut().retain(|t| t.id.as_deref() != Some(id));
            Ok(())
        }
    }

    fn connection() -> Connection {
        let mut conn = Connection::open_in_memory().unwrap();
        create_tables(&mut conn).unwrap();
        conn
    }

    fn tour(distance: f64) -> Tour {
        Tour {
            id: None,
            created_at: None,
            distance,
            duration: 3600.0,
            average_speed: distance,
            route_points: Vec::new(),
            year: 2025,
            month: 6,
        }
    }

    #[test]
    fn queue_keeps_insertion_order() {
        let conn = connection();
        add_pending_tour(&conn, &tour(10.0)).unwrap();
        add_pending_tour(&conn, &tour(20.0)).unwrap();
        let pending = pending_tours(&conn).unwrap();
        assert_eq!(pending.len(), 2);
        assert_eq!(pending[0].tour.distance, 10.0);
        assert_eq!(pending[1].tour.distance, 20.0);

        assert_eq!(clear_pending_tours(&conn).unwrap(), 2);
        assert!(pending_tours(&conn).unwrap().is_empty());
    }

    #[test]
    fn unreadable_rows_are_skipped() {
        let conn = connection();
        conn.execute(
            "insert into pending_tours (payload, queued_at) values (?1, ?2)",
            params!["{not json", Utc::now()],
        )
        .unwrap();
        add_pending_tour(&conn, &tour(5.0)).unwrap();
        let pending = pending_tours(&conn).unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].tour.distance, 5.0);
    }

    #[test]
    fn tours_without_storage_are_queued() {
        let conn = connection();
        let outcome = save_or_queue(&conn, None, &tour(42.0)).unwrap();
        assert_eq!(outcome, SaveOutcome::Queued);
        assert_eq!(pending_tours(&conn).unwrap().len(), 1);
    }

    #[test]
    fn failed_inserts_are_queued_and_synced_after_the_next_save() {
        let conn = connection();
        let storage = MemoryStorage::default();
        storage.offline.set(true);

        let outcome = save_or_queue(&conn, Some(&storage), &tour(1.0)).unwrap();
        assert_eq!(outcome, SaveOutcome::Queued);
        let summary = sync_pending_tours(&conn, &storage).unwrap();
        assert_eq!(summary, SyncSummary { synced: 0, failed: 1 });
        assert_eq!(pending_tours(&conn).unwrap().len(), 1);

        storage.offline.set(false);
        match save_or_queue(&conn, Some(&storage), &tour(2.0)).unwrap() {
            SaveOutcome::Saved(stored) => assert_eq!(stored.id.as_deref(), Some("tour-1")),
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert!(pending_tours(&conn).unwrap().is_empty());
        assert_eq!(storage.list_tours().unwrap().len(), 2);
    }
}
