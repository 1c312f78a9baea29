//! Room status derivation.
//!
//! A room's stored status is a cache over reservations and maintenance
//! requests. [`RoomStatusManager::refresh_room_statuses`] recomputes the cache
//! for every room from one snapshot of the store and writes the rooms whose
//! cached value drifted in a single all-or-nothing call.

use std::sync::{Arc, Mutex};

use serde::Serialize;
use tracing::{debug, info};

use super::domain::RoomStatus;
use super::repository::{HotelRepository, RepositoryError, RoomStatusChange};

/// Outcome of one refresh sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RefreshSummary {
    pub rooms_scanned: usize,
    pub rooms_updated: usize,
    pub available: usize,
    pub occupied: usize,
    pub out_of_service: usize,
}

impl RefreshSummary {
    fn record(&mut self, status: RoomStatus) {
        self.rooms_scanned += 1;
        match status {
            RoomStatus::Available => self.available += 1,
            RoomStatus::Occupied => self.occupied += 1,
            RoomStatus::OutOfService => self.out_of_service += 1,
            RoomStatus::Cleaning | RoomStatus::Maintenance => {}
        }
    }
}

pub struct RoomStatusManager<R> {
    repository: Arc<R>,
    sweep: Mutex<()>,
}

impl<R> RoomStatusManager<R>
where
    R: HotelRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self {
            repository,
            sweep: Mutex::new(()),
        }
    }

    /// Recompute and persist the status of every room.
    ///
    /// Sweeps are serialized so two triggers racing each other cannot
    /// interleave their read and write phases.
    pub fn refresh_room_statuses(&self) -> Result<RefreshSummary, RepositoryError> {
        let _sweep = self
            .sweep
            .lock()
            .map_err(|_| RepositoryError::Unavailable("status sweep lock poisoned".to_string()))?;

        let inputs = self.repository.room_status_inputs()?;
        let mut summary = RefreshSummary::default();
        let mut changes = Vec::new();

        for room in &inputs {
            let derived = room.derived_status();
            summary.record(derived);
            if derived != room.stored_status {
                changes.push(RoomStatusChange {
                    room_id: room.room_id,
                    status: derived,
                });
            }
        }

        if changes.is_empty() {
            debug!(rooms = summary.rooms_scanned, "room statuses already current");
            return Ok(summary);
        }

        self.repository.apply_room_statuses(&changes)?;
        summary.rooms_updated = changes.len();

        info!(
            rooms = summary.rooms_scanned,
            updated = summary.rooms_updated,
            occupied = summary.occupied,
            out_of_service = summary.out_of_service,
            "room statuses refreshed"
        );
        Ok(summary)
    }
}
