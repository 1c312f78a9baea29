use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::NaiveDateTime;
use tracing::info;

use super::domain::{
    HousekeepingDetails, HousekeepingStatus, HousekeepingTask, ReservationStatus, RoomId,
};
use super::repository::{HotelRepository, RepositoryError};

pub const DAILY_CLEANING_DESCRIPTION: &str = "Daily cleaning";

/// Creates the morning cleaning tasks for rooms with guests in house.
pub struct DailyCleaningPlanner<R> {
    repository: Arc<R>,
}

impl<R> DailyCleaningPlanner<R>
where
    R: HotelRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Rooms of active reservations whose stay covers `now`'s date and that
    /// have no housekeeping task requested that day yet.
    pub fn rooms_due(&self, now: NaiveDateTime) -> Result<BTreeSet<RoomId>, RepositoryError> {
        let today = now.date();
        let handled: BTreeSet<RoomId> = self
            .repository
            .housekeeping_tasks()?
            .into_iter()
            .filter(|task| task.details.request_date.date() == today)
            .map(|task| task.details.room_id)
            .collect();

        Ok(self
            .repository
            .reservations_with_status(ReservationStatus::Active)?
            .into_iter()
            .filter(|reservation| reservation.window().contains(today))
            .flat_map(|reservation| reservation.rooms.into_iter().map(|a| a.room_id))
            .filter(|room_id| !handled.contains(room_id))
            .collect())
    }

    /// Rooms found due are re-checked by the store under its own lock, so a
    /// scheduled run racing a manual one still yields one task per room.
    pub fn assign_daily_cleaning(
        &self,
        now: NaiveDateTime,
    ) -> Result<Vec<HousekeepingTask>, RepositoryError> {
        let due = self.rooms_due(now)?;
        if due.is_empty() {
            info!(date = %now.date(), "no rooms need daily cleaning");
            return Ok(Vec::new());
        }

        let tasks = due
            .into_iter()
            .map(|room_id| HousekeepingDetails {
                room_id,
                employee_id: None,
                request_date: now,
                completion_date: None,
                status: HousekeepingStatus::Pending,
                description: DAILY_CLEANING_DESCRIPTION.to_string(),
            })
            .collect();
        let created = self.repository.insert_daily_tasks(tasks)?;

        info!(date = %now.date(), tasks = created.len(), "daily cleaning assigned");
        Ok(created)
    }
}
