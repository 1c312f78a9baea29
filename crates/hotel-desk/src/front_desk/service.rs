use std::sync::Arc;

use chrono::{Local, NaiveDate, NaiveDateTime};
use tracing::debug;

use super::domain::{
    AssignmentId, EmployeeId, HousekeepingDetails, HousekeepingStatus, HousekeepingTask,
    HousekeepingTaskId, MaintenanceDetails, MaintenanceRequest, MaintenanceRequestId,
    MaintenanceStatus, Reservation, ReservationDetails, ReservationDraft, ReservationId,
    ReservationRoom, ReservationStatus, Room, RoomAssignmentDraft, RoomDraft, RoomId, RoomStatus,
    StayWindow, ValidationError,
};
use super::housekeeping::DailyCleaningPlanner;
use super::repository::{HotelRepository, RepositoryError};
use super::status::{RefreshSummary, RoomStatusManager};
use crate::config::RoomStatusConfig;

/// Which mutations re-run the room status sweep besides reservations and
/// room assignments, which always do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshPolicy {
    pub on_maintenance_change: bool,
}

impl Default for RefreshPolicy {
    fn default() -> Self {
        Self {
            on_maintenance_change: true,
        }
    }
}

impl From<&RoomStatusConfig> for RefreshPolicy {
    fn from(config: &RoomStatusConfig) -> Self {
        Self {
            on_maintenance_change: config.refresh_on_maintenance,
        }
    }
}

/// Facade over the hotel store used by the HTTP layer.
///
/// Every write that can change occupancy or service state runs a status
/// sweep before returning, so callers never observe a stale room status
/// after their own mutation.
pub struct FrontDeskService<R> {
    repository: Arc<R>,
    status: RoomStatusManager<R>,
    planner: DailyCleaningPlanner<R>,
    policy: RefreshPolicy,
}

impl<R> FrontDeskService<R>
where
    R: HotelRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self::with_policy(repository, RefreshPolicy::default())
    }

    pub fn with_policy(repository: Arc<R>, policy: RefreshPolicy) -> Self {
        Self {
            status: RoomStatusManager::new(repository.clone()),
            planner: DailyCleaningPlanner::new(repository.clone()),
            repository,
            policy,
        }
    }

    pub fn refresh_room_statuses(&self) -> Result<RefreshSummary, FrontDeskError> {
        Ok(self.status.refresh_room_statuses()?)
    }

    fn refresh_after(&self, trigger: &'static str) -> Result<(), FrontDeskError> {
        let summary = self.status.refresh_room_statuses()?;
        debug!(
            trigger,
            updated = summary.rooms_updated,
            "status sweep after mutation"
        );
        Ok(())
    }

    // Rooms

    pub fn rooms(&self) -> Result<Vec<Room>, FrontDeskError> {
        Ok(self.repository.rooms()?)
    }

    pub fn room(&self, id: RoomId) -> Result<Room, FrontDeskError> {
        self.repository
            .fetch_room(id)?
            .ok_or_else(|| RepositoryError::not_found("room", id).into())
    }

    pub fn create_room(&self, draft: RoomDraft) -> Result<Room, FrontDeskError> {
        draft.validate()?;
        if self.repository.room_number_taken(&draft.room_number, None)? {
            return Err(ValidationError::DuplicateRoomNumber(draft.room_number).into());
        }
        Ok(self.repository.insert_room(draft)?)
    }

    /// Updates the descriptive attributes; the status stays owned by the sweep.
    pub fn update_room(&self, id: RoomId, draft: RoomDraft) -> Result<Room, FrontDeskError> {
        draft.validate()?;
        if self
            .repository
            .room_number_taken(&draft.room_number, Some(id))?
        {
            return Err(ValidationError::DuplicateRoomNumber(draft.room_number).into());
        }
        Ok(self.repository.update_room(id, draft)?)
    }

    pub fn delete_room(&self, id: RoomId) -> Result<(), FrontDeskError> {
        Ok(self.repository.delete_room(id)?)
    }

    pub fn rooms_with_status(&self, status: RoomStatus) -> Result<Vec<Room>, FrontDeskError> {
        Ok(self.repository.rooms_with_status(status)?)
    }

    pub fn room_number_exists(&self, room_number: &str) -> Result<bool, FrontDeskError> {
        Ok(self.repository.room_number_taken(room_number, None)?)
    }

    pub fn available_rooms(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Room>, FrontDeskError> {
        let window = StayWindow::new(from, to)?;
        Ok(self.repository.available_rooms(window)?)
    }

    // Reservations

    pub fn reservations(&self) -> Result<Vec<Reservation>, FrontDeskError> {
        Ok(self.repository.reservations()?)
    }

    pub fn reservation(&self, id: ReservationId) -> Result<Reservation, FrontDeskError> {
        self.repository
            .fetch_reservation(id)?
            .ok_or_else(|| RepositoryError::not_found("reservation", id).into())
    }

    pub fn create_reservation(
        &self,
        draft: ReservationDraft,
    ) -> Result<Reservation, FrontDeskError> {
        draft.details.stay()?;
        for room in &draft.rooms {
            room.validate()?;
        }
        let reservation =
            self.repository
                .insert_reservation(draft.details, draft.rooms, now())?;
        self.refresh_after("reservation created")?;
        Ok(reservation)
    }

    pub fn update_reservation(
        &self,
        id: ReservationId,
        details: ReservationDetails,
    ) -> Result<Reservation, FrontDeskError> {
        details.stay()?;
        let reservation = self.repository.update_reservation(id, details, now())?;
        self.refresh_after("reservation updated")?;
        Ok(reservation)
    }

    pub fn delete_reservation(&self, id: ReservationId) -> Result<(), FrontDeskError> {
        self.repository.delete_reservation(id)?;
        self.refresh_after("reservation deleted")
    }

    pub fn reservations_with_status(
        &self,
        status: ReservationStatus,
    ) -> Result<Vec<Reservation>, FrontDeskError> {
        Ok(self.repository.reservations_with_status(status)?)
    }

    pub fn reservations_starting_after(
        &self,
        date: NaiveDate,
    ) -> Result<Vec<Reservation>, FrontDeskError> {
        Ok(self.repository.reservations_starting_after(date)?)
    }

    // Room assignments

    pub fn reservation_rooms(
        &self,
        reservation_id: ReservationId,
    ) -> Result<Vec<ReservationRoom>, FrontDeskError> {
        Ok(self.reservation(reservation_id)?.rooms)
    }

    pub fn add_room(
        &self,
        reservation_id: ReservationId,
        draft: RoomAssignmentDraft,
    ) -> Result<ReservationRoom, FrontDeskError> {
        self.reservation(reservation_id)?;
        draft.validate()?;
        let assignment = self.repository.insert_assignment(reservation_id, draft)?;
        self.refresh_after("room assigned")?;
        Ok(assignment)
    }

    pub fn update_room_assignment(
        &self,
        reservation_id: ReservationId,
        assignment_id: AssignmentId,
        draft: RoomAssignmentDraft,
    ) -> Result<ReservationRoom, FrontDeskError> {
        self.owned_assignment(reservation_id, assignment_id)?;
        draft.validate()?;
        let assignment = self.repository.update_assignment(assignment_id, draft)?;
        self.refresh_after("room assignment updated")?;
        Ok(assignment)
    }

    pub fn remove_room_assignment(
        &self,
        reservation_id: ReservationId,
        assignment_id: AssignmentId,
    ) -> Result<(), FrontDeskError> {
        self.owned_assignment(reservation_id, assignment_id)?;
        self.repository.delete_assignment(assignment_id)?;
        self.refresh_after("room assignment removed")
    }

    fn owned_assignment(
        &self,
        reservation_id: ReservationId,
        assignment_id: AssignmentId,
    ) -> Result<ReservationRoom, FrontDeskError> {
        let assignment = self
            .repository
            .fetch_assignment(assignment_id)?
            .ok_or_else(|| RepositoryError::not_found("room assignment", assignment_id))?;
        if assignment.reservation_id != reservation_id {
            return Err(ValidationError::AssignmentMismatch {
                assignment: assignment_id,
                reservation: reservation_id,
            }
            .into());
        }
        Ok(assignment)
    }

    // Maintenance

    pub fn maintenance_requests(&self) -> Result<Vec<MaintenanceRequest>, FrontDeskError> {
        Ok(self.repository.maintenance_requests()?)
    }

    pub fn maintenance_request(
        &self,
        id: MaintenanceRequestId,
    ) -> Result<MaintenanceRequest, FrontDeskError> {
        self.repository
            .fetch_maintenance(id)?
            .ok_or_else(|| RepositoryError::not_found("maintenance request", id).into())
    }

    pub fn create_maintenance_request(
        &self,
        details: MaintenanceDetails,
    ) -> Result<MaintenanceRequest, FrontDeskError> {
        let request = self.repository.insert_maintenance(details)?;
        self.refresh_after_maintenance("maintenance request filed")?;
        Ok(request)
    }

    pub fn update_maintenance_request(
        &self,
        id: MaintenanceRequestId,
        details: MaintenanceDetails,
    ) -> Result<MaintenanceRequest, FrontDeskError> {
        let request = self.repository.update_maintenance(id, details)?;
        self.refresh_after_maintenance("maintenance request updated")?;
        Ok(request)
    }

    pub fn delete_maintenance_request(
        &self,
        id: MaintenanceRequestId,
    ) -> Result<(), FrontDeskError> {
        self.repository.delete_maintenance(id)?;
        self.refresh_after_maintenance("maintenance request deleted")
    }

    pub fn maintenance_with_status(
        &self,
        status: MaintenanceStatus,
    ) -> Result<Vec<MaintenanceRequest>, FrontDeskError> {
        Ok(self.repository.maintenance_with_status(status)?)
    }

    pub fn maintenance_for_room(
        &self,
        room_id: RoomId,
    ) -> Result<Vec<MaintenanceRequest>, FrontDeskError> {
        Ok(self.repository.maintenance_for_room(room_id)?)
    }

    pub fn maintenance_for_assignee(
        &self,
        assignee: EmployeeId,
    ) -> Result<Vec<MaintenanceRequest>, FrontDeskError> {
        Ok(self.repository.maintenance_for_assignee(assignee)?)
    }

    fn refresh_after_maintenance(&self, trigger: &'static str) -> Result<(), FrontDeskError> {
        if self.policy.on_maintenance_change {
            self.refresh_after(trigger)
        } else {
            Ok(())
        }
    }

    // Housekeeping

    pub fn housekeeping_tasks(&self) -> Result<Vec<HousekeepingTask>, FrontDeskError> {
        Ok(self.repository.housekeeping_tasks()?)
    }

    pub fn housekeeping_task(
        &self,
        id: HousekeepingTaskId,
    ) -> Result<HousekeepingTask, FrontDeskError> {
        self.repository
            .fetch_housekeeping_task(id)?
            .ok_or_else(|| RepositoryError::not_found("housekeeping task", id).into())
    }

    pub fn create_housekeeping_task(
        &self,
        details: HousekeepingDetails,
    ) -> Result<HousekeepingTask, FrontDeskError> {
        Ok(self.repository.insert_housekeeping_task(details)?)
    }

    /// Replaces every field, which is how staff pick up, complete or decline
    /// a task. Room statuses do not depend on housekeeping, so no sweep runs.
    pub fn update_housekeeping_task(
        &self,
        id: HousekeepingTaskId,
        details: HousekeepingDetails,
    ) -> Result<HousekeepingTask, FrontDeskError> {
        Ok(self.repository.update_housekeeping_task(id, details)?)
    }

    pub fn delete_housekeeping_task(&self, id: HousekeepingTaskId) -> Result<(), FrontDeskError> {
        Ok(self.repository.delete_housekeeping_task(id)?)
    }

    pub fn housekeeping_with_status(
        &self,
        status: HousekeepingStatus,
    ) -> Result<Vec<HousekeepingTask>, FrontDeskError> {
        Ok(self.repository.housekeeping_with_status(status)?)
    }

    pub fn housekeeping_for_employee(
        &self,
        employee: EmployeeId,
    ) -> Result<Vec<HousekeepingTask>, FrontDeskError> {
        Ok(self.repository.housekeeping_for_employee(employee)?)
    }

    pub fn assign_daily_cleaning(
        &self,
        now: NaiveDateTime,
    ) -> Result<Vec<HousekeepingTask>, FrontDeskError> {
        Ok(self.planner.assign_daily_cleaning(now)?)
    }
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Error raised by the front desk service.
#[derive(Debug, thiserror::Error)]
pub enum FrontDeskError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
