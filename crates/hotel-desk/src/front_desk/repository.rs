use std::collections::HashSet;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use super::domain::{
    AssignmentId, EmployeeId, HousekeepingDetails, HousekeepingStatus, HousekeepingTask,
    HousekeepingTaskId, MaintenanceDetails, MaintenanceRequest, MaintenanceRequestId,
    MaintenanceStatus, Reservation, ReservationDetails, ReservationId, ReservationRoom,
    ReservationStatus, Room, RoomAssignmentDraft, RoomDraft, RoomId, RoomStatus, StayWindow,
};

/// Room storage, including the status cache written by the refresh sweep.
pub trait RoomRepository: Send + Sync {
    fn insert_room(&self, draft: RoomDraft) -> Result<Room, RepositoryError>;
    fn update_room(&self, id: RoomId, draft: RoomDraft) -> Result<Room, RepositoryError>;
    fn fetch_room(&self, id: RoomId) -> Result<Option<Room>, RepositoryError>;
    fn rooms(&self) -> Result<Vec<Room>, RepositoryError>;
    /// Fails with `Conflict` while anything still references the room.
    fn delete_room(&self, id: RoomId) -> Result<(), RepositoryError>;
    fn room_number_taken(
        &self,
        room_number: &str,
        except: Option<RoomId>,
    ) -> Result<bool, RepositoryError>;
    /// Persists every change or none of them.
    fn apply_room_statuses(&self, changes: &[RoomStatusChange]) -> Result<(), RepositoryError>;

    fn rooms_with_status(&self, status: RoomStatus) -> Result<Vec<Room>, RepositoryError> {
        Ok(self
            .rooms()?
            .into_iter()
            .filter(|room| room.status == status)
            .collect())
    }
}

/// Reservations together with their room assignments.
pub trait ReservationRepository: Send + Sync {
    fn insert_reservation(
        &self,
        details: ReservationDetails,
        rooms: Vec<RoomAssignmentDraft>,
        modified_at: NaiveDateTime,
    ) -> Result<Reservation, RepositoryError>;
    fn update_reservation(
        &self,
        id: ReservationId,
        details: ReservationDetails,
        modified_at: NaiveDateTime,
    ) -> Result<Reservation, RepositoryError>;
    fn fetch_reservation(&self, id: ReservationId) -> Result<Option<Reservation>, RepositoryError>;
    fn reservations(&self) -> Result<Vec<Reservation>, RepositoryError>;
    /// Removes the reservation and its assignments.
    fn delete_reservation(&self, id: ReservationId) -> Result<Reservation, RepositoryError>;

    fn insert_assignment(
        &self,
        reservation_id: ReservationId,
        draft: RoomAssignmentDraft,
    ) -> Result<ReservationRoom, RepositoryError>;
    fn update_assignment(
        &self,
        id: AssignmentId,
        draft: RoomAssignmentDraft,
    ) -> Result<ReservationRoom, RepositoryError>;
    fn fetch_assignment(&self, id: AssignmentId)
        -> Result<Option<ReservationRoom>, RepositoryError>;
    fn delete_assignment(&self, id: AssignmentId) -> Result<(), RepositoryError>;

    fn reservations_with_status(
        &self,
        status: ReservationStatus,
    ) -> Result<Vec<Reservation>, RepositoryError> {
        Ok(self
            .reservations()?
            .into_iter()
            .filter(|reservation| reservation.status() == status)
            .collect())
    }

    fn reservations_starting_after(
        &self,
        date: NaiveDate,
    ) -> Result<Vec<Reservation>, RepositoryError> {
        Ok(self
            .reservations()?
            .into_iter()
            .filter(|reservation| reservation.details.start_date > date)
            .collect())
    }
}

pub trait MaintenanceRepository: Send + Sync {
    fn insert_maintenance(
        &self,
        details: MaintenanceDetails,
    ) -> Result<MaintenanceRequest, RepositoryError>;
    fn update_maintenance(
        &self,
        id: MaintenanceRequestId,
        details: MaintenanceDetails,
    ) -> Result<MaintenanceRequest, RepositoryError>;
    fn fetch_maintenance(
        &self,
        id: MaintenanceRequestId,
    ) -> Result<Option<MaintenanceRequest>, RepositoryError>;
    fn maintenance_requests(&self) -> Result<Vec<MaintenanceRequest>, RepositoryError>;
    fn delete_maintenance(&self, id: MaintenanceRequestId) -> Result<(), RepositoryError>;

    fn maintenance_for_room(
        &self,
        room_id: RoomId,
    ) -> Result<Vec<MaintenanceRequest>, RepositoryError> {
        Ok(self
            .maintenance_requests()?
            .into_iter()
            .filter(|request| request.details.room_id == Some(room_id))
            .collect())
    }

    fn maintenance_with_status(
        &self,
        status: MaintenanceStatus,
    ) -> Result<Vec<MaintenanceRequest>, RepositoryError> {
        Ok(self
            .maintenance_requests()?
            .into_iter()
            .filter(|request| request.details.status == status)
            .collect())
    }

    fn maintenance_for_assignee(
        &self,
        assignee: EmployeeId,
    ) -> Result<Vec<MaintenanceRequest>, RepositoryError> {
        Ok(self
            .maintenance_requests()?
            .into_iter()
            .filter(|request| request.details.assignee_id == Some(assignee))
            .collect())
    }
}

pub trait HousekeepingRepository: Send + Sync {
    fn insert_housekeeping_task(
        &self,
        details: HousekeepingDetails,
    ) -> Result<HousekeepingTask, RepositoryError>;
    fn update_housekeeping_task(
        &self,
        id: HousekeepingTaskId,
        details: HousekeepingDetails,
    ) -> Result<HousekeepingTask, RepositoryError>;
    fn fetch_housekeeping_task(
        &self,
        id: HousekeepingTaskId,
    ) -> Result<Option<HousekeepingTask>, RepositoryError>;
    fn housekeeping_tasks(&self) -> Result<Vec<HousekeepingTask>, RepositoryError>;
    fn delete_housekeeping_task(&self, id: HousekeepingTaskId) -> Result<(), RepositoryError>;

    /// Inserts one task per room unless that room already has a task
    /// requested on the same day, and returns only the tasks it created.
    /// Stores that can check and insert under one lock should override it.
    fn insert_daily_tasks(
        &self,
        tasks: Vec<HousekeepingDetails>,
    ) -> Result<Vec<HousekeepingTask>, RepositoryError> {
        let mut handled: HashSet<(RoomId, NaiveDate)> = self
            .housekeeping_tasks()?
            .into_iter()
            .map(|task| (task.details.room_id, task.details.request_date.date()))
            .collect();
        let mut created = Vec::new();
        for details in tasks {
            if handled.insert((details.room_id, details.request_date.date())) {
                created.push(self.insert_housekeeping_task(details)?);
            }
        }
        Ok(created)
    }

    fn housekeeping_with_status(
        &self,
        status: HousekeepingStatus,
    ) -> Result<Vec<HousekeepingTask>, RepositoryError> {
        Ok(self
            .housekeeping_tasks()?
            .into_iter()
            .filter(|task| task.details.status == status)
            .collect())
    }

    fn housekeeping_for_employee(
        &self,
        employee: EmployeeId,
    ) -> Result<Vec<HousekeepingTask>, RepositoryError> {
        Ok(self
            .housekeeping_tasks()?
            .into_iter()
            .filter(|task| task.details.employee_id == Some(employee))
            .collect())
    }
}

/// Full storage contract consumed by the front desk.
///
/// The two provided methods are the read models of the status manager and the
/// availability query. Stores that can compute them in one consistent read
/// (the in-memory store does) should override them.
pub trait HotelRepository:
    RoomRepository + ReservationRepository + MaintenanceRepository + HousekeepingRepository
{
    fn room_status_inputs(&self) -> Result<Vec<RoomStatusInputs>, RepositoryError> {
        let rooms = self.rooms()?;
        let reservations = self.reservations()?;
        let maintenance = self.maintenance_requests()?;
        Ok(compute_status_inputs(&rooms, &reservations, &maintenance))
    }

    fn available_rooms(&self, window: StayWindow) -> Result<Vec<Room>, RepositoryError> {
        let rooms = self.rooms()?;
        let reservations = self.reservations()?;
        Ok(filter_available(rooms, &reservations, window))
    }
}

/// Everything the refresh sweep needs to know about one room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RoomStatusInputs {
    pub room_id: RoomId,
    pub stored_status: RoomStatus,
    pub has_active_reservation: bool,
    pub has_pending_maintenance: bool,
}

impl RoomStatusInputs {
    /// Open maintenance wins over occupancy, which wins over availability.
    pub fn derived_status(&self) -> RoomStatus {
        if self.has_pending_maintenance {
            RoomStatus::OutOfService
        } else if self.has_active_reservation {
            RoomStatus::Occupied
        } else {
            RoomStatus::Available
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RoomStatusChange {
    pub room_id: RoomId,
    pub status: RoomStatus,
}

pub(crate) fn compute_status_inputs(
    rooms: &[Room],
    reservations: &[Reservation],
    maintenance: &[MaintenanceRequest],
) -> Vec<RoomStatusInputs> {
    let occupied: HashSet<RoomId> = reservations
        .iter()
        .filter(|reservation| reservation.status() == ReservationStatus::Active)
        .flat_map(|reservation| reservation.rooms.iter().map(|assignment| assignment.room_id))
        .collect();

    let out_of_service: HashSet<RoomId> = maintenance
        .iter()
        .filter(|request| request.details.status.is_open())
        .filter_map(|request| request.details.room_id)
        .collect();

    rooms
        .iter()
        .map(|room| RoomStatusInputs {
            room_id: room.id,
            stored_status: room.status,
            has_active_reservation: occupied.contains(&room.id),
            has_pending_maintenance: out_of_service.contains(&room.id),
        })
        .collect()
}

pub(crate) fn filter_available(
    rooms: Vec<Room>,
    reservations: &[Reservation],
    window: StayWindow,
) -> Vec<Room> {
    let blocked: HashSet<RoomId> = reservations
        .iter()
        .filter(|reservation| reservation.status().blocks_availability())
        .filter(|reservation| reservation.window().overlaps(&window))
        .flat_map(|reservation| reservation.rooms.iter().map(|assignment| assignment.room_id))
        .collect();

    rooms
        .into_iter()
        .filter(|room| !blocked.contains(&room.id))
        .collect()
}

/// Error enumeration for repository failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    #[error("{0}")]
    Conflict(String),
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: u64 },
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

impl RepositoryError {
    pub fn not_found(entity: &'static str, id: impl Into<u64>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }
}
