use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{NaiveDate, NaiveDateTime};

use super::domain::{
    AssignmentId, HousekeepingDetails, HousekeepingTask, HousekeepingTaskId, MaintenanceDetails,
    MaintenanceRequest, MaintenanceRequestId, Reservation, ReservationDetails, ReservationId,
    ReservationRoom, Room, RoomAssignmentDraft, RoomDraft, RoomId, RoomStatus, StayWindow,
};
use super::repository::{
    compute_status_inputs, filter_available, HotelRepository, HousekeepingRepository,
    MaintenanceRepository, RepositoryError, ReservationRepository, RoomRepository,
    RoomStatusChange, RoomStatusInputs,
};

/// Process-local store backing the API service and the demo.
///
/// All tables sit behind one mutex so every read model is computed from a
/// single consistent snapshot.
#[derive(Default, Clone)]
pub struct InMemoryHotelRepository {
    state: Arc<Mutex<HotelTables>>,
}

#[derive(Default)]
struct HotelTables {
    rooms: BTreeMap<RoomId, Room>,
    reservations: BTreeMap<ReservationId, StoredReservation>,
    assignments: BTreeMap<AssignmentId, ReservationRoom>,
    maintenance: BTreeMap<MaintenanceRequestId, MaintenanceRequest>,
    housekeeping: BTreeMap<HousekeepingTaskId, HousekeepingTask>,
    sequence: u64,
}

struct StoredReservation {
    details: ReservationDetails,
    modified_at: NaiveDateTime,
}

impl HotelTables {
    fn next_id(&mut self) -> u64 {
        self.sequence += 1;
        self.sequence
    }

    fn reservation(&self, id: ReservationId) -> Option<Reservation> {
        self.reservations.get(&id).map(|stored| Reservation {
            id,
            details: stored.details.clone(),
            modified_at: stored.modified_at,
            rooms: self
                .assignments
                .values()
                .filter(|assignment| assignment.reservation_id == id)
                .copied()
                .collect(),
        })
    }

    fn all_reservations(&self) -> Vec<Reservation> {
        self.reservations
            .keys()
            .filter_map(|id| self.reservation(*id))
            .collect()
    }

    fn require_room(&self, id: RoomId) -> Result<(), RepositoryError> {
        if self.rooms.contains_key(&id) {
            Ok(())
        } else {
            Err(RepositoryError::not_found("room", id))
        }
    }

    fn number_taken(&self, room_number: &str, except: Option<RoomId>) -> bool {
        self.rooms
            .values()
            .any(|room| room.room_number == room_number && Some(room.id) != except)
    }

    fn require_free_number(
        &self,
        room_number: &str,
        except: Option<RoomId>,
    ) -> Result<(), RepositoryError> {
        if self.number_taken(room_number, except) {
            Err(RepositoryError::Conflict(format!(
                "room number '{room_number}' is already in use"
            )))
        } else {
            Ok(())
        }
    }

    fn room_in_use(&self, id: RoomId) -> bool {
        self.assignments.values().any(|a| a.room_id == id)
            || self
                .maintenance
                .values()
                .any(|request| request.details.room_id == Some(id))
            || self
                .housekeeping
                .values()
                .any(|task| task.details.room_id == id)
    }
}

impl InMemoryHotelRepository {
    fn tables(&self) -> Result<MutexGuard<'_, HotelTables>, RepositoryError> {
        self.state
            .lock()
            .map_err(|_| RepositoryError::Unavailable("hotel store lock poisoned".to_string()))
    }
}

impl RoomRepository for InMemoryHotelRepository {
    fn insert_room(&self, draft: RoomDraft) -> Result<Room, RepositoryError> {
        let mut tables = self.tables()?;
        tables.require_free_number(&draft.room_number, None)?;
        let room = Room {
            id: RoomId(tables.next_id()),
            room_number: draft.room_number,
            floor: draft.floor,
            bed_count: draft.bed_count,
            price_per_night: draft.price_per_night,
            status: RoomStatus::Available,
        };
        tables.rooms.insert(room.id, room.clone());
        Ok(room)
    }

    fn update_room(&self, id: RoomId, draft: RoomDraft) -> Result<Room, RepositoryError> {
        let mut tables = self.tables()?;
        tables.require_room(id)?;
        tables.require_free_number(&draft.room_number, Some(id))?;
        let room = tables
            .rooms
            .get_mut(&id)
            .ok_or_else(|| RepositoryError::not_found("room", id))?;
        room.room_number = draft.room_number;
        room.floor = draft.floor;
        room.bed_count = draft.bed_count;
        room.price_per_night = draft.price_per_night;
        Ok(room.clone())
    }

    fn fetch_room(&self, id: RoomId) -> Result<Option<Room>, RepositoryError> {
        Ok(self.tables()?.rooms.get(&id).cloned())
    }

    fn rooms(&self) -> Result<Vec<Room>, RepositoryError> {
        Ok(self.tables()?.rooms.values().cloned().collect())
    }

    fn delete_room(&self, id: RoomId) -> Result<(), RepositoryError> {
        let mut tables = self.tables()?;
        tables.require_room(id)?;
        if tables.room_in_use(id) {
            return Err(RepositoryError::Conflict(format!(
                "room {id} is still referenced by reservations, maintenance or housekeeping"
            )));
        }
        tables.rooms.remove(&id);
        Ok(())
    }

    fn room_number_taken(
        &self,
        room_number: &str,
        except: Option<RoomId>,
    ) -> Result<bool, RepositoryError> {
        Ok(self.tables()?.number_taken(room_number, except))
    }

    fn apply_room_statuses(&self, changes: &[RoomStatusChange]) -> Result<(), RepositoryError> {
        let mut tables = self.tables()?;
        for change in changes {
            tables.require_room(change.room_id)?;
        }
        for change in changes {
            if let Some(room) = tables.rooms.get_mut(&change.room_id) {
                room.status = change.status;
            }
        }
        Ok(())
    }
}

impl ReservationRepository for InMemoryHotelRepository {
    fn insert_reservation(
        &self,
        details: ReservationDetails,
        rooms: Vec<RoomAssignmentDraft>,
        modified_at: NaiveDateTime,
    ) -> Result<Reservation, RepositoryError> {
        let mut tables = self.tables()?;
        for draft in &rooms {
            tables.require_room(draft.room_id)?;
        }
        let id = ReservationId(tables.next_id());
        tables.reservations.insert(
            id,
            StoredReservation {
                details,
                modified_at,
            },
        );
        for draft in rooms {
            let assignment = ReservationRoom {
                id: AssignmentId(tables.next_id()),
                reservation_id: id,
                room_id: draft.room_id,
                guest_count: draft.guest_count,
            };
            tables.assignments.insert(assignment.id, assignment);
        }
        tables
            .reservation(id)
            .ok_or_else(|| RepositoryError::not_found("reservation", id))
    }

    fn update_reservation(
        &self,
        id: ReservationId,
        details: ReservationDetails,
        modified_at: NaiveDateTime,
    ) -> Result<Reservation, RepositoryError> {
        let mut tables = self.tables()?;
        let stored = tables
            .reservations
            .get_mut(&id)
            .ok_or_else(|| RepositoryError::not_found("reservation", id))?;
        stored.details = details;
        stored.modified_at = modified_at;
        tables
            .reservation(id)
            .ok_or_else(|| RepositoryError::not_found("reservation", id))
    }

    fn fetch_reservation(&self, id: ReservationId) -> Result<Option<Reservation>, RepositoryError> {
        Ok(self.tables()?.reservation(id))
    }

    fn reservations(&self) -> Result<Vec<Reservation>, RepositoryError> {
        Ok(self.tables()?.all_reservations())
    }

    fn delete_reservation(&self, id: ReservationId) -> Result<Reservation, RepositoryError> {
        let mut tables = self.tables()?;
        let removed = tables
            .reservation(id)
            .ok_or_else(|| RepositoryError::not_found("reservation", id))?;
        tables.reservations.remove(&id);
        tables
            .assignments
            .retain(|_, assignment| assignment.reservation_id != id);
        Ok(removed)
    }

    fn insert_assignment(
        &self,
        reservation_id: ReservationId,
        draft: RoomAssignmentDraft,
    ) -> Result<ReservationRoom, RepositoryError> {
        let mut tables = self.tables()?;
        if !tables.reservations.contains_key(&reservation_id) {
            return Err(RepositoryError::not_found("reservation", reservation_id));
        }
        tables.require_room(draft.room_id)?;
        let assignment = ReservationRoom {
            id: AssignmentId(tables.next_id()),
            reservation_id,
            room_id: draft.room_id,
            guest_count: draft.guest_count,
        };
        tables.assignments.insert(assignment.id, assignment);
        Ok(assignment)
    }

    fn update_assignment(
        &self,
        id: AssignmentId,
        draft: RoomAssignmentDraft,
    ) -> Result<ReservationRoom, RepositoryError> {
        let mut tables = self.tables()?;
        tables.require_room(draft.room_id)?;
        let assignment = tables
            .assignments
            .get_mut(&id)
            .ok_or_else(|| RepositoryError::not_found("room assignment", id))?;
        assignment.room_id = draft.room_id;
        assignment.guest_count = draft.guest_count;
        Ok(*assignment)
    }

    fn fetch_assignment(
        &self,
        id: AssignmentId,
    ) -> Result<Option<ReservationRoom>, RepositoryError> {
        Ok(self.tables()?.assignments.get(&id).copied())
    }

    fn delete_assignment(&self, id: AssignmentId) -> Result<(), RepositoryError> {
        self.tables()?
            .assignments
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| RepositoryError::not_found("room assignment", id))
    }
}

impl MaintenanceRepository for InMemoryHotelRepository {
    fn insert_maintenance(
        &self,
        details: MaintenanceDetails,
    ) -> Result<MaintenanceRequest, RepositoryError> {
        let mut tables = self.tables()?;
        if let Some(room_id) = details.room_id {
            tables.require_room(room_id)?;
        }
        let request = MaintenanceRequest {
            id: MaintenanceRequestId(tables.next_id()),
            details,
        };
        tables.maintenance.insert(request.id, request.clone());
        Ok(request)
    }

    fn update_maintenance(
        &self,
        id: MaintenanceRequestId,
        details: MaintenanceDetails,
    ) -> Result<MaintenanceRequest, RepositoryError> {
        let mut tables = self.tables()?;
        if let Some(room_id) = details.room_id {
            tables.require_room(room_id)?;
        }
        let request = tables
            .maintenance
            .get_mut(&id)
            .ok_or_else(|| RepositoryError::not_found("maintenance request", id))?;
        request.details = details;
        Ok(request.clone())
    }

    fn fetch_maintenance(
        &self,
        id: MaintenanceRequestId,
    ) -> Result<Option<MaintenanceRequest>, RepositoryError> {
        Ok(self.tables()?.maintenance.get(&id).cloned())
    }

    fn maintenance_requests(&self) -> Result<Vec<MaintenanceRequest>, RepositoryError> {
        Ok(self.tables()?.maintenance.values().cloned().collect())
    }

    fn delete_maintenance(&self, id: MaintenanceRequestId) -> Result<(), RepositoryError> {
        self.tables()?
            .maintenance
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| RepositoryError::not_found("maintenance request", id))
    }
}

impl HousekeepingRepository for InMemoryHotelRepository {
    fn insert_housekeeping_task(
        &self,
        details: HousekeepingDetails,
    ) -> Result<HousekeepingTask, RepositoryError> {
        let mut tables = self.tables()?;
        tables.require_room(details.room_id)?;
        let task = HousekeepingTask {
            id: HousekeepingTaskId(tables.next_id()),
            details,
        };
        tables.housekeeping.insert(task.id, task.clone());
        Ok(task)
    }

    fn update_housekeeping_task(
        &self,
        id: HousekeepingTaskId,
        details: HousekeepingDetails,
    ) -> Result<HousekeepingTask, RepositoryError> {
        let mut tables = self.tables()?;
        tables.require_room(details.room_id)?;
        let task = tables
            .housekeeping
            .get_mut(&id)
            .ok_or_else(|| RepositoryError::not_found("housekeeping task", id))?;
        task.details = details;
        Ok(task.clone())
    }

    fn fetch_housekeeping_task(
        &self,
        id: HousekeepingTaskId,
    ) -> Result<Option<HousekeepingTask>, RepositoryError> {
        Ok(self.tables()?.housekeeping.get(&id).cloned())
    }

    fn housekeeping_tasks(&self) -> Result<Vec<HousekeepingTask>, RepositoryError> {
        Ok(self.tables()?.housekeeping.values().cloned().collect())
    }

    fn delete_housekeeping_task(&self, id: HousekeepingTaskId) -> Result<(), RepositoryError> {
        self.tables()?
            .housekeeping
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| RepositoryError::not_found("housekeeping task", id))
    }

    fn insert_daily_tasks(
        &self,
        tasks: Vec<HousekeepingDetails>,
    ) -> Result<Vec<HousekeepingTask>, RepositoryError> {
        let mut tables = self.tables()?;
        for details in &tasks {
            tables.require_room(details.room_id)?;
        }
        let mut handled: HashSet<(RoomId, NaiveDate)> = tables
            .housekeeping
            .values()
            .map(|task| (task.details.room_id, task.details.request_date.date()))
            .collect();

        let mut created = Vec::new();
        for details in tasks {
            if !handled.insert((details.room_id, details.request_date.date())) {
                continue;
            }
            let task = HousekeepingTask {
                id: HousekeepingTaskId(tables.next_id()),
                details,
            };
            tables.housekeeping.insert(task.id, task.clone());
            created.push(task);
        }
        Ok(created)
    }
}

impl HotelRepository for InMemoryHotelRepository {
    fn room_status_inputs(&self) -> Result<Vec<RoomStatusInputs>, RepositoryError> {
        let tables = self.tables()?;
        let rooms: Vec<Room> = tables.rooms.values().cloned().collect();
        let maintenance: Vec<MaintenanceRequest> = tables.maintenance.values().cloned().collect();
        Ok(compute_status_inputs(
            &rooms,
            &tables.all_reservations(),
            &maintenance,
        ))
    }

    fn available_rooms(&self, window: StayWindow) -> Result<Vec<Room>, RepositoryError> {
        let tables = self.tables()?;
        let rooms = tables.rooms.values().cloned().collect();
        Ok(filter_available(rooms, &tables.all_reservations(), window))
    }
}
