use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use axum::response::Response;
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde_json::Value;

use crate::front_desk::domain::{
    AssignmentId, EmployeeId, GuestContact, HousekeepingDetails, HousekeepingStatus,
    HousekeepingTask, HousekeepingTaskId, MaintenanceDetails, MaintenanceRequest,
    MaintenanceRequestId, MaintenanceStatus, Reservation, ReservationDetails, ReservationDraft,
    ReservationId, ReservationRoom, ReservationStatus, Room, RoomAssignmentDraft, RoomDraft,
    RoomId,
};
use crate::front_desk::memory::InMemoryHotelRepository;
use crate::front_desk::repository::{
    HotelRepository, HousekeepingRepository, MaintenanceRepository, RepositoryError,
    ReservationRepository, RoomRepository, RoomStatusChange,
};
use crate::front_desk::{front_desk_router, FrontDeskService};

pub(super) fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, d).expect("valid date")
}

pub(super) fn at(d: u32, hour: u32) -> NaiveDateTime {
    day(d).and_hms_opt(hour, 0, 0).expect("valid time")
}

pub(super) fn room_draft(number: &str) -> RoomDraft {
    RoomDraft {
        room_number: number.to_string(),
        floor: 1,
        bed_count: 2,
        price_per_night: Decimal::new(12500, 2),
    }
}

pub(super) fn guest() -> GuestContact {
    GuestContact {
        first_name: "Ada".to_string(),
        last_name: "Lindqvist".to_string(),
        national_id: None,
        phone: Some("+46 70 123 45 67".to_string()),
    }
}

pub(super) fn stay(status: ReservationStatus, start: NaiveDate, end: NaiveDate) -> ReservationDetails {
    ReservationDetails {
        start_date: start,
        end_date: end,
        status,
        guest: guest(),
        special_requests: None,
        catering: false,
        invoice_id: None,
    }
}

pub(super) fn booking(
    status: ReservationStatus,
    start: NaiveDate,
    end: NaiveDate,
    rooms: &[RoomId],
) -> ReservationDraft {
    ReservationDraft {
        details: stay(status, start, end),
        rooms: rooms
            .iter()
            .map(|room_id| RoomAssignmentDraft {
                room_id: *room_id,
                guest_count: 2,
            })
            .collect(),
    }
}

pub(super) fn maintenance(room_id: RoomId, status: MaintenanceStatus) -> MaintenanceDetails {
    MaintenanceDetails {
        request_date: at(1, 9),
        description: "Leaking radiator".to_string(),
        room_id: Some(room_id),
        requester_id: EmployeeId(1),
        assignee_id: Some(EmployeeId(2)),
        status,
        completion_date: None,
        service_summary: None,
    }
}

pub(super) fn cleaning(room_id: RoomId, employee: Option<u64>) -> HousekeepingDetails {
    HousekeepingDetails {
        room_id,
        employee_id: employee.map(EmployeeId),
        request_date: at(2, 10),
        completion_date: None,
        status: HousekeepingStatus::Pending,
        description: "Replace towels".to_string(),
    }
}

/// Rooms R1-R4 stored directly, bypassing the service so no sweep has run.
///
/// R1 has only completed maintenance, R2 an active stay, R3 work in progress,
/// R4 an active stay plus pending maintenance.
pub(super) fn seed_four_rooms(store: &InMemoryHotelRepository) -> [Room; 4] {
    let r1 = store.insert_room(room_draft("R1")).expect("R1 stored");
    let r2 = store.insert_room(room_draft("R2")).expect("R2 stored");
    let r3 = store.insert_room(room_draft("R3")).expect("R3 stored");
    let r4 = store.insert_room(room_draft("R4")).expect("R4 stored");

    store
        .insert_maintenance(maintenance(r1.id, MaintenanceStatus::Completed))
        .expect("R1 maintenance");
    store
        .insert_maintenance(maintenance(r3.id, MaintenanceStatus::InProgress))
        .expect("R3 maintenance");
    store
        .insert_maintenance(maintenance(r4.id, MaintenanceStatus::Pending))
        .expect("R4 maintenance");

    for room in [&r2, &r4] {
        let draft = booking(ReservationStatus::Active, day(1), day(5), &[room.id]);
        store
            .insert_reservation(draft.details, draft.rooms, at(1, 12))
            .expect("active stay");
    }

    [r1, r2, r3, r4]
}

pub(super) fn stored(store: &impl RoomRepository, id: RoomId) -> Room {
    store
        .fetch_room(id)
        .expect("fetch succeeds")
        .expect("room present")
}

pub(super) fn service_over(store: InMemoryHotelRepository) -> Arc<FrontDeskService<InMemoryHotelRepository>> {
    Arc::new(FrontDeskService::new(Arc::new(store)))
}

pub(super) fn router_over(store: InMemoryHotelRepository) -> axum::Router {
    front_desk_router(service_over(store))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("body readable");
    serde_json::from_slice(&bytes).expect("valid json body")
}

/// Wraps the in-memory store with switchable faults and a gauge that records
/// how many status snapshots are being taken at the same time.
#[derive(Default)]
pub(super) struct FaultyRepository {
    pub(super) inner: InMemoryHotelRepository,
    pub(super) fail_status_writes: AtomicBool,
    pub(super) offline: AtomicBool,
    pub(super) status_writes: AtomicUsize,
    in_flight: AtomicUsize,
    pub(super) max_in_flight: AtomicUsize,
}

impl FaultyRepository {
    pub(super) fn over(inner: InMemoryHotelRepository) -> Self {
        Self {
            inner,
            ..Self::default()
        }
    }

    fn check_online(&self) -> Result<(), RepositoryError> {
        if self.offline.load(Ordering::SeqCst) {
            Err(RepositoryError::Unavailable("store offline".to_string()))
        } else {
            Ok(())
        }
    }
}

impl RoomRepository for FaultyRepository {
    fn insert_room(&self, draft: RoomDraft) -> Result<Room, RepositoryError> {
        self.check_online()?;
        self.inner.insert_room(draft)
    }

    fn update_room(&self, id: RoomId, draft: RoomDraft) -> Result<Room, RepositoryError> {
        self.check_online()?;
        self.inner.update_room(id, draft)
    }

    fn fetch_room(&self, id: RoomId) -> Result<Option<Room>, RepositoryError> {
        self.check_online()?;
        self.inner.fetch_room(id)
    }

    fn rooms(&self) -> Result<Vec<Room>, RepositoryError> {
        self.check_online()?;
        let in_flight = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(in_flight, Ordering::SeqCst);
        thread::sleep(Duration::from_millis(5));
        let rooms = self.inner.rooms();
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        rooms
    }

    fn delete_room(&self, id: RoomId) -> Result<(), RepositoryError> {
        self.check_online()?;
        self.inner.delete_room(id)
    }

    fn room_number_taken(
        &self,
        room_number: &str,
        except: Option<RoomId>,
    ) -> Result<bool, RepositoryError> {
        self.check_online()?;
        self.inner.room_number_taken(room_number, except)
    }

    fn apply_room_statuses(&self, changes: &[RoomStatusChange]) -> Result<(), RepositoryError> {
        self.check_online()?;
        if self.fail_status_writes.load(Ordering::SeqCst) {
            return Err(RepositoryError::Unavailable(
                "status write rejected".to_string(),
            ));
        }
        self.status_writes.fetch_add(1, Ordering::SeqCst);
        self.inner.apply_room_statuses(changes)
    }
}

impl ReservationRepository for FaultyRepository {
    fn insert_reservation(
        &self,
        details: ReservationDetails,
        rooms: Vec<RoomAssignmentDraft>,
        modified_at: NaiveDateTime,
    ) -> Result<Reservation, RepositoryError> {
        self.check_online()?;
        self.inner.insert_reservation(details, rooms, modified_at)
    }

    fn update_reservation(
        &self,
        id: ReservationId,
        details: ReservationDetails,
        modified_at: NaiveDateTime,
    ) -> Result<Reservation, RepositoryError> {
        self.check_online()?;
        self.inner.update_reservation(id, details, modified_at)
    }

    fn fetch_reservation(&self, id: ReservationId) -> Result<Option<Reservation>, RepositoryError> {
        self.check_online()?;
        self.inner.fetch_reservation(id)
    }

    fn reservations(&self) -> Result<Vec<Reservation>, RepositoryError> {
        self.check_online()?;
        self.inner.reservations()
    }

    fn delete_reservation(&self, id: ReservationId) -> Result<Reservation, RepositoryError> {
        self.check_online()?;
        self.inner.delete_reservation(id)
    }

    fn insert_assignment(
        &self,
        reservation_id: ReservationId,
        draft: RoomAssignmentDraft,
    ) -> Result<ReservationRoom, RepositoryError> {
        self.check_online()?;
        self.inner.insert_assignment(reservation_id, draft)
    }

    fn update_assignment(
        &self,
        id: AssignmentId,
        draft: RoomAssignmentDraft,
    ) -> Result<ReservationRoom, RepositoryError> {
        self.check_online()?;
        self.inner.update_assignment(id, draft)
    }

    fn fetch_assignment(
        &self,
        id: AssignmentId,
    ) -> Result<Option<ReservationRoom>, RepositoryError> {
        self.check_online()?;
        self.inner.fetch_assignment(id)
    }

    fn delete_assignment(&self, id: AssignmentId) -> Result<(), RepositoryError> {
        self.check_online()?;
        self.inner.delete_assignment(id)
    }
}

impl MaintenanceRepository for FaultyRepository {
    fn insert_maintenance(
        &self,
        details: MaintenanceDetails,
    ) -> Result<MaintenanceRequest, RepositoryError> {
        self.check_online()?;
        self.inner.insert_maintenance(details)
    }

    fn update_maintenance(
        &self,
        id: MaintenanceRequestId,
        details: MaintenanceDetails,
    ) -> Result<MaintenanceRequest, RepositoryError> {
        self.check_online()?;
        self.inner.update_maintenance(id, details)
    }

    fn fetch_maintenance(
        &self,
        id: MaintenanceRequestId,
    ) -> Result<Option<MaintenanceRequest>, RepositoryError> {
        self.check_online()?;
        self.inner.fetch_maintenance(id)
    }

    fn maintenance_requests(&self) -> Result<Vec<MaintenanceRequest>, RepositoryError> {
        self.check_online()?;
        self.inner.maintenance_requests()
    }

    fn delete_maintenance(&self, id: MaintenanceRequestId) -> Result<(), RepositoryError> {
        self.check_online()?;
        self.inner.delete_maintenance(id)
    }
}

impl HousekeepingRepository for FaultyRepository {
    fn insert_housekeeping_task(
        &self,
        details: HousekeepingDetails,
    ) -> Result<HousekeepingTask, RepositoryError> {
        self.check_online()?;
        self.inner.insert_housekeeping_task(details)
    }

    fn update_housekeeping_task(
        &self,
        id: HousekeepingTaskId,
        details: HousekeepingDetails,
    ) -> Result<HousekeepingTask, RepositoryError> {
        self.check_online()?;
        self.inner.update_housekeeping_task(id, details)
    }

    fn fetch_housekeeping_task(
        &self,
        id: HousekeepingTaskId,
    ) -> Result<Option<HousekeepingTask>, RepositoryError> {
        self.check_online()?;
        self.inner.fetch_housekeeping_task(id)
    }

    fn housekeeping_tasks(&self) -> Result<Vec<HousekeepingTask>, RepositoryError> {
        self.check_online()?;
        self.inner.housekeeping_tasks()
    }

    fn delete_housekeeping_task(&self, id: HousekeepingTaskId) -> Result<(), RepositoryError> {
        self.check_online()?;
        self.inner.delete_housekeeping_task(id)
    }
}

// Relies on the provided read models, which compose the list methods above.
impl HotelRepository for FaultyRepository {}
