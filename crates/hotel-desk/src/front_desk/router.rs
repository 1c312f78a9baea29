use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::warn;

use super::domain::{
    AssignmentId, EmployeeId, HousekeepingDetails, HousekeepingStatus, HousekeepingTaskId,
    MaintenanceDetails, MaintenanceRequestId, MaintenanceStatus, ReservationDetails,
    ReservationDraft, ReservationId, ReservationStatus, RoomAssignmentDraft, RoomDraft, RoomId,
    RoomStatus, ValidationError,
};
use super::repository::{HotelRepository, RepositoryError};
use super::service::{FrontDeskError, FrontDeskService};

type SharedService<R> = State<Arc<FrontDeskService<R>>>;

/// Router builder exposing the front desk endpoints.
pub fn front_desk_router<R>(service: Arc<FrontDeskService<R>>) -> Router
where
    R: HotelRepository + 'static,
{
    Router::new()
        .route("/api/rooms", get(list_rooms::<R>).post(create_room::<R>))
        .route("/api/rooms/available", get(available_rooms::<R>))
        .route("/api/rooms/refresh", post(refresh_rooms::<R>))
        .route("/api/rooms/status/:status", get(rooms_by_status::<R>))
        .route("/api/rooms/exists/:number", get(room_exists::<R>))
        .route(
            "/api/rooms/:id",
            get(get_room::<R>)
                .put(update_room::<R>)
                .delete(delete_room::<R>),
        )
        .route(
            "/api/reservations",
            get(list_reservations::<R>).post(create_reservation::<R>),
        )
        .route(
            "/api/reservations/status/:status",
            get(reservations_by_status::<R>),
        )
        .route(
            "/api/reservations/after/:date",
            get(reservations_after::<R>),
        )
        .route(
            "/api/reservations/:id",
            get(get_reservation::<R>)
                .put(update_reservation::<R>)
                .delete(delete_reservation::<R>),
        )
        .route(
            "/api/reservations/:id/rooms",
            get(reservation_rooms::<R>).post(add_reservation_room::<R>),
        )
        .route(
            "/api/reservations/:id/rooms/:assignment_id",
            put(update_reservation_room::<R>).delete(delete_reservation_room::<R>),
        )
        .route(
            "/api/maintenance-requests",
            get(list_maintenance::<R>).post(create_maintenance::<R>),
        )
        .route(
            "/api/maintenance-requests/status/:status",
            get(maintenance_by_status::<R>),
        )
        .route(
            "/api/maintenance-requests/room/:room_id",
            get(maintenance_by_room::<R>),
        )
        .route(
            "/api/maintenance-requests/assignee/:employee_id",
            get(maintenance_by_assignee::<R>),
        )
        .route(
            "/api/maintenance-requests/:id",
            get(get_maintenance::<R>)
                .put(update_maintenance::<R>)
                .delete(delete_maintenance::<R>),
        )
        .route(
            "/api/housekeeping-tasks",
            get(list_housekeeping::<R>).post(create_housekeeping::<R>),
        )
        .route(
            "/api/housekeeping-tasks/daily",
            post(assign_daily_cleaning::<R>),
        )
        .route(
            "/api/housekeeping-tasks/status/:status",
            get(housekeeping_by_status::<R>),
        )
        .route(
            "/api/housekeeping-tasks/employee/:employee_id",
            get(housekeeping_by_employee::<R>),
        )
        .route(
            "/api/housekeeping-tasks/:id",
            get(get_housekeeping::<R>)
                .put(update_housekeeping::<R>)
                .delete(delete_housekeeping::<R>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct AvailabilityParams {
    pub(crate) from: NaiveDate,
    pub(crate) to: NaiveDate,
}

#[derive(Debug, Serialize)]
struct ExistsView {
    room_number: String,
    exists: bool,
}

fn respond<T: Serialize>(status: StatusCode, result: Result<T, FrontDeskError>) -> Response {
    match result {
        Ok(body) => (status, Json(body)).into_response(),
        Err(error) => error_response(error),
    }
}

fn no_content(result: Result<(), FrontDeskError>) -> Response {
    match result {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) fn error_response(error: FrontDeskError) -> Response {
    let status = match &error {
        FrontDeskError::Validation(ValidationError::DuplicateRoomNumber(_)) => StatusCode::CONFLICT,
        FrontDeskError::Validation(_) => StatusCode::BAD_REQUEST,
        FrontDeskError::Repository(RepositoryError::NotFound { .. }) => StatusCode::NOT_FOUND,
        FrontDeskError::Repository(RepositoryError::Conflict(_)) => StatusCode::CONFLICT,
        FrontDeskError::Repository(RepositoryError::Unavailable(_)) => {
            warn!(error = %error, "front desk storage failure");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    let payload = json!({ "error": error.to_string() });
    (status, Json(payload)).into_response()
}

// Rooms

pub(crate) async fn list_rooms<R: HotelRepository + 'static>(
    State(service): SharedService<R>,
) -> Response {
    respond(StatusCode::OK, service.rooms())
}

pub(crate) async fn get_room<R: HotelRepository + 'static>(
    State(service): SharedService<R>,
    Path(id): Path<u64>,
) -> Response {
    respond(StatusCode::OK, service.room(RoomId(id)))
}

pub(crate) async fn create_room<R: HotelRepository + 'static>(
    State(service): SharedService<R>,
    Json(draft): Json<RoomDraft>,
) -> Response {
    respond(StatusCode::CREATED, service.create_room(draft))
}

pub(crate) async fn update_room<R: HotelRepository + 'static>(
    State(service): SharedService<R>,
    Path(id): Path<u64>,
    Json(draft): Json<RoomDraft>,
) -> Response {
    respond(StatusCode::OK, service.update_room(RoomId(id), draft))
}

pub(crate) async fn delete_room<R: HotelRepository + 'static>(
    State(service): SharedService<R>,
    Path(id): Path<u64>,
) -> Response {
    no_content(service.delete_room(RoomId(id)))
}

pub(crate) async fn rooms_by_status<R: HotelRepository + 'static>(
    State(service): SharedService<R>,
    Path(status): Path<RoomStatus>,
) -> Response {
    respond(StatusCode::OK, service.rooms_with_status(status))
}

pub(crate) async fn room_exists<R: HotelRepository + 'static>(
    State(service): SharedService<R>,
    Path(number): Path<String>,
) -> Response {
    let result = service
        .room_number_exists(&number)
        .map(|exists| ExistsView {
            room_number: number.clone(),
            exists,
        });
    respond(StatusCode::OK, result)
}

pub(crate) async fn available_rooms<R: HotelRepository + 'static>(
    State(service): SharedService<R>,
    Query(params): Query<AvailabilityParams>,
) -> Response {
    respond(
        StatusCode::OK,
        service.available_rooms(params.from, params.to),
    )
}

pub(crate) async fn refresh_rooms<R: HotelRepository + 'static>(
    State(service): SharedService<R>,
) -> Response {
    respond(StatusCode::OK, service.refresh_room_statuses())
}

// Reservations

pub(crate) async fn list_reservations<R: HotelRepository + 'static>(
    State(service): SharedService<R>,
) -> Response {
    respond(StatusCode::OK, service.reservations())
}

pub(crate) async fn get_reservation<R: HotelRepository + 'static>(
    State(service): SharedService<R>,
    Path(id): Path<u64>,
) -> Response {
    respond(StatusCode::OK, service.reservation(ReservationId(id)))
}

pub(crate) async fn create_reservation<R: HotelRepository + 'static>(
    State(service): SharedService<R>,
    Json(draft): Json<ReservationDraft>,
) -> Response {
    respond(StatusCode::CREATED, service.create_reservation(draft))
}

pub(crate) async fn update_reservation<R: HotelRepository + 'static>(
    State(service): SharedService<R>,
    Path(id): Path<u64>,
    Json(details): Json<ReservationDetails>,
) -> Response {
    respond(
        StatusCode::OK,
        service.update_reservation(ReservationId(id), details),
    )
}

pub(crate) async fn delete_reservation<R: HotelRepository + 'static>(
    State(service): SharedService<R>,
    Path(id): Path<u64>,
) -> Response {
    no_content(service.delete_reservation(ReservationId(id)))
}

pub(crate) async fn reservations_by_status<R: HotelRepository + 'static>(
    State(service): SharedService<R>,
    Path(status): Path<ReservationStatus>,
) -> Response {
    respond(StatusCode::OK, service.reservations_with_status(status))
}

pub(crate) async fn reservations_after<R: HotelRepository + 'static>(
    State(service): SharedService<R>,
    Path(date): Path<NaiveDate>,
) -> Response {
    respond(StatusCode::OK, service.reservations_starting_after(date))
}

// Room assignments

pub(crate) async fn reservation_rooms<R: HotelRepository + 'static>(
    State(service): SharedService<R>,
    Path(id): Path<u64>,
) -> Response {
    respond(StatusCode::OK, service.reservation_rooms(ReservationId(id)))
}

pub(crate) async fn add_reservation_room<R: HotelRepository + 'static>(
    State(service): SharedService<R>,
    Path(id): Path<u64>,
    Json(draft): Json<RoomAssignmentDraft>,
) -> Response {
    respond(
        StatusCode::CREATED,
        service.add_room(ReservationId(id), draft),
    )
}

pub(crate) async fn update_reservation_room<R: HotelRepository + 'static>(
    State(service): SharedService<R>,
    Path((id, assignment_id)): Path<(u64, u64)>,
    Json(draft): Json<RoomAssignmentDraft>,
) -> Response {
    respond(
        StatusCode::OK,
        service.update_room_assignment(ReservationId(id), AssignmentId(assignment_id), draft),
    )
}

pub(crate) async fn delete_reservation_room<R: HotelRepository + 'static>(
    State(service): SharedService<R>,
    Path((id, assignment_id)): Path<(u64, u64)>,
) -> Response {
    no_content(service.remove_room_assignment(ReservationId(id), AssignmentId(assignment_id)))
}

// Maintenance

pub(crate) async fn list_maintenance<R: HotelRepository + 'static>(
    State(service): SharedService<R>,
) -> Response {
    respond(StatusCode::OK, service.maintenance_requests())
}

pub(crate) async fn get_maintenance<R: HotelRepository + 'static>(
    State(service): SharedService<R>,
    Path(id): Path<u64>,
) -> Response {
    respond(
        StatusCode::OK,
        service.maintenance_request(MaintenanceRequestId(id)),
    )
}

pub(crate) async fn create_maintenance<R: HotelRepository + 'static>(
    State(service): SharedService<R>,
    Json(details): Json<MaintenanceDetails>,
) -> Response {
    respond(
        StatusCode::CREATED,
        service.create_maintenance_request(details),
    )
}

pub(crate) async fn update_maintenance<R: HotelRepository + 'static>(
    State(service): SharedService<R>,
    Path(id): Path<u64>,
    Json(details): Json<MaintenanceDetails>,
) -> Response {
    respond(
        StatusCode::OK,
        service.update_maintenance_request(MaintenanceRequestId(id), details),
    )
}

pub(crate) async fn delete_maintenance<R: HotelRepository + 'static>(
    State(service): SharedService<R>,
    Path(id): Path<u64>,
) -> Response {
    no_content(service.delete_maintenance_request(MaintenanceRequestId(id)))
}

pub(crate) async fn maintenance_by_status<R: HotelRepository + 'static>(
    State(service): SharedService<R>,
    Path(status): Path<MaintenanceStatus>,
) -> Response {
    respond(StatusCode::OK, service.maintenance_with_status(status))
}

pub(crate) async fn maintenance_by_room<R: HotelRepository + 'static>(
    State(service): SharedService<R>,
    Path(room_id): Path<u64>,
) -> Response {
    respond(StatusCode::OK, service.maintenance_for_room(RoomId(room_id)))
}

pub(crate) async fn maintenance_by_assignee<R: HotelRepository + 'static>(
    State(service): SharedService<R>,
    Path(employee_id): Path<u64>,
) -> Response {
    respond(
        StatusCode::OK,
        service.maintenance_for_assignee(EmployeeId(employee_id)),
    )
}

// Housekeeping

pub(crate) async fn list_housekeeping<R: HotelRepository + 'static>(
    State(service): SharedService<R>,
) -> Response {
    respond(StatusCode::OK, service.housekeeping_tasks())
}

pub(crate) async fn get_housekeeping<R: HotelRepository + 'static>(
    State(service): SharedService<R>,
    Path(id): Path<u64>,
) -> Response {
    respond(
        StatusCode::OK,
        service.housekeeping_task(HousekeepingTaskId(id)),
    )
}

pub(crate) async fn create_housekeeping<R: HotelRepository + 'static>(
    State(service): SharedService<R>,
    Json(details): Json<HousekeepingDetails>,
) -> Response {
    respond(StatusCode::CREATED, service.create_housekeeping_task(details))
}

pub(crate) async fn update_housekeeping<R: HotelRepository + 'static>(
    State(service): SharedService<R>,
    Path(id): Path<u64>,
    Json(details): Json<HousekeepingDetails>,
) -> Response {
    respond(
        StatusCode::OK,
        service.update_housekeeping_task(HousekeepingTaskId(id), details),
    )
}

pub(crate) async fn delete_housekeeping<R: HotelRepository + 'static>(
    State(service): SharedService<R>,
    Path(id): Path<u64>,
) -> Response {
    no_content(service.delete_housekeeping_task(HousekeepingTaskId(id)))
}

pub(crate) async fn housekeeping_by_status<R: HotelRepository + 'static>(
    State(service): SharedService<R>,
    Path(status): Path<HousekeepingStatus>,
) -> Response {
    respond(StatusCode::OK, service.housekeeping_with_status(status))
}

pub(crate) async fn housekeeping_by_employee<R: HotelRepository + 'static>(
    State(service): SharedService<R>,
    Path(employee_id): Path<u64>,
) -> Response {
    respond(
        StatusCode::OK,
        service.housekeeping_for_employee(EmployeeId(employee_id)),
    )
}

pub(crate) async fn assign_daily_cleaning<R: HotelRepository + 'static>(
    State(service): SharedService<R>,
) -> Response {
    let now = Local::now().naive_local();
    respond(StatusCode::CREATED, service.assign_daily_cleaning(now))
}
