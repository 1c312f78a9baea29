use chrono::{Duration, Local, NaiveDate, NaiveDateTime};
use clap::Args;
use hotel_desk::error::AppError;
use hotel_desk::front_desk::{
    EmployeeId, FrontDeskService, GuestContact, HotelRepository, InMemoryHotelRepository,
    MaintenanceDetails, MaintenanceRepository, MaintenanceStatus, ReservationDetails,
    ReservationRepository, ReservationStatus, Room, RoomAssignmentDraft, RoomDraft, RoomId,
    RoomRepository,
};
use rust_decimal::Decimal;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Business date for the demo (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Start of the availability query. Defaults to today + 2 days.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) from: Option<NaiveDate>,
    /// End of the availability query. Defaults to today + 4 days.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) to: Option<NaiveDate>,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let from = args.from.unwrap_or(today + Duration::days(2));
    let to = args.to.unwrap_or(today + Duration::days(4));

    let repository = Arc::new(InMemoryHotelRepository::default());
    let rooms = seed_sample_hotel(repository.as_ref(), today)?;
    let service = FrontDeskService::new(repository.clone());

    println!("Hotel front desk demo for {today}");
    println!("\nImported rooms (statuses not yet derived)");
    render_rooms(&service.rooms()?);

    let summary = service.refresh_room_statuses()?;
    println!(
        "\nStatus sweep: {} rooms scanned, {} updated ({} available / {} occupied / {} out of service)",
        summary.rooms_scanned,
        summary.rooms_updated,
        summary.available,
        summary.occupied,
        summary.out_of_service
    );
    render_rooms(&service.rooms()?);

    println!("\nWhy each room landed where it did");
    for inputs in repository.room_status_inputs().map_err(into_app_error)? {
        let number = room_number(&rooms, inputs.room_id);
        println!(
            "  - {number}: active stay={} | open maintenance={} -> {}",
            inputs.has_active_reservation,
            inputs.has_pending_maintenance,
            inputs.derived_status().label()
        );
    }

    let morning = morning_of(today);
    let tasks = service.assign_daily_cleaning(morning)?;
    println!("\nDaily cleaning at {morning}");
    if tasks.is_empty() {
        println!("  - no rooms need cleaning");
    }
    for task in &tasks {
        println!(
            "  - {} ({})",
            room_number(&rooms, task.details.room_id),
            task.details.description
        );
    }

    let available = service.available_rooms(from, to)?;
    println!("\nRooms free between {from} and {to}");
    if available.is_empty() {
        println!("  - none");
    }
    for room in &available {
        println!(
            "  - {} | floor {} | {} beds | {} per night",
            room.room_number, room.floor, room.bed_count, room.price_per_night
        );
    }

    Ok(())
}

/// Loads R1-R4 straight into storage, the way a data import would, so the
/// first sweep has real work to do.
fn seed_sample_hotel(
    repository: &InMemoryHotelRepository,
    today: NaiveDate,
) -> Result<Vec<Room>, AppError> {
    let mut rooms = Vec::with_capacity(4);
    for (number, floor, beds, cents) in [
        ("R1", 1, 1, 8900),
        ("R2", 1, 2, 12900),
        ("R3", 2, 2, 12900),
        ("R4", 2, 3, 17900),
    ] {
        let room = repository
            .insert_room(RoomDraft {
                room_number: number.to_string(),
                floor,
                bed_count: beds,
                price_per_night: Decimal::new(cents, 2),
            })
            .map_err(into_app_error)?;
        rooms.push(room);
    }

    let filed = morning_of(today - Duration::days(2));
    for (room, status, description) in [
        (&rooms[0], MaintenanceStatus::Completed, "Replaced bedside lamp"),
        (&rooms[2], MaintenanceStatus::InProgress, "Repainting bathroom ceiling"),
        (&rooms[3], MaintenanceStatus::Pending, "Air conditioning rattles"),
    ] {
        repository
            .insert_maintenance(MaintenanceDetails {
                request_date: filed,
                description: description.to_string(),
                room_id: Some(room.id),
                requester_id: EmployeeId(1),
                assignee_id: Some(EmployeeId(7)),
                status,
                completion_date: (status == MaintenanceStatus::Completed)
                    .then(|| filed + Duration::hours(3)),
                service_summary: None,
            })
            .map_err(into_app_error)?;
    }

    let stays = [
        (&rooms[1], ReservationStatus::Active, -1, 2, "Mira", "Castell"),
        (&rooms[3], ReservationStatus::Active, -1, 2, "Jonas", "Berg"),
        (&rooms[0], ReservationStatus::Upcoming, 3, 6, "Lea", "Moreau"),
    ];
    for (room, status, start, end, first_name, last_name) in stays {
        repository
            .insert_reservation(
                ReservationDetails {
                    start_date: today + Duration::days(start),
                    end_date: today + Duration::days(end),
                    status,
                    guest: GuestContact {
                        first_name: first_name.to_string(),
                        last_name: last_name.to_string(),
                        national_id: None,
                        phone: None,
                    },
                    special_requests: None,
                    catering: false,
                    invoice_id: None,
                },
                vec![RoomAssignmentDraft {
                    room_id: room.id,
                    guest_count: 2,
                }],
                filed,
            )
            .map_err(into_app_error)?;
    }

    Ok(rooms)
}

fn into_app_error(err: hotel_desk::front_desk::RepositoryError) -> AppError {
    AppError::FrontDesk(err.into())
}

fn render_rooms(rooms: &[Room]) {
    for room in rooms {
        println!("  - {}: {}", room.room_number, room.status.label());
    }
}

fn room_number(rooms: &[Room], id: RoomId) -> String {
    rooms
        .iter()
        .find(|room| room.id == id)
        .map(|room| room.room_number.clone())
        .unwrap_or_else(|| format!("room {id}"))
}

fn morning_of(day: NaiveDate) -> NaiveDateTime {
    day.and_hms_opt(8, 0, 0).unwrap_or_else(|| day.and_time(Default::default()))
}
