//! End-to-end front desk scenarios driven through the public service facade
//! and the HTTP router.

mod common {
    use std::sync::Arc;

    use chrono::{NaiveDate, NaiveDateTime};
    use rust_decimal::Decimal;

    use hotel_desk::front_desk::{
        EmployeeId, FrontDeskService, GuestContact, InMemoryHotelRepository, MaintenanceDetails,
        MaintenanceStatus, ReservationDetails, ReservationDraft, ReservationStatus, Room,
        RoomAssignmentDraft, RoomDraft,
    };

    pub(super) type Desk = FrontDeskService<InMemoryHotelRepository>;

    pub(super) fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, d).expect("valid date")
    }

    pub(super) fn at(d: u32, hour: u32) -> NaiveDateTime {
        day(d).and_hms_opt(hour, 0, 0).expect("valid time")
    }

    pub(super) fn desk() -> Arc<Desk> {
        Arc::new(FrontDeskService::new(Arc::new(
            InMemoryHotelRepository::default(),
        )))
    }

    pub(super) fn add_room(desk: &Desk, number: &str) -> Room {
        desk.create_room(RoomDraft {
            room_number: number.to_string(),
            floor: 2,
            bed_count: 2,
            price_per_night: Decimal::new(16900, 2),
        })
        .expect("room created")
    }

    pub(super) fn reservation(
        status: ReservationStatus,
        from: u32,
        to: u32,
        room: &Room,
    ) -> ReservationDraft {
        ReservationDraft {
            details: ReservationDetails {
                start_date: day(from),
                end_date: day(to),
                status,
                guest: GuestContact {
                    first_name: "Tomas".to_string(),
                    last_name: "Okafor".to_string(),
                    national_id: Some("850101-1234".to_string()),
                    phone: None,
                },
                special_requests: Some("Late check-in".to_string()),
                catering: true,
                invoice_id: None,
            },
            rooms: vec![RoomAssignmentDraft {
                room_id: room.id,
                guest_count: 2,
            }],
        }
    }

    pub(super) fn maintenance(room: &Room, status: MaintenanceStatus) -> MaintenanceDetails {
        MaintenanceDetails {
            request_date: at(1, 9),
            description: "Broken shower head".to_string(),
            room_id: Some(room.id),
            requester_id: EmployeeId(11),
            assignee_id: None,
            status,
            completion_date: None,
            service_summary: None,
        }
    }
}

mod status {
    use super::common::*;
    use hotel_desk::front_desk::{MaintenanceStatus, ReservationStatus, RoomStatus};

    #[test]
    fn four_room_scenario_settles_on_precedence() {
        let desk = desk();
        let r1 = add_room(&desk, "R1");
        let r2 = add_room(&desk, "R2");
        let r3 = add_room(&desk, "R3");
        let r4 = add_room(&desk, "R4");

        desk.create_maintenance_request(maintenance(&r1, MaintenanceStatus::Completed))
            .expect("R1 maintenance");
        desk.create_maintenance_request(maintenance(&r3, MaintenanceStatus::InProgress))
            .expect("R3 maintenance");
        desk.create_maintenance_request(maintenance(&r4, MaintenanceStatus::Pending))
            .expect("R4 maintenance");
        desk.create_reservation(reservation(ReservationStatus::Active, 1, 5, &r2))
            .expect("R2 stay");
        desk.create_reservation(reservation(ReservationStatus::Active, 1, 5, &r4))
            .expect("R4 stay");

        let summary = desk.refresh_room_statuses().expect("refresh");
        assert_eq!(summary.rooms_updated, 0);

        let status_of = |number: &str| {
            desk.rooms()
                .expect("rooms")
                .into_iter()
                .find(|room| room.room_number == number)
                .map(|room| room.status)
        };
        assert_eq!(status_of("R1"), Some(RoomStatus::Available));
        assert_eq!(status_of("R2"), Some(RoomStatus::Occupied));
        assert_eq!(status_of("R3"), Some(RoomStatus::OutOfService));
        assert_eq!(status_of("R4"), Some(RoomStatus::OutOfService));
    }

    #[test]
    fn empty_hotel_refreshes_cleanly() {
        let summary = desk().refresh_room_statuses().expect("refresh");
        assert_eq!(summary.rooms_scanned, 0);
        assert_eq!(summary.rooms_updated, 0);
    }
}

mod housekeeping {
    use super::common::*;
    use hotel_desk::front_desk::{ReservationStatus, DAILY_CLEANING_DESCRIPTION};

    #[test]
    fn morning_run_covers_guests_in_house() {
        let desk = desk();
        let suite = add_room(&desk, "701");
        let empty = add_room(&desk, "702");
        desk.create_reservation(reservation(ReservationStatus::Active, 1, 3, &suite))
            .expect("stay");

        let tasks = desk.assign_daily_cleaning(at(2, 8)).expect("assignment");

        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].details.room_id, suite.id);
        assert_ne!(tasks[0].details.room_id, empty.id);
        assert_eq!(tasks[0].details.description, DAILY_CLEANING_DESCRIPTION);
    }
}

mod routing {
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::common::*;
    use hotel_desk::front_desk::{front_desk_router, ReservationStatus};

    async fn body_json(response: axum::response::Response) -> Value {
        let body = to_bytes(response.into_body(), 64 * 1024)
            .await
            .expect("read body");
        serde_json::from_slice(&body).expect("json payload")
    }

    #[tokio::test]
    async fn maintenance_flow_takes_room_out_of_service_and_back() {
        let desk = desk();
        let room = add_room(&desk, "801");
        let router = front_desk_router(desk.clone());

        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/maintenance-requests")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        json!({
                            "request_date": "2025-07-01T09:30:00",
                            "description": "Window will not close",
                            "room_id": room.id,
                            "requester_id": 4,
                            "status": "pending"
                        })
                        .to_string(),
                    ))
                    .expect("request"),
            )
            .await
            .expect("router dispatch");
        assert_eq!(response.status(), StatusCode::CREATED);
        let request = body_json(response).await;
        let request_id = request["id"].as_u64().expect("request id");

        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri(format!("/api/rooms/{}", room.id))
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router dispatch");
        assert_eq!(body_json(response).await["status"], "out_of_service");

        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/api/maintenance-requests/{request_id}"))
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router dispatch");
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = router
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/api/rooms/status/available")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router dispatch");
        let rooms = body_json(response).await;
        assert_eq!(rooms.as_array().map(Vec::len), Some(1));
    }

    #[tokio::test]
    async fn moving_an_assignment_to_another_reservation_is_rejected() {
        let desk = desk();
        let room = add_room(&desk, "802");
        let first = desk
            .create_reservation(reservation(ReservationStatus::Upcoming, 10, 12, &room))
            .expect("first");
        let second = desk
            .create_reservation(reservation(ReservationStatus::Upcoming, 20, 22, &room))
            .expect("second");
        let router = front_desk_router(desk);

        let response = router
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri(format!(
                        "/api/reservations/{}/rooms/{}",
                        second.id, first.rooms[0].id
                    ))
                    .header("content-type", "application/json")
                    .body(Body::from(
                        json!({ "room_id": room.id, "guest_count": 1 }).to_string(),
                    ))
                    .expect("request"),
            )
            .await
            .expect("router dispatch");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let payload = body_json(response).await;
        assert!(payload["error"]
            .as_str()
            .unwrap_or_default()
            .contains("does not belong"));
    }

    #[tokio::test]
    async fn reservations_after_a_date_are_listed() {
        let desk = desk();
        let room = add_room(&desk, "803");
        desk.create_reservation(reservation(ReservationStatus::Upcoming, 10, 12, &room))
            .expect("stay");
        let router = front_desk_router(desk);

        let response = router
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/api/reservations/after/2025-07-09")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router dispatch");

        assert_eq!(response.status(), StatusCode::OK);
        let payload = body_json(response).await;
        assert_eq!(payload[0]["guest"]["last_name"], "Okafor");
        assert_eq!(payload[0]["catering"], true);
    }
}
