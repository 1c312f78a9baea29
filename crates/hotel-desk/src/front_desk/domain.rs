use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<$name> for u64 {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

entity_id!(
    /// Identifier of a physical room.
    RoomId
);
entity_id!(
    /// Identifier of a guest reservation.
    ReservationId
);
entity_id!(
    /// Identifier of a reservation-to-room assignment.
    AssignmentId
);
entity_id!(MaintenanceRequestId);
entity_id!(HousekeepingTaskId);
entity_id!(
    /// Employee reference; employee records live outside this service.
    EmployeeId
);
entity_id!(
    /// Invoice reference; invoices live outside this service.
    InvoiceId
);

/// Cached room state. The refresh sweep only produces `Available`, `Occupied`
/// and `OutOfService`; the remaining variants are display states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomStatus {
    Available,
    Occupied,
    OutOfService,
    Cleaning,
    Maintenance,
}

impl RoomStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Available => "Available",
            Self::Occupied => "Occupied",
            Self::OutOfService => "Out of service",
            Self::Cleaning => "Cleaning",
            Self::Maintenance => "Maintenance",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    Active,
    Upcoming,
    Cancelled,
    Completed,
}

impl ReservationStatus {
    /// Statuses that make a room unavailable for an overlapping stay.
    pub const fn blocks_availability(self) -> bool {
        matches!(self, Self::Active | Self::Upcoming)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaintenanceStatus {
    Pending,
    InProgress,
    Completed,
}

impl MaintenanceStatus {
    pub const fn is_open(self) -> bool {
        !matches!(self, Self::Completed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HousekeepingStatus {
    Pending,
    InProgress,
    Completed,
    Declined,
}

/// Inclusive date range of a stay or of an availability query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StayWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl StayWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ValidationError> {
        if start > end {
            return Err(ValidationError::InvertedDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Two windows conflict unless one ends before the other begins.
    pub fn overlaps(&self, other: &StayWindow) -> bool {
        !(other.end < self.start || other.start > self.end)
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    pub room_number: String,
    pub floor: i32,
    pub bed_count: i32,
    pub price_per_night: Decimal,
    pub status: RoomStatus,
}

/// Writable room attributes. Status is derived and therefore not part of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomDraft {
    pub room_number: String,
    pub floor: i32,
    pub bed_count: i32,
    pub price_per_night: Decimal,
}

pub const ROOM_NUMBER_MAX_LEN: usize = 10;

impl RoomDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let number = self.room_number.trim();
        if number.is_empty() || number.chars().count() > ROOM_NUMBER_MAX_LEN {
            return Err(ValidationError::RoomNumber(self.room_number.clone()));
        }
        if self.bed_count <= 0 {
            return Err(ValidationError::BedCount(self.bed_count));
        }
        if self.price_per_night.is_sign_negative() {
            return Err(ValidationError::NegativePrice(self.price_per_night));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestContact {
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub national_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Scalar reservation fields shared by drafts, updates and stored records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationDetails {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: ReservationStatus,
    pub guest: GuestContact,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_requests: Option<String>,
    #[serde(default)]
    pub catering: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_id: Option<InvoiceId>,
}

impl ReservationDetails {
    pub fn stay(&self) -> Result<StayWindow, ValidationError> {
        StayWindow::new(self.start_date, self.end_date)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: ReservationId,
    #[serde(flatten)]
    pub details: ReservationDetails,
    pub modified_at: NaiveDateTime,
    pub rooms: Vec<ReservationRoom>,
}

impl Reservation {
    pub fn window(&self) -> StayWindow {
        StayWindow {
            start: self.details.start_date,
            end: self.details.end_date,
        }
    }

    pub fn status(&self) -> ReservationStatus {
        self.details.status
    }
}

/// Payload for a new reservation, optionally carrying its first room assignments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationDraft {
    #[serde(flatten)]
    pub details: ReservationDetails,
    #[serde(default)]
    pub rooms: Vec<RoomAssignmentDraft>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationRoom {
    pub id: AssignmentId,
    pub reservation_id: ReservationId,
    pub room_id: RoomId,
    pub guest_count: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomAssignmentDraft {
    pub room_id: RoomId,
    pub guest_count: i32,
}

impl RoomAssignmentDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.guest_count <= 0 {
            return Err(ValidationError::GuestCount(self.guest_count));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaintenanceRequest {
    pub id: MaintenanceRequestId,
    #[serde(flatten)]
    pub details: MaintenanceDetails,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaintenanceDetails {
    pub request_date: NaiveDateTime,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_id: Option<RoomId>,
    pub requester_id: EmployeeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<EmployeeId>,
    pub status: MaintenanceStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_date: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_summary: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HousekeepingTask {
    pub id: HousekeepingTaskId,
    #[serde(flatten)]
    pub details: HousekeepingDetails,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HousekeepingDetails {
    pub room_id: RoomId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<EmployeeId>,
    pub request_date: NaiveDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_date: Option<NaiveDateTime>,
    pub status: HousekeepingStatus,
    pub description: String,
}

/// Input rejected before it reaches storage.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("start date {start} is after end date {end}")]
    InvertedDateRange { start: NaiveDate, end: NaiveDate },
    #[error("guest count must be positive, got {0}")]
    GuestCount(i32),
    #[error("bed count must be positive, got {0}")]
    BedCount(i32),
    #[error("price per night cannot be negative, got {0}")]
    NegativePrice(Decimal),
    #[error("room number '{0}' must be 1-10 characters")]
    RoomNumber(String),
    #[error("room number '{0}' is already in use")]
    DuplicateRoomNumber(String),
    #[error("assignment {assignment} does not belong to reservation {reservation}")]
    AssignmentMismatch {
        assignment: AssignmentId,
        reservation: ReservationId,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, d).expect("valid date")
    }

    #[test]
    fn windows_touching_on_a_single_day_overlap() {
        let stay = StayWindow::new(day(1), day(5)).expect("ordered");
        let query = StayWindow::new(day(5), day(9)).expect("ordered");
        assert!(stay.overlaps(&query));
        assert!(query.overlaps(&stay));
    }

    #[test]
    fn disjoint_windows_do_not_overlap() {
        let stay = StayWindow::new(day(1), day(4)).expect("ordered");
        let query = StayWindow::new(day(5), day(9)).expect("ordered");
        assert!(!stay.overlaps(&query));
    }

    #[test]
    fn inverted_window_is_rejected() {
        assert_eq!(
            StayWindow::new(day(9), day(1)),
            Err(ValidationError::InvertedDateRange {
                start: day(9),
                end: day(1)
            })
        );
    }

    #[test]
    fn room_draft_rejects_long_numbers_and_empty_rooms() {
        let mut draft = RoomDraft {
            room_number: "101".to_string(),
            floor: 1,
            bed_count: 2,
            price_per_night: Decimal::new(18000, 2),
        };
        assert!(draft.validate().is_ok());

        draft.room_number = "B-1234567890".to_string();
        assert!(matches!(draft.validate(), Err(ValidationError::RoomNumber(_))));

        draft.room_number = "101".to_string();
        draft.bed_count = 0;
        assert_eq!(draft.validate(), Err(ValidationError::BedCount(0)));
    }

    #[test]
    fn statuses_serialize_as_snake_case() {
        let json = serde_json::to_string(&RoomStatus::OutOfService).expect("serializes");
        assert_eq!(json, "\"out_of_service\"");
        let parsed: MaintenanceStatus =
            serde_json::from_str("\"in_progress\"").expect("deserializes");
        assert_eq!(parsed, MaintenanceStatus::InProgress);
    }
}
