//! Front desk back office: rooms, reservations, maintenance and housekeeping,
//! plus the sweep that keeps each room's stored status in line with them.

pub mod domain;
pub mod housekeeping;
pub mod memory;
pub mod repository;
pub mod router;
pub mod service;
pub mod status;

#[cfg(test)]
mod tests;

pub use domain::{
    AssignmentId, EmployeeId, GuestContact, HousekeepingDetails, HousekeepingStatus,
    HousekeepingTask, HousekeepingTaskId, InvoiceId, MaintenanceDetails, MaintenanceRequest,
    MaintenanceRequestId, MaintenanceStatus, Reservation, ReservationDetails, ReservationDraft,
    ReservationId, ReservationRoom, ReservationStatus, Room, RoomAssignmentDraft, RoomDraft,
    RoomId, RoomStatus, StayWindow, ValidationError,
};
pub use housekeeping::{DailyCleaningPlanner, DAILY_CLEANING_DESCRIPTION};
pub use memory::InMemoryHotelRepository;
pub use repository::{
    HotelRepository, HousekeepingRepository, MaintenanceRepository, RepositoryError,
    ReservationRepository, RoomRepository, RoomStatusChange, RoomStatusInputs,
};
pub use router::front_desk_router;
pub use service::{FrontDeskError, FrontDeskService, RefreshPolicy};
pub use status::{RefreshSummary, RoomStatusManager};
