//! # Domain Module
//!
//! Business logic for the laboratory reservation service, independent of the
//! HTTP layer and of the storage backend.
//!
//! ## Module Organization
//!
//! - **calendar**: projects a user's reservations onto a month grid
//! - **slot_conflict**: decides create / reactivate / reject for a submission
//! - **reservation_service**: submission, listing and lifecycle changes
//! - **auth_service** / **sessions**: sign-in and bearer-token sessions
//! - **user_service**: account management
//! - **availability_service**: administrator-declared lab windows
//! - **audit_log_service**: action history shown to administrators
//! - **clock**: injectable current time

pub mod audit_log_service;
pub mod auth_service;
pub mod availability_service;
pub mod calendar;
pub mod clock;
pub mod commands;
pub mod errors;
pub mod models;
pub mod reservation_service;
pub mod sessions;
pub mod slot_conflict;
pub mod user_service;

pub use audit_log_service::AuditLogService;
pub use auth_service::AuthService;
pub use availability_service::AvailabilityService;
pub use calendar::CalendarService;
pub use clock::{Clock, FixedClock, SystemClock};
pub use reservation_service::ReservationService;
pub use sessions::SessionRegistry;
pub use slot_conflict::{SlotConflictChecker, SlotDecision};
pub use user_service::UserService;
