//! Domain-level command and result types.
//!
//! Services take and return these; the REST layer maps the public DTOs in the
//! `shared` crate to and from them.

pub mod reservations {
    use crate::backend::domain::models::reservation::Reservation;

    /// Input for submitting a reservation. Date and time are raw client strings.
    #[derive(Debug, Clone)]
    pub struct SubmitReservationCommand {
        pub date: String,
        pub start_time: String,
    }

    /// Whether a submission inserted a row or revived an existing one
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum SubmitOutcome {
        Created,
        Reactivated,
    }

    #[derive(Debug, Clone)]
    pub struct SubmitReservationResult {
        pub reservation: Reservation,
        pub outcome: SubmitOutcome,
        pub success_message: String,
    }

    /// Reservation joined with its owner's email; `None` when the owner no
    /// longer exists.
    #[derive(Debug, Clone)]
    pub struct ReservationWithOwner {
        pub reservation: Reservation,
        pub user_email: Option<String>,
    }

    /// Result of accepting, declining or cancelling a reservation.
    #[derive(Debug, Clone)]
    pub struct ReservationActionResult {
        pub reservation: Reservation,
        pub success_message: String,
    }
}

pub mod accounts {
    use crate::backend::domain::models::user::{Role, User};

    #[derive(Debug, Clone)]
    pub struct CreateAccountCommand {
        pub email: String,
        pub password: String,
        pub student_id: Option<String>,
        pub role: Role,
    }

    /// Fields left as `None` are unchanged
    #[derive(Debug, Clone, Default)]
    pub struct UpdateAccountCommand {
        pub user_id: String,
        pub email: Option<String>,
        pub password: Option<String>,
        pub student_id: Option<String>,
    }

    #[derive(Debug, Clone)]
    pub struct AccountResult {
        pub user: User,
        pub success_message: String,
    }
}

pub mod availability {
    #[derive(Debug, Clone)]
    pub struct DeclareAvailabilityCommand {
        pub date: String,
        pub start_time: String,
        /// Defaults to the configured room
        pub room: Option<String>,
        /// Defaults to true
        pub is_available: Option<bool>,
    }
}
