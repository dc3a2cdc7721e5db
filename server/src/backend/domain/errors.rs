//! Typed failures raised by the domain services.
//!
//! Services return `anyhow::Result`; the REST layer downcasts to these types
//! to pick a status code and passes the message through unchanged.

use chrono::NaiveDate;

#[derive(Debug, thiserror::Error)]
pub enum ReservationError {
    #[error("Reservation not found: {0}")]
    NotFound(String),
    #[error("Invalid date '{0}'. Expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("Invalid time '{0}'. Expected HH:MM")]
    InvalidTime(String),
    #[error("Unsupported start time '{0}'. Choose 08:00 (morning) or 13:00 (afternoon)")]
    UnsupportedStartTime(String),
    #[error("Cannot reserve {0}: the date is in the past")]
    PastDate(NaiveDate),
    #[error("The {slot} slot on {date} overlaps an existing reservation")]
    SlotTaken { date: NaiveDate, slot: String },
    #[error("Only the owner or an administrator can change this reservation")]
    NotOwner,
    #[error("Invalid month {0}. Must be between 1 and 12")]
    InvalidMonth(u32),
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Account is deactivated. Please contact admin.")]
    AccountDeactivated,
    #[error("Missing bearer token")]
    MissingToken,
    #[error("Session expired or invalid. Please sign in again.")]
    InvalidSession,
    #[error("Administrator access required")]
    AdminRequired,
}

#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("User not found: {0}")]
    NotFound(String),
    #[error("An account already exists for {0}")]
    EmailTaken(String),
    #[error("Invalid email address: '{0}'")]
    InvalidEmail(String),
    #[error("Password must be at least {0} characters")]
    PasswordTooShort(usize),
}
