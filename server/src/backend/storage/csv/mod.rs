//! # CSV / YAML storage backend
//!
//! Flat files under a single data directory, one file per logical table.

pub mod audit_log_repository;
pub mod availability_repository;
pub mod connection;
pub mod credential_repository;
pub mod reservation_repository;
pub mod user_repository;

#[cfg(test)]
pub mod test_utils;

pub use audit_log_repository::AuditLogRepository;
pub use availability_repository::AvailabilityRepository;
pub use connection::CsvConnection;
pub use credential_repository::CredentialRepository;
pub use reservation_repository::ReservationRepository;
pub use user_repository::UserRepository;
