pub mod audit_log;
pub mod availability;
pub mod reservation;
pub mod session;
pub mod user;
