//! Conversions between domain models and the `shared` DTOs.

pub mod audit_log_mapper;
pub mod availability_mapper;
pub mod reservation_mapper;
pub mod user_mapper;

pub use audit_log_mapper::AuditLogMapper;
pub use availability_mapper::AvailabilityMapper;
pub use reservation_mapper::ReservationMapper;
pub use user_mapper::UserMapper;
