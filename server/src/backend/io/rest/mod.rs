//! # REST API Interface Layer
//!
//! JSON endpoints under `/api`. Handlers translate DTOs from the `shared`
//! crate to domain commands, call one service, and map the result back.
//! Failures become an [`shared::ErrorResponse`] whose status comes from the
//! typed domain error (see [`error`]).

pub mod admin_reservation_apis;
pub mod auth_apis;
pub mod availability_apis;
pub mod calendar_apis;
pub mod error;
pub mod extract;
pub mod log_apis;
pub mod mappers;
pub mod reservation_apis;
pub mod session;
pub mod user_apis;

pub use error::ApiError;
pub use extract::{ApiJson, ApiPath, ApiQuery};
pub use session::{AdminSession, CurrentSession};
