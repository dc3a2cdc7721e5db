//! Translation of domain failures into HTTP responses.

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use log::error;
use shared::ErrorResponse;

use crate::backend::domain::errors::{AccountError, AuthError, ReservationError};

/// Any failure leaving a handler. The message reaches the client unchanged.
#[derive(Debug)]
pub struct ApiError(anyhow::Error);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        if let Some(e) = self.0.downcast_ref::<ReservationError>() {
            return match e {
                ReservationError::NotFound(_) => StatusCode::NOT_FOUND,
                ReservationError::SlotTaken { .. } => StatusCode::CONFLICT,
                ReservationError::NotOwner => StatusCode::FORBIDDEN,
                ReservationError::InvalidDate(_)
                | ReservationError::InvalidTime(_)
                | ReservationError::UnsupportedStartTime(_)
                | ReservationError::PastDate(_)
                | ReservationError::InvalidMonth(_) => StatusCode::BAD_REQUEST,
            };
        }
        if let Some(e) = self.0.downcast_ref::<AuthError>() {
            return match e {
                AuthError::InvalidCredentials | AuthError::MissingToken | AuthError::InvalidSession => {
                    StatusCode::UNAUTHORIZED
                }
                AuthError::AccountDeactivated | AuthError::AdminRequired => StatusCode::FORBIDDEN,
            };
        }
        if let Some(e) = self.0.downcast_ref::<AccountError>() {
            return match e {
                AccountError::NotFound(_) => StatusCode::NOT_FOUND,
                AccountError::EmailTaken(_) => StatusCode::CONFLICT,
                AccountError::InvalidEmail(_) | AccountError::PasswordTooShort(_) => {
                    StatusCode::BAD_REQUEST
                }
            };
        }
        if let Some(e) = self.0.downcast_ref::<JsonRejection>() {
            return e.status();
        }
        if let Some(e) = self.0.downcast_ref::<QueryRejection>() {
            return e.status();
        }
        if let Some(e) = self.0.downcast_ref::<PathRejection>() {
            return e.status();
        }
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

impl<E> From<E> for ApiError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {:#}", self.0);
        }
        let body = ErrorResponse {
            error: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
