use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{delete, get, post},
    Router,
};
use log::{error, info};
use shared::{
    DeleteResponse, ReservationActionResponse, ReservationHistoryResponse, ReservationListResponse,
};

use super::error::ApiError;
use super::extract::ApiPath;
use super::mappers::ReservationMapper;
use super::session::AdminSession;
use crate::backend::domain::commands::reservations::ReservationActionResult;
use crate::backend::AppState;

/// Create a router for administrator reservation management
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_schedule))
        .route("/history", get(list_history))
        .route("/:id", delete(delete_reservation))
        .route("/:id/accept", post(accept_reservation))
        .route("/:id/decline", post(decline_reservation))
        .route("/:id/cancel", post(cancel_reservation))
}

/// All reservations ordered by date
async fn list_schedule(
    State(state): State<AppState>,
    AdminSession(_admin): AdminSession,
) -> impl IntoResponse {
    info!("GET /api/admin/reservations");

    match state.reservation_service.list_schedule().await {
        Ok(reservations) => {
            let response = ReservationListResponse {
                reservations: ReservationMapper::to_dto_list(reservations),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!("Failed to list schedule: {}", e);
            ApiError::from(e).into_response()
        }
    }
}

/// All reservations with owner email, newest first
async fn list_history(
    State(state): State<AppState>,
    AdminSession(_admin): AdminSession,
) -> impl IntoResponse {
    info!("GET /api/admin/reservations/history");

    match state.reservation_service.list_history().await {
        Ok(rows) => {
            let response = ReservationHistoryResponse {
                reservations: rows.into_iter().map(ReservationMapper::with_owner_to_dto).collect(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!("Failed to list reservation history: {}", e);
            ApiError::from(e).into_response()
        }
    }
}

async fn accept_reservation(
    State(state): State<AppState>,
    AdminSession(admin): AdminSession,
    ApiPath(reservation_id): ApiPath<String>,
) -> Response {
    info!("POST /api/admin/reservations/{}/accept", reservation_id);
    action_response(state.reservation_service.accept_reservation(&admin, &reservation_id).await)
}

async fn decline_reservation(
    State(state): State<AppState>,
    AdminSession(admin): AdminSession,
    ApiPath(reservation_id): ApiPath<String>,
) -> Response {
    info!("POST /api/admin/reservations/{}/decline", reservation_id);
    action_response(state.reservation_service.decline_reservation(&admin, &reservation_id).await)
}

async fn cancel_reservation(
    State(state): State<AppState>,
    AdminSession(admin): AdminSession,
    ApiPath(reservation_id): ApiPath<String>,
) -> Response {
    info!("POST /api/admin/reservations/{}/cancel", reservation_id);
    action_response(state.reservation_service.cancel_reservation(&admin, &reservation_id).await)
}

async fn delete_reservation(
    State(state): State<AppState>,
    AdminSession(admin): AdminSession,
    ApiPath(reservation_id): ApiPath<String>,
) -> impl IntoResponse {
    info!("DELETE /api/admin/reservations/{}", reservation_id);

    match state.reservation_service.delete_reservation(&admin, &reservation_id).await {
        Ok(()) => {
            let response = DeleteResponse {
                success_message: "Reservation deleted successfully!".to_string(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!("Failed to delete reservation {}: {}", reservation_id, e);
            ApiError::from(e).into_response()
        }
    }
}

fn action_response(result: anyhow::Result<ReservationActionResult>) -> Response {
    match result {
        Ok(result) => {
            let response = ReservationActionResponse {
                reservation: ReservationMapper::to_dto(result.reservation),
                success_message: result.success_message,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!("Reservation action failed: {}", e);
            ApiError::from(e).into_response()
        }
    }
}
