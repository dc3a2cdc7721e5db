use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use log::{error, info};
use shared::{
    ReservationActionResponse, ReservationListResponse, SubmitOutcome, SubmitReservationRequest,
    SubmitReservationResponse,
};

use super::error::ApiError;
use super::extract::{ApiJson, ApiPath};
use super::mappers::ReservationMapper;
use super::session::CurrentSession;
use crate::backend::domain::commands::reservations::SubmitReservationCommand;
use crate::backend::AppState;

/// Create a router for the signed-in user's own reservations
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_my_reservations).post(submit_reservation))
        .route("/:id/cancel", post(cancel_reservation))
}

async fn list_my_reservations(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> impl IntoResponse {
    info!("GET /api/reservations - {}", session.email);

    match state.reservation_service.list_for_user(&session.user_id).await {
        Ok(reservations) => {
            let response = ReservationListResponse {
                reservations: ReservationMapper::to_dto_list(reservations),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!("Failed to list reservations: {}", e);
            ApiError::from(e).into_response()
        }
    }
}

async fn submit_reservation(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    ApiJson(request): ApiJson<SubmitReservationRequest>,
) -> impl IntoResponse {
    info!("POST /api/reservations - request: {:?}", request);

    let command = SubmitReservationCommand {
        date: request.date,
        start_time: request.start_time,
    };

    match state.reservation_service.submit_reservation(&session, command).await {
        Ok(result) => {
            let outcome = ReservationMapper::outcome_to_dto(result.outcome);
            let status = match outcome {
                SubmitOutcome::Created => StatusCode::CREATED,
                SubmitOutcome::Reactivated => StatusCode::OK,
            };
            let response = SubmitReservationResponse {
                reservation: ReservationMapper::to_dto(result.reservation),
                outcome,
                success_message: result.success_message,
            };
            (status, Json(response)).into_response()
        }
        Err(e) => {
            error!("Failed to submit reservation: {}", e);
            ApiError::from(e).into_response()
        }
    }
}

async fn cancel_reservation(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    ApiPath(reservation_id): ApiPath<String>,
) -> impl IntoResponse {
    info!("POST /api/reservations/{}/cancel", reservation_id);

    match state.reservation_service.cancel_reservation(&session, &reservation_id).await {
        Ok(result) => {
            let response = ReservationActionResponse {
                reservation: ReservationMapper::to_dto(result.reservation),
                success_message: result.success_message,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!("Failed to cancel reservation {}: {}", reservation_id, e);
            ApiError::from(e).into_response()
        }
    }
}
