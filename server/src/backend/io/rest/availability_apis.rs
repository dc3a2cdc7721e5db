use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use log::{error, info};
use shared::{AvailabilityListResponse, DeclareAvailabilityRequest};

use super::error::ApiError;
use super::extract::ApiJson;
use super::mappers::AvailabilityMapper;
use super::session::{AdminSession, CurrentSession};
use crate::backend::domain::commands::availability::DeclareAvailabilityCommand;
use crate::backend::domain::models::availability::AvailabilitySlot;
use crate::backend::AppState;

/// Open lab windows, for any signed-in user
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_available))
}

/// Availability declarations, administrators only
pub fn admin_router() -> Router<AppState> {
    Router::new().route("/", get(list_available_admin).post(declare_availability))
}

async fn list_available(
    State(state): State<AppState>,
    CurrentSession(_session): CurrentSession,
) -> impl IntoResponse {
    info!("GET /api/availability");
    slots_response(state.availability_service.list_available().await)
}

async fn list_available_admin(
    State(state): State<AppState>,
    AdminSession(_admin): AdminSession,
) -> impl IntoResponse {
    info!("GET /api/admin/availability");
    slots_response(state.availability_service.list_all().await)
}

fn slots_response(result: anyhow::Result<Vec<AvailabilitySlot>>) -> Response {
    match result {
        Ok(slots) => {
            let response = AvailabilityListResponse {
                slots: AvailabilityMapper::to_dto_list(slots),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!("Failed to list lab availability: {}", e);
            ApiError::from(e).into_response()
        }
    }
}

async fn declare_availability(
    State(state): State<AppState>,
    AdminSession(admin): AdminSession,
    ApiJson(request): ApiJson<DeclareAvailabilityRequest>,
) -> impl IntoResponse {
    info!("POST /api/admin/availability - request: {:?}", request);

    let command = DeclareAvailabilityCommand {
        date: request.date,
        start_time: request.start_time,
        room: request.room,
        is_available: request.is_available,
    };

    match state.availability_service.declare(&admin, command).await {
        Ok(slot) => (StatusCode::OK, Json(AvailabilityMapper::to_dto(slot))).into_response(),
        Err(e) => {
            error!("Failed to declare availability: {}", e);
            ApiError::from(e).into_response()
        }
    }
}
