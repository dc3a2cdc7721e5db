use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use log::{error, info};
use shared::CalendarMonthRequest;

use super::error::ApiError;
use super::extract::ApiQuery;
use super::session::CurrentSession;
use crate::backend::domain::errors::ReservationError;
use crate::backend::AppState;

/// Create a router for calendar related APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/month", get(get_calendar_month))
        .route("/current-date", get(get_current_date))
}

/// Month grid of the signed-in user's reservations
async fn get_calendar_month(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    ApiQuery(query): ApiQuery<CalendarMonthRequest>,
) -> impl IntoResponse {
    info!("GET /api/calendar/month - query: {:?}", query);

    if !(1..=12).contains(&query.month) {
        return ApiError::from(ReservationError::InvalidMonth(query.month)).into_response();
    }

    let reservations = match state.reservation_service.list_for_user(&session.user_id).await {
        Ok(reservations) => reservations,
        Err(e) => {
            error!("Failed to get reservations for calendar: {}", e);
            return ApiError::from(e).into_response();
        }
    };

    let calendar = state
        .calendar_service
        .project_month(&session.user_id, query.year, query.month, &reservations);
    (StatusCode::OK, Json(calendar)).into_response()
}

async fn get_current_date(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/calendar/current-date");

    let current = state.calendar_service.current_date(state.clock.as_ref());
    (StatusCode::OK, Json(current)).into_response()
}
