use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::post,
    Router,
};
use log::{info, warn};
use shared::{SignInRequest, SignInResponse, SignOutResponse};

use super::error::ApiError;
use super::extract::ApiJson;
use super::mappers::UserMapper;
use super::session::CurrentSession;
use crate::backend::AppState;

/// Create a router for sign-in and sign-out
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sign-in", post(sign_in))
        .route("/sign-out", post(sign_out))
}

async fn sign_in(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<SignInRequest>,
) -> impl IntoResponse {
    info!("POST /api/auth/sign-in - {}", request.email);

    match state.auth_service.sign_in(&request.email, &request.password).await {
        Ok(session) => {
            let response = SignInResponse {
                token: session.token,
                user_id: session.user_id,
                role: UserMapper::role_to_dto(session.role),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            warn!("Sign-in failed for {}: {}", request.email, e);
            ApiError::from(e).into_response()
        }
    }
}

async fn sign_out(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> impl IntoResponse {
    info!("POST /api/auth/sign-out - {}", session.email);

    state.auth_service.sign_out(&session.token).await;
    let response = SignOutResponse {
        success_message: "Signed out successfully".to_string(),
    };
    (StatusCode::OK, Json(response)).into_response()
}
