use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post, put},
    Router,
};
use log::{error, info};
use shared::{AccountResponse, CreateAccountRequest, UpdateAccountRequest, UserListResponse};

use super::error::ApiError;
use super::extract::{ApiJson, ApiPath};
use super::mappers::UserMapper;
use super::session::{AdminSession, CurrentSession};
use crate::backend::domain::commands::accounts::{AccountResult, CreateAccountCommand, UpdateAccountCommand};
use crate::backend::domain::models::user::Role;
use crate::backend::AppState;

/// Profile of the signed-in user
pub fn router() -> Router<AppState> {
    Router::new().route("/me", get(get_profile))
}

/// Account management, administrators only
pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_account))
        .route("/:id", put(update_account))
        .route("/:id/deactivate", post(deactivate_account))
}

async fn get_profile(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> impl IntoResponse {
    info!("GET /api/users/me - {}", session.email);

    match state.user_service.get_user(&session.user_id).await {
        Ok(user) => (StatusCode::OK, Json(UserMapper::to_dto(user))).into_response(),
        Err(e) => {
            error!("Failed to load profile for {}: {}", session.user_id, e);
            ApiError::from(e).into_response()
        }
    }
}

async fn list_users(
    State(state): State<AppState>,
    AdminSession(_admin): AdminSession,
) -> impl IntoResponse {
    info!("GET /api/admin/users");

    match state.user_service.list_users().await {
        Ok(users) => {
            let response = UserListResponse {
                users: UserMapper::to_dto_list(users),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!("Failed to list users: {}", e);
            ApiError::from(e).into_response()
        }
    }
}

async fn create_account(
    State(state): State<AppState>,
    AdminSession(admin): AdminSession,
    ApiJson(request): ApiJson<CreateAccountRequest>,
) -> impl IntoResponse {
    info!("POST /api/admin/users - {}", request.email);

    let command = CreateAccountCommand {
        email: request.email,
        password: request.password,
        student_id: request.student_id,
        role: request.role.map(UserMapper::role_to_domain).unwrap_or(Role::Student),
    };

    match state.user_service.create_account(&admin, command).await {
        Ok(result) => (StatusCode::CREATED, Json(account_response(result))).into_response(),
        Err(e) => {
            error!("Failed to create account: {}", e);
            ApiError::from(e).into_response()
        }
    }
}

async fn update_account(
    State(state): State<AppState>,
    AdminSession(admin): AdminSession,
    ApiPath(user_id): ApiPath<String>,
    ApiJson(request): ApiJson<UpdateAccountRequest>,
) -> impl IntoResponse {
    info!("PUT /api/admin/users/{}", user_id);

    let command = UpdateAccountCommand {
        user_id: user_id.clone(),
        email: request.email,
        password: request.password,
        student_id: request.student_id,
    };

    match state.user_service.update_account(&admin, command).await {
        Ok(result) => (StatusCode::OK, Json(account_response(result))).into_response(),
        Err(e) => {
            error!("Failed to update account {}: {}", user_id, e);
            ApiError::from(e).into_response()
        }
    }
}

async fn deactivate_account(
    State(state): State<AppState>,
    AdminSession(admin): AdminSession,
    ApiPath(user_id): ApiPath<String>,
) -> impl IntoResponse {
    info!("POST /api/admin/users/{}/deactivate", user_id);

    match state.user_service.deactivate_account(&admin, &user_id).await {
        Ok(result) => (StatusCode::OK, Json(account_response(result))).into_response(),
        Err(e) => {
            error!("Failed to deactivate account {}: {}", user_id, e);
            ApiError::from(e).into_response()
        }
    }
}

fn account_response(result: AccountResult) -> AccountResponse {
    AccountResponse {
        user: UserMapper::to_dto(result.user),
        success_message: result.success_message,
    }
}
