use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{delete, get},
    Router,
};
use log::{error, info};
use shared::{AuditLogListResponse, DeleteResponse, ErrorResponse};

use super::error::ApiError;
use super::extract::ApiPath;
use super::mappers::AuditLogMapper;
use super::session::AdminSession;
use crate::backend::AppState;

/// Audit log, administrators only
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_logs))
        .route("/:id", delete(delete_log))
}

async fn list_logs(
    State(state): State<AppState>,
    AdminSession(_admin): AdminSession,
) -> impl IntoResponse {
    info!("GET /api/admin/logs");

    match state.audit_log_service.list_logs().await {
        Ok(logs) => {
            let response = AuditLogListResponse {
                logs: AuditLogMapper::to_dto_list(logs),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!("Failed to list logs: {}", e);
            ApiError::from(e).into_response()
        }
    }
}

async fn delete_log(
    State(state): State<AppState>,
    AdminSession(_admin): AdminSession,
    ApiPath(log_id): ApiPath<String>,
) -> impl IntoResponse {
    info!("DELETE /api/admin/logs/{}", log_id);

    match state.audit_log_service.delete_log(&log_id).await {
        Ok(true) => {
            let response = DeleteResponse {
                success_message: "Log deleted successfully!".to_string(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Ok(false) => {
            let response = ErrorResponse {
                error: format!("Log entry not found: {}", log_id),
            };
            (StatusCode::NOT_FOUND, Json(response)).into_response()
        }
        Err(e) => {
            error!("Failed to delete log {}: {}", log_id, e);
            ApiError::from(e).into_response()
        }
    }
}
