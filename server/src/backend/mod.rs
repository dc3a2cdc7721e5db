//! # Backend Module
//!
//! Everything behind the HTTP port of the laboratory reservation service.
//!
//! ```text
//! IO Layer (axum REST handlers, session guards, DTO mappers)
//!     ↓
//! Domain Layer (services, calendar projector, slot conflict checker)
//!     ↓
//! Storage Layer (CSV / YAML files)
//! ```

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use anyhow::{Context, Result};
use axum::{
    http::{HeaderValue, Method},
    Router,
};
use log::info;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

use crate::backend::config::ServerConfig;
use crate::backend::domain::{
    AuditLogService, AuthService, AvailabilityService, CalendarService, Clock, ReservationService,
    SessionRegistry, SystemClock, UserService,
};
use crate::backend::io::rest::{
    admin_reservation_apis, auth_apis, availability_apis, calendar_apis, log_apis, reservation_apis,
    user_apis,
};
use crate::backend::storage::CsvConnection;

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub auth_service: AuthService<CsvConnection>,
    pub user_service: UserService<CsvConnection>,
    pub reservation_service: ReservationService<CsvConnection>,
    pub availability_service: AvailabilityService<CsvConnection>,
    pub audit_log_service: AuditLogService<CsvConnection>,
    pub calendar_service: CalendarService,
    pub clock: Arc<dyn Clock>,
}

/// Initialize the backend from configuration, using the wall clock
pub async fn initialize_backend(config: &ServerConfig) -> Result<AppState> {
    let data_directory = config.resolve_data_directory()?;
    info!("Using data directory {}", data_directory.display());
    let connection = CsvConnection::new(&data_directory)?;

    initialize_backend_with(connection, Arc::new(SystemClock), config).await
}

/// Wire all services over an existing connection and clock
pub async fn initialize_backend_with(
    connection: CsvConnection,
    clock: Arc<dyn Clock>,
    config: &ServerConfig,
) -> Result<AppState> {
    info!("Setting up domain services");
    let connection = Arc::new(connection);
    let sessions = SessionRegistry::new();

    let audit_log_service = AuditLogService::new(connection.clone(), clock.clone());
    let auth_service = AuthService::new(connection.clone(), sessions.clone(), clock.clone())
        .with_session_ttl(config.session_ttl());
    let user_service = UserService::new(
        connection.clone(),
        sessions,
        audit_log_service.clone(),
        clock.clone(),
    );
    let reservation_service = ReservationService::new(
        connection.clone(),
        audit_log_service.clone(),
        clock.clone(),
        config.default_room.clone(),
    );
    let availability_service = AvailabilityService::new(
        connection,
        audit_log_service.clone(),
        config.default_room.clone(),
    );

    if let Some(admin) = &config.bootstrap_admin {
        user_service
            .ensure_bootstrap_admin(&admin.email, &admin.password)
            .await
            .context("Failed to create bootstrap administrator")?;
    }

    Ok(AppState {
        auth_service,
        user_service,
        reservation_service,
        availability_service,
        audit_log_service,
        calendar_service: CalendarService::new(),
        clock,
    })
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState, config: &ServerConfig) -> Result<Router> {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);
    let cors = if config.allowed_origin.trim() == "*" {
        cors.allow_origin(Any)
    } else {
        let origin = config
            .allowed_origin
            .parse::<HeaderValue>()
            .with_context(|| format!("Invalid allowed_origin '{}'", config.allowed_origin))?;
        cors.allow_origin(origin)
    };

    let admin_routes = Router::new()
        .nest("/reservations", admin_reservation_apis::router())
        .nest("/availability", availability_apis::admin_router())
        .nest("/users", user_apis::admin_router())
        .nest("/logs", log_apis::router());

    let api_routes = Router::new()
        .nest("/auth", auth_apis::router())
        .nest("/calendar", calendar_apis::router())
        .nest("/reservations", reservation_apis::router())
        .nest("/availability", availability_apis::router())
        .nest("/users", user_apis::router())
        .nest("/admin", admin_routes);

    let mut router = Router::new().nest("/api", api_routes);
    if let Some(static_directory) = &config.static_directory {
        info!("Serving frontend from {}", static_directory.display());
        router = router.fallback_service(ServeDir::new(static_directory));
    }

    Ok(router.layer(cors).with_state(app_state))
}
