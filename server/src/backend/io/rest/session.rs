//! Route guards resolving the `Authorization: Bearer <token>` header to a
//! [`Session`].

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};

use super::error::ApiError;
use crate::backend::domain::errors::AuthError;
use crate::backend::domain::models::session::Session;
use crate::backend::AppState;

/// Any signed-in user
pub struct CurrentSession(pub Session);

/// A signed-in administrator
pub struct AdminSession(pub Session);

pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then(|| token.to_string())
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentSession {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or(AuthError::MissingToken)?;
        let session = state.auth_service.resolve(&token).await?;
        Ok(CurrentSession(session))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AdminSession {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let CurrentSession(session) = CurrentSession::from_request_parts(parts, state).await?;
        state.auth_service.require_admin(&session)?;
        Ok(AdminSession(session))
    }
}
