//! Sign-in, sign-out and bearer-token resolution.

use anyhow::Result;
use chrono::Duration;
use log::{debug, info, warn};
use std::sync::Arc;

use crate::backend::domain::clock::Clock;
use crate::backend::domain::errors::AuthError;
use crate::backend::domain::models::session::Session;
use crate::backend::domain::sessions::{SessionRegistry, DEFAULT_SESSION_TTL_HOURS};
use crate::backend::storage::{Connection, IdentityProvider, UserStorage};

#[derive(Clone)]
pub struct AuthService<C: Connection> {
    identity: C::IdentityRepository,
    user_repository: C::UserRepository,
    sessions: SessionRegistry,
    clock: Arc<dyn Clock>,
    session_ttl: Duration,
}

impl<C: Connection> AuthService<C> {
    pub fn new(connection: Arc<C>, sessions: SessionRegistry, clock: Arc<dyn Clock>) -> Self {
        Self {
            identity: connection.create_identity_repository(),
            user_repository: connection.create_user_repository(),
            sessions,
            clock,
            session_ttl: Duration::hours(DEFAULT_SESSION_TTL_HOURS),
        }
    }

    pub fn with_session_ttl(mut self, session_ttl: Duration) -> Self {
        self.session_ttl = session_ttl;
        self
    }

    /// Check credentials and open a session. Deactivated accounts are refused
    /// even with the right password.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session> {
        let user_id = self
            .identity
            .verify(email, password)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;
        let user = self
            .user_repository
            .get_user(&user_id)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !user.is_active {
            warn!("Sign-in refused for deactivated account {}", user.email);
            return Err(AuthError::AccountDeactivated.into());
        }

        let now = self.clock.now();
        let purged = self.sessions.purge_expired(now, self.session_ttl).await;
        if purged > 0 {
            debug!("Purged {} expired sessions", purged);
        }

        let session = Session::new(&user.id, &user.email, user.role, now);
        self.sessions.insert(session.clone()).await;
        info!("{} signed in", user.email);
        Ok(session)
    }

    /// Returns false if the token had no session
    pub async fn sign_out(&self, token: &str) -> bool {
        let removed = self.sessions.remove(token).await;
        if removed {
            info!("Session closed");
        }
        removed
    }

    /// Session for `token`. Sessions past their lifetime are closed here.
    pub async fn resolve(&self, token: &str) -> Result<Session> {
        let session = self
            .sessions
            .get(token)
            .await
            .ok_or(AuthError::InvalidSession)?;
        if session.is_expired(self.clock.now(), self.session_ttl) {
            self.sessions.remove(token).await;
            info!("Session for {} expired", session.email);
            return Err(AuthError::InvalidSession.into());
        }
        Ok(session)
    }

    pub fn require_admin(&self, session: &Session) -> Result<()> {
        if session.is_admin() {
            Ok(())
        } else {
            Err(AuthError::AdminRequired.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::domain::clock::FixedClock;
    use crate::backend::domain::models::user::{Role, User};
    use crate::backend::storage::csv::{test_utils::TestEnvironment, CsvConnection};
    use chrono::{DateTime, TimeZone, Utc};

    async fn setup_test(is_active: bool) -> (TestEnvironment, AuthService<CsvConnection>) {
        setup_test_at(is_active, SessionRegistry::new(), Utc.with_ymd_and_hms(2024, 6, 5, 9, 0, 0).unwrap()).await
    }

    async fn setup_test_at(
        is_active: bool,
        sessions: SessionRegistry,
        now: DateTime<Utc>,
    ) -> (TestEnvironment, AuthService<CsvConnection>) {
        let env = TestEnvironment::new().await.unwrap();
        let connection = Arc::new(env.connection.clone());
        let clock = Arc::new(FixedClock::new(now));

        let user_id = connection
            .create_identity_repository()
            .sign_up("student@example.com", "secret1")
            .await
            .unwrap();
        let user = User {
            id: user_id,
            email: "student@example.com".to_string(),
            student_id: None,
            role: Role::Student,
            is_active,
            created_at: Utc::now(),
        };
        connection.create_user_repository().store_user(&user).await.unwrap();

        let service = AuthService::new(connection, sessions, clock);
        (env, service)
    }

    #[tokio::test]
    async fn test_sign_in_resolve_sign_out() {
        let (_env, service) = setup_test(true).await;

        let session = service.sign_in("student@example.com", "secret1").await.unwrap();
        assert_eq!(session.role, Role::Student);

        let resolved = service.resolve(&session.token).await.unwrap();
        assert_eq!(resolved, session);
        assert!(service.require_admin(&resolved).is_err());

        assert!(service.sign_out(&session.token).await);
        let err = service.resolve(&session.token).await.unwrap_err();
        assert!(matches!(err.downcast_ref::<AuthError>(), Some(AuthError::InvalidSession)));
    }

    #[tokio::test]
    async fn test_wrong_password_rejected() {
        let (_env, service) = setup_test(true).await;

        let err = service.sign_in("student@example.com", "nope").await.unwrap_err();
        assert!(matches!(err.downcast_ref::<AuthError>(), Some(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_deactivated_account_rejected() {
        let (_env, service) = setup_test(false).await;

        let err = service.sign_in("student@example.com", "secret1").await.unwrap_err();
        assert_eq!(err.to_string(), "Account is deactivated. Please contact admin.");
    }

    #[tokio::test]
    async fn test_session_expires_after_ttl() {
        let sessions = SessionRegistry::new();
        let signed_in_at = Utc.with_ymd_and_hms(2024, 6, 5, 9, 0, 0).unwrap();
        let (_env, service) = setup_test_at(true, sessions.clone(), signed_in_at).await;
        let session = service.sign_in("student@example.com", "secret1").await.unwrap();

        let (_later_env, later) =
            setup_test_at(true, sessions.clone(), signed_in_at + Duration::hours(DEFAULT_SESSION_TTL_HOURS)).await;
        let err = later.resolve(&session.token).await.unwrap_err();
        assert!(matches!(err.downcast_ref::<AuthError>(), Some(AuthError::InvalidSession)));
        assert_eq!(sessions.get(&session.token).await, None);
    }

    #[tokio::test]
    async fn test_session_valid_within_ttl() {
        let sessions = SessionRegistry::new();
        let signed_in_at = Utc.with_ymd_and_hms(2024, 6, 5, 9, 0, 0).unwrap();
        let (_env, service) = setup_test_at(true, sessions.clone(), signed_in_at).await;
        let session = service.sign_in("student@example.com", "secret1").await.unwrap();

        let (_later_env, later) = setup_test_at(true, sessions, signed_in_at + Duration::hours(1)).await;
        assert_eq!(later.resolve(&session.token).await.unwrap(), session);
    }
}
