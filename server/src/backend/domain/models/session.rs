//! Explicit session object passed to every handler.
//!
//! Created at sign-in, resolved from the bearer token by the route guards,
//! destroyed at sign-out, when the account is deactivated, or once it is
//! older than the configured lifetime.

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use super::user::Role;

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub token: String,
    pub user_id: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn new(user_id: &str, email: &str, role: Role, created_at: DateTime<Utc>) -> Self {
        Self {
            token: Uuid::new_v4().simple().to_string(),
            user_id: user_id.to_string(),
            email: email.to_string(),
            role,
            created_at,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn is_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now - self.created_at >= ttl
    }
}
