use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One entry of the administrator-visible activity log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditLogEntry {
    pub id: String,
    pub action: String,
    pub user_email: String,
    pub created_at: DateTime<Utc>,
}

impl AuditLogEntry {
    pub fn new(action: impl Into<String>, user_email: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            action: action.into(),
            user_email: user_email.into(),
            created_at,
        }
    }
}
