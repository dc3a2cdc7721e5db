//! Domain models for accounts and their sign-in credentials.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Admin,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub student_id: Option<String>,
    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn generate_id() -> String {
        Uuid::new_v4().to_string()
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Salted password digest for one account.
///
/// The digest is a name-based UUID (SHA-1) keyed by a random per-account
/// salt. It stands in for the hosted identity service and is not meant to
/// resist offline attacks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credential {
    pub user_id: String,
    pub email: String,
    pub salt: String,
    pub digest: String,
}

impl Credential {
    pub fn new(user_id: &str, email: &str, password: &str) -> Self {
        let salt = Uuid::new_v4();
        Self {
            user_id: user_id.to_string(),
            email: normalize_email(email),
            salt: salt.to_string(),
            digest: Uuid::new_v5(&salt, password.as_bytes()).to_string(),
        }
    }

    pub fn verify(&self, password: &str) -> bool {
        match Uuid::parse_str(&self.salt) {
            Ok(salt) => Uuid::new_v5(&salt, password.as_bytes()).to_string() == self.digest,
            Err(_) => false,
        }
    }
}

/// Emails are compared case-insensitively and without surrounding whitespace
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
