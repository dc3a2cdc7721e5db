//! # YAML User Repository
//!
//! User profiles are kept in `users.yaml` as a single document.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use log::info;
use serde::{Deserialize, Serialize};

use super::connection::CsvConnection;
use crate::backend::domain::models::user::{normalize_email, User};
use crate::backend::storage::traits::UserStorage;

const FILE_NAME: &str = "users.yaml";

#[derive(Debug, Default, Serialize, Deserialize)]
struct UsersDocument {
    #[serde(default)]
    users: Vec<User>,
}

#[derive(Clone)]
pub struct UserRepository {
    connection: CsvConnection,
}

impl UserRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    fn load(&self) -> Result<UsersDocument> {
        self.connection.read_yaml(FILE_NAME)
    }

    fn save(&self, document: &UsersDocument) -> Result<()> {
        self.connection.write_yaml(FILE_NAME, document)
    }
}

#[async_trait]
impl UserStorage for UserRepository {
    async fn store_user(&self, user: &User) -> Result<()> {
        let _guard = self.connection.lock_writes().await;
        let mut document = self.load()?;
        if document.users.iter().any(|u| u.id == user.id) {
            return Err(anyhow!("User {} already exists", user.id));
        }
        document.users.push(user.clone());
        self.save(&document)?;
        info!("Stored user {} ({})", user.id, user.email);
        Ok(())
    }

    async fn get_user(&self, user_id: &str) -> Result<Option<User>> {
        Ok(self.load()?.users.into_iter().find(|u| u.id == user_id))
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let email = normalize_email(email);
        Ok(self.load()?.users.into_iter().find(|u| u.email == email))
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        let mut users = self.load()?.users;
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(users)
    }

    async fn update_user(&self, user: &User) -> Result<()> {
        let _guard = self.connection.lock_writes().await;
        let mut document = self.load()?;
        let existing = document
            .users
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or_else(|| anyhow!("User {} not found", user.id))?;
        *existing = user.clone();
        self.save(&document)?;
        info!("Updated user {}", user.id);
        Ok(())
    }
}
