//! # Local Identity Provider
//!
//! Salted password digests in `credentials.yaml`, keyed by user id and
//! normalized email.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::connection::CsvConnection;
use crate::backend::domain::models::user::{normalize_email, Credential, User};
use crate::backend::storage::traits::IdentityProvider;

const FILE_NAME: &str = "credentials.yaml";

#[derive(Debug, Default, Serialize, Deserialize)]
struct CredentialsDocument {
    #[serde(default)]
    credentials: Vec<Credential>,
}

#[derive(Clone)]
pub struct CredentialRepository {
    connection: CsvConnection,
}

impl CredentialRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    fn load(&self) -> Result<CredentialsDocument> {
        self.connection.read_yaml(FILE_NAME)
    }

    fn save(&self, document: &CredentialsDocument) -> Result<()> {
        self.connection.write_yaml(FILE_NAME, document)
    }
}

#[async_trait]
impl IdentityProvider for CredentialRepository {
    async fn sign_up(&self, email: &str, password: &str) -> Result<String> {
        let _guard = self.connection.lock_writes().await;
        let mut document = self.load()?;
        let email = normalize_email(email);
        if document.credentials.iter().any(|c| c.email == email) {
            return Err(anyhow!("Credentials already registered for {}", email));
        }

        let user_id = User::generate_id();
        document.credentials.push(Credential::new(&user_id, &email, password));
        self.save(&document)?;
        info!("Registered credentials for {}", email);
        Ok(user_id)
    }

    async fn verify(&self, email: &str, password: &str) -> Result<Option<String>> {
        let email = normalize_email(email);
        let document = self.load()?;
        let matched = document
            .credentials
            .iter()
            .find(|c| c.email == email)
            .filter(|c| c.verify(password))
            .map(|c| c.user_id.clone());
        if matched.is_none() {
            debug!("Credential check failed for {}", email);
        }
        Ok(matched)
    }

    async fn update_credentials(
        &self,
        user_id: &str,
        email: Option<&str>,
        password: Option<&str>,
    ) -> Result<()> {
        let _guard = self.connection.lock_writes().await;
        let mut document = self.load()?;

        if let Some(new_email) = email.map(normalize_email) {
            if document
                .credentials
                .iter()
                .any(|c| c.email == new_email && c.user_id != user_id)
            {
                return Err(anyhow!("Credentials already registered for {}", new_email));
            }
        }

        let credential = document
            .credentials
            .iter_mut()
            .find(|c| c.user_id == user_id)
            .ok_or_else(|| anyhow!("No credentials for user {}", user_id))?;

        if let Some(new_email) = email {
            credential.email = normalize_email(new_email);
        }
        if let Some(new_password) = password {
            *credential = Credential::new(user_id, &credential.email, new_password);
        }

        self.save(&document)?;
        info!("Updated credentials for user {}", user_id);
        Ok(())
    }
}
