//! Account management: sign-up, profile edits and deactivation.
//!
//! ## Business Rules
//!
//! - Emails are unique, compared case-insensitively
//! - Passwords have at least six characters
//! - Deactivation keeps the account but refuses further sign-ins and closes
//!   its open sessions

use anyhow::Result;
use log::info;
use std::sync::Arc;

use crate::backend::domain::clock::Clock;
use crate::backend::domain::commands::accounts::{AccountResult, CreateAccountCommand, UpdateAccountCommand};
use crate::backend::domain::errors::AccountError;
use crate::backend::domain::models::session::Session;
use crate::backend::domain::models::user::{normalize_email, Role, User};
use crate::backend::domain::sessions::SessionRegistry;
use crate::backend::domain::AuditLogService;
use crate::backend::storage::{Connection, IdentityProvider, UserStorage};

pub const MIN_PASSWORD_LENGTH: usize = 6;

#[derive(Clone)]
pub struct UserService<C: Connection> {
    identity: C::IdentityRepository,
    user_repository: C::UserRepository,
    sessions: SessionRegistry,
    audit_log_service: AuditLogService<C>,
    clock: Arc<dyn Clock>,
}

impl<C: Connection> UserService<C> {
    pub fn new(
        connection: Arc<C>,
        sessions: SessionRegistry,
        audit_log_service: AuditLogService<C>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            identity: connection.create_identity_repository(),
            user_repository: connection.create_user_repository(),
            sessions,
            audit_log_service,
            clock,
        }
    }

    /// Register credentials and a profile for a new account
    pub async fn create_account(&self, actor: &Session, command: CreateAccountCommand) -> Result<AccountResult> {
        let user = self.register(command).await?;
        self.audit_log_service
            .record(format!("Account created for {}", user.email), &actor.email)
            .await;
        Ok(AccountResult {
            success_message: "Account created successfully!".to_string(),
            user,
        })
    }

    /// All accounts, newest first
    pub async fn list_users(&self) -> Result<Vec<User>> {
        self.user_repository.list_users().await
    }

    pub async fn get_user(&self, user_id: &str) -> Result<User> {
        self.user_repository
            .get_user(user_id)
            .await?
            .ok_or_else(|| AccountError::NotFound(user_id.to_string()).into())
    }

    pub async fn update_account(&self, actor: &Session, command: UpdateAccountCommand) -> Result<AccountResult> {
        let mut user = self.get_user(&command.user_id).await?;

        let email = match command.email.as_deref().map(normalize_email) {
            Some(email) if email != user.email => {
                validate_email(&email)?;
                if self.user_repository.get_user_by_email(&email).await?.is_some() {
                    return Err(AccountError::EmailTaken(email).into());
                }
                Some(email)
            }
            _ => None,
        };
        let password = command.password.filter(|p| !p.is_empty());
        if let Some(password) = &password {
            validate_password(password)?;
        }

        if email.is_some() || password.is_some() {
            self.identity
                .update_credentials(&user.id, email.as_deref(), password.as_deref())
                .await?;
        }
        if let Some(email) = email {
            user.email = email;
        }
        if let Some(student_id) = command.student_id {
            user.student_id = Some(student_id).filter(|s| !s.trim().is_empty());
        }
        self.user_repository.update_user(&user).await?;

        info!("Updated account {}", user.id);
        self.audit_log_service
            .record(format!("Account updated for {}", user.email), &actor.email)
            .await;
        Ok(AccountResult {
            success_message: "User updated successfully!".to_string(),
            user,
        })
    }

    /// Mark the account inactive and close its sessions
    pub async fn deactivate_account(&self, actor: &Session, user_id: &str) -> Result<AccountResult> {
        let mut user = self.get_user(user_id).await?;
        user.is_active = false;
        self.user_repository.update_user(&user).await?;

        let closed = self.sessions.revoke_user(&user.id).await;
        info!("Deactivated account {} ({} sessions closed)", user.email, closed);
        self.audit_log_service
            .record(format!("Account deactivated for {}", user.email), &actor.email)
            .await;
        Ok(AccountResult {
            success_message: "User deactivated successfully!".to_string(),
            user,
        })
    }

    /// Create the configured administrator on first start. Returns true if an
    /// account was created.
    pub async fn ensure_bootstrap_admin(&self, email: &str, password: &str) -> Result<bool> {
        if self.user_repository.get_user_by_email(email).await?.is_some() {
            return Ok(false);
        }
        let user = self
            .register(CreateAccountCommand {
                email: email.to_string(),
                password: password.to_string(),
                student_id: None,
                role: Role::Admin,
            })
            .await?;
        info!("Created bootstrap administrator {}", user.email);
        Ok(true)
    }

    async fn register(&self, command: CreateAccountCommand) -> Result<User> {
        let email = normalize_email(&command.email);
        validate_email(&email)?;
        validate_password(&command.password)?;
        if self.user_repository.get_user_by_email(&email).await?.is_some() {
            return Err(AccountError::EmailTaken(email).into());
        }

        let user_id = self.identity.sign_up(&email, &command.password).await?;
        let user = User {
            id: user_id,
            email,
            student_id: command.student_id.filter(|s| !s.trim().is_empty()),
            role: command.role,
            is_active: true,
            created_at: self.clock.now(),
        };
        self.user_repository.store_user(&user).await?;
        info!("Registered {} as {:?}", user.email, user.role);
        Ok(user)
    }
}

fn validate_email(email: &str) -> Result<()> {
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
        }
        None => false,
    };
    if valid && !email.contains(char::is_whitespace) {
        Ok(())
    } else {
        Err(AccountError::InvalidEmail(email.to_string()).into())
    }
}

fn validate_password(password: &str) -> Result<()> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AccountError::PasswordTooShort(MIN_PASSWORD_LENGTH).into());
    }
    Ok(())
}
