//! # Storage Traits
//!
//! Storage abstractions used by the domain layer, one trait per logical table
//! plus the identity provider. The CSV/YAML backend in [`super::csv`] is the
//! only implementation today.

use anyhow::Result;
use async_trait::async_trait;

use crate::backend::domain::models::{
    audit_log::AuditLogEntry,
    availability::AvailabilitySlot,
    reservation::{Reservation, ReservationQuery},
    user::User,
};

/// Trait defining the interface for reservation storage operations
#[async_trait]
pub trait ReservationStorage: Send + Sync {
    /// Store a new reservation
    async fn store_reservation(&self, reservation: &Reservation) -> Result<()>;

    async fn get_reservation(&self, reservation_id: &str) -> Result<Option<Reservation>>;

    /// Reservations matching every filter in `query`, ordered by `query.order`
    async fn list_reservations(&self, query: &ReservationQuery) -> Result<Vec<Reservation>>;

    /// Replace the stored row with the same id. Errors if no such row exists.
    async fn update_reservation(&self, reservation: &Reservation) -> Result<()>;

    /// Returns true if the reservation was found and deleted
    async fn delete_reservation(&self, reservation_id: &str) -> Result<bool>;
}

/// Trait defining the interface for user profile storage operations
#[async_trait]
pub trait UserStorage: Send + Sync {
    async fn store_user(&self, user: &User) -> Result<()>;

    async fn get_user(&self, user_id: &str) -> Result<Option<User>>;

    /// Lookup by normalized email
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;

    /// All users, newest first
    async fn list_users(&self) -> Result<Vec<User>>;

    async fn update_user(&self, user: &User) -> Result<()>;
}

/// Password check collaborator. Passwords never leave this boundary in
/// plain form.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Register credentials and return the new user id
    async fn sign_up(&self, email: &str, password: &str) -> Result<String>;

    /// The user id owning these credentials, if they match
    async fn verify(&self, email: &str, password: &str) -> Result<Option<String>>;

    /// Change the login email and/or password of an existing user
    async fn update_credentials(
        &self,
        user_id: &str,
        email: Option<&str>,
        password: Option<&str>,
    ) -> Result<()>;
}

/// Trait defining the interface for lab availability storage operations
#[async_trait]
pub trait AvailabilityStorage: Send + Sync {
    /// Insert, or overwrite the row with the same date, start time and room.
    /// Returns the stored row.
    async fn upsert_slot(&self, slot: &AvailabilitySlot) -> Result<AvailabilitySlot>;

    /// Slots ordered by date then start time
    async fn list_slots(&self, only_available: bool) -> Result<Vec<AvailabilitySlot>>;
}

/// Trait defining the interface for the audit log table
#[async_trait]
pub trait AuditLogStorage: Send + Sync {
    async fn append_log(&self, entry: &AuditLogEntry) -> Result<()>;

    /// Entries newest first
    async fn list_logs(&self) -> Result<Vec<AuditLogEntry>>;

    /// Returns true if the entry was found and deleted
    async fn delete_log(&self, log_id: &str) -> Result<bool>;
}

/// Trait defining the interface for storage connections
///
/// Provides factory methods for the repositories so services can be written
/// against any backend.
pub trait Connection: Send + Sync + Clone {
    type ReservationRepository: ReservationStorage + Clone;
    type UserRepository: UserStorage + Clone;
    type IdentityRepository: IdentityProvider + Clone;
    type AvailabilityRepository: AvailabilityStorage + Clone;
    type AuditLogRepository: AuditLogStorage + Clone;

    fn create_reservation_repository(&self) -> Self::ReservationRepository;
    fn create_user_repository(&self) -> Self::UserRepository;
    fn create_identity_repository(&self) -> Self::IdentityRepository;
    fn create_availability_repository(&self) -> Self::AvailabilityRepository;
    fn create_audit_log_repository(&self) -> Self::AuditLogRepository;
}
