//! Lab availability declared by administrators.

use anyhow::Result;
use std::sync::Arc;

use crate::backend::domain::commands::availability::DeclareAvailabilityCommand;
use crate::backend::domain::errors::ReservationError;
use crate::backend::domain::models::availability::AvailabilitySlot;
use crate::backend::domain::models::reservation::{format_date, format_time, parse_date, parse_time, slot_end};
use crate::backend::domain::models::session::Session;
use crate::backend::domain::AuditLogService;
use crate::backend::storage::{AvailabilityStorage, Connection};

#[derive(Clone)]
pub struct AvailabilityService<C: Connection> {
    availability_repository: C::AvailabilityRepository,
    audit_log_service: AuditLogService<C>,
    room: String,
}

impl<C: Connection> AvailabilityService<C> {
    pub fn new(connection: Arc<C>, audit_log_service: AuditLogService<C>, room: impl Into<String>) -> Self {
        Self {
            availability_repository: connection.create_availability_repository(),
            audit_log_service,
            room: room.into(),
        }
    }

    /// Declare a one-hour window open (or closed). Re-declaring the same date,
    /// start and room overwrites the previous declaration.
    pub async fn declare(&self, actor: &Session, command: DeclareAvailabilityCommand) -> Result<AvailabilitySlot> {
        let date = parse_date(&command.date).ok_or_else(|| ReservationError::InvalidDate(command.date.clone()))?;
        let start_time = parse_time(&command.start_time)
            .ok_or_else(|| ReservationError::InvalidTime(command.start_time.clone()))?;
        let room = command
            .room
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())
            .unwrap_or_else(|| self.room.clone());

        let slot = AvailabilitySlot {
            id: AvailabilitySlot::generate_id(),
            date,
            start_time,
            end_time: slot_end(start_time),
            room,
            is_available: command.is_available.unwrap_or(true),
        };
        let stored = self.availability_repository.upsert_slot(&slot).await?;

        self.audit_log_service
            .record(
                format!("Availability set for {} {} in {}", format_date(date), format_time(start_time), stored.room),
                &actor.email,
            )
            .await;
        Ok(stored)
    }

    /// Open windows ordered by date
    pub async fn list_available(&self) -> Result<Vec<AvailabilitySlot>> {
        self.availability_repository.list_slots(true).await
    }

    /// Every declaration, open or closed, ordered by date
    pub async fn list_all(&self) -> Result<Vec<AvailabilitySlot>> {
        self.availability_repository.list_slots(false).await
    }
}
