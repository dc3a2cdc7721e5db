//! Reservation service domain logic.
//!
//! Students submit and cancel their own reservations; administrators review
//! the whole schedule and move reservations through their lifecycle.
//!
//! ## Business Rules
//!
//! - Only the 08:00 (morning) and 13:00 (afternoon) starts are bookable
//! - A booked window is one hour long
//! - Resubmitting a date and start time the user already holds updates that
//!   row back to pending instead of inserting a duplicate
//! - The owner or an administrator may cancel; only administrators accept,
//!   decline or delete
//!
//! The conflict check and the write that follows are separate storage calls,
//! so two simultaneous submissions for the same slot can both succeed.

use anyhow::Result;
use log::{info, warn};
use std::collections::HashMap;
use std::sync::Arc;

use crate::backend::domain::clock::Clock;
use crate::backend::domain::commands::reservations::{
    ReservationActionResult, ReservationWithOwner, SubmitOutcome, SubmitReservationCommand,
    SubmitReservationResult,
};
use crate::backend::domain::errors::{AuthError, ReservationError};
use crate::backend::domain::models::reservation::{
    format_date, parse_date, parse_time, slot_end, Lifecycle, Reservation, ReservationOrder,
    ReservationQuery, Slot,
};
use crate::backend::domain::models::session::Session;
use crate::backend::domain::slot_conflict::{
    RejectReason, SlotCandidate, SlotConflictChecker, SlotDecision,
};
use crate::backend::domain::AuditLogService;
use crate::backend::storage::{Connection, ReservationStorage, UserStorage};

#[derive(Clone)]
pub struct ReservationService<C: Connection> {
    reservation_repository: C::ReservationRepository,
    user_repository: C::UserRepository,
    audit_log_service: AuditLogService<C>,
    checker: SlotConflictChecker,
    clock: Arc<dyn Clock>,
    room: String,
}

impl<C: Connection> ReservationService<C> {
    pub fn new(
        connection: Arc<C>,
        audit_log_service: AuditLogService<C>,
        clock: Arc<dyn Clock>,
        room: impl Into<String>,
    ) -> Self {
        Self {
            reservation_repository: connection.create_reservation_repository(),
            user_repository: connection.create_user_repository(),
            audit_log_service,
            checker: SlotConflictChecker::new(),
            clock,
            room: room.into(),
        }
    }

    /// Submit a reservation for the acting user
    pub async fn submit_reservation(
        &self,
        actor: &Session,
        command: SubmitReservationCommand,
    ) -> Result<SubmitReservationResult> {
        info!("Submitting reservation for {}: {:?}", actor.email, command);

        let date = parse_date(&command.date)
            .ok_or_else(|| ReservationError::InvalidDate(command.date.clone()))?;
        let start_time = parse_time(&command.start_time)
            .ok_or_else(|| ReservationError::InvalidTime(command.start_time.clone()))?;
        let slot = Slot::from_start_time(start_time)
            .ok_or_else(|| ReservationError::UnsupportedStartTime(command.start_time.clone()))?;

        let existing = self
            .reservation_repository
            .list_reservations(&ReservationQuery {
                user_id: Some(actor.user_id.clone()),
                date: Some(date),
                room: Some(self.room.clone()),
                order: ReservationOrder::DateAscending,
            })
            .await?;

        let candidate = SlotCandidate::new(date, slot);
        match self.checker.check(&candidate, &existing, self.clock.today()) {
            SlotDecision::Reject(RejectReason::PastDate) => {
                Err(ReservationError::PastDate(date).into())
            }
            SlotDecision::Reject(RejectReason::Overlap { reservation_id }) => {
                info!("Submission for {} {} blocked by {}", command.date, slot.as_str(), reservation_id);
                Err(ReservationError::SlotTaken {
                    date,
                    slot: slot.as_str().to_string(),
                }
                .into())
            }
            SlotDecision::Reactivate { reservation_id } => {
                let mut reservation = existing
                    .into_iter()
                    .find(|r| r.id == reservation_id)
                    .ok_or_else(|| ReservationError::NotFound(reservation_id.clone()))?;
                reservation.slot = Some(slot);
                reservation.end_time = candidate.end_time();
                reservation.lifecycle = Lifecycle::Pending;
                self.reservation_repository.update_reservation(&reservation).await?;

                self.audit_log_service
                    .record(format!("Reservation reactivated for {} ({})", format_date(date), slot.as_str()), &actor.email)
                    .await;
                Ok(SubmitReservationResult {
                    reservation,
                    outcome: SubmitOutcome::Reactivated,
                    success_message: "Reservation updated successfully!".to_string(),
                })
            }
            SlotDecision::Create { slot } => {
                let reservation = Reservation {
                    id: Reservation::generate_id(),
                    user_id: actor.user_id.clone(),
                    date,
                    start_time: slot.start_time(),
                    end_time: slot_end(slot.start_time()),
                    room: self.room.clone(),
                    slot: Some(slot),
                    lifecycle: Lifecycle::Pending,
                    created_at: self.clock.now(),
                };
                self.reservation_repository.store_reservation(&reservation).await?;

                self.audit_log_service
                    .record(format!("Reservation submitted for {} ({})", format_date(date), slot.as_str()), &actor.email)
                    .await;
                Ok(SubmitReservationResult {
                    reservation,
                    outcome: SubmitOutcome::Created,
                    success_message: "Reservation submitted successfully!".to_string(),
                })
            }
        }
    }

    /// The user's own reservations ordered by date
    pub async fn list_for_user(&self, user_id: &str) -> Result<Vec<Reservation>> {
        self.reservation_repository
            .list_reservations(&ReservationQuery::for_user(user_id))
            .await
    }

    /// Every reservation ordered by date
    pub async fn list_schedule(&self) -> Result<Vec<Reservation>> {
        self.reservation_repository
            .list_reservations(&ReservationQuery::default())
            .await
    }

    /// Every reservation with its owner's email, newest first
    pub async fn list_history(&self) -> Result<Vec<ReservationWithOwner>> {
        let reservations = self
            .reservation_repository
            .list_reservations(&ReservationQuery {
                order: ReservationOrder::CreatedAtDescending,
                ..ReservationQuery::default()
            })
            .await?;
        let emails: HashMap<String, String> = self
            .user_repository
            .list_users()
            .await?
            .into_iter()
            .map(|u| (u.id, u.email))
            .collect();

        Ok(reservations
            .into_iter()
            .map(|reservation| ReservationWithOwner {
                user_email: emails.get(&reservation.user_id).cloned(),
                reservation,
            })
            .collect())
    }

    /// Cancel a reservation. Allowed for its owner and for administrators.
    pub async fn cancel_reservation(
        &self,
        actor: &Session,
        reservation_id: &str,
    ) -> Result<ReservationActionResult> {
        let reservation = self.load(reservation_id).await?;
        if reservation.user_id != actor.user_id && !actor.is_admin() {
            warn!("{} tried to cancel reservation {} owned by {}", actor.email, reservation_id, reservation.user_id);
            return Err(ReservationError::NotOwner.into());
        }
        self.transition(actor, reservation, Lifecycle::Cancelled).await
    }

    pub async fn accept_reservation(&self, actor: &Session, reservation_id: &str) -> Result<ReservationActionResult> {
        Self::require_admin(actor)?;
        let reservation = self.load(reservation_id).await?;
        self.transition(actor, reservation, Lifecycle::Accepted).await
    }

    pub async fn decline_reservation(&self, actor: &Session, reservation_id: &str) -> Result<ReservationActionResult> {
        Self::require_admin(actor)?;
        let reservation = self.load(reservation_id).await?;
        self.transition(actor, reservation, Lifecycle::Declined).await
    }

    /// Remove the row entirely
    pub async fn delete_reservation(&self, actor: &Session, reservation_id: &str) -> Result<()> {
        Self::require_admin(actor)?;
        if !self.reservation_repository.delete_reservation(reservation_id).await? {
            return Err(ReservationError::NotFound(reservation_id.to_string()).into());
        }
        self.audit_log_service
            .record(format!("Reservation {} deleted", reservation_id), &actor.email)
            .await;
        Ok(())
    }

    async fn load(&self, reservation_id: &str) -> Result<Reservation> {
        self.reservation_repository
            .get_reservation(reservation_id)
            .await?
            .ok_or_else(|| ReservationError::NotFound(reservation_id.to_string()).into())
    }

    async fn transition(
        &self,
        actor: &Session,
        mut reservation: Reservation,
        lifecycle: Lifecycle,
    ) -> Result<ReservationActionResult> {
        reservation.lifecycle = lifecycle;
        self.reservation_repository.update_reservation(&reservation).await?;
        info!("Reservation {} is now {}", reservation.id, lifecycle.as_str());

        self.audit_log_service
            .record(
                format!("Reservation for {} {}", format_date(reservation.date), lifecycle.as_str()),
                &actor.email,
            )
            .await;

        Ok(ReservationActionResult {
            success_message: format!("Reservation {} successfully!", lifecycle.as_str()),
            reservation,
        })
    }

    fn require_admin(actor: &Session) -> Result<()> {
        if actor.is_admin() {
            Ok(())
        } else {
            Err(AuthError::AdminRequired.into())
        }
    }
}
