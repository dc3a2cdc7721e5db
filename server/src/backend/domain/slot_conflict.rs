//! Write-time check deciding whether a slot submission creates a new row,
//! re-uses an existing one, or is refused.
//!
//! Rules are evaluated in order and the first match wins:
//!
//! 1. the target date is before today: reject
//! 2. a reservation with the same date and start time exists, whatever its
//!    lifecycle: reactivate that row
//! 3. a non-cancelled reservation on that date overlaps the one-hour window
//!    `[start, start + 1h)`: reject
//! 4. otherwise create
//!
//! The checker is pure. Fetching `existing` and applying the decision is the
//! reservation service's job, and nothing here stops two concurrent
//! submissions from both seeing an empty slot.

use chrono::{NaiveDate, NaiveTime};

use crate::backend::domain::models::reservation::{slot_end, Reservation, Slot};

/// A requested booking, already resolved to a bookable slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotCandidate {
    pub date: NaiveDate,
    pub slot: Slot,
}

impl SlotCandidate {
    pub fn new(date: NaiveDate, slot: Slot) -> Self {
        Self { date, slot }
    }

    pub fn start_time(&self) -> NaiveTime {
        self.slot.start_time()
    }

    pub fn end_time(&self) -> NaiveTime {
        slot_end(self.start_time())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    PastDate,
    Overlap { reservation_id: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotDecision {
    Create { slot: Slot },
    Reactivate { reservation_id: String },
    Reject(RejectReason),
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SlotConflictChecker;

impl SlotConflictChecker {
    pub fn new() -> Self {
        Self
    }

    /// Decide what a submission of `candidate` should do given the
    /// reservations already stored for the same user and room.
    pub fn check(
        &self,
        candidate: &SlotCandidate,
        existing: &[Reservation],
        today: NaiveDate,
    ) -> SlotDecision {
        if candidate.date < today {
            return SlotDecision::Reject(RejectReason::PastDate);
        }

        let start = candidate.start_time();
        let end = candidate.end_time();
        let same_day = existing.iter().filter(|r| r.date == candidate.date);

        // Duplicate rows can exist; an active one wins over a cancelled one
        if let Some(previous) = same_day
            .clone()
            .filter(|r| r.start_time == start)
            .min_by_key(|r| r.is_cancelled())
        {
            return SlotDecision::Reactivate {
                reservation_id: previous.id.clone(),
            };
        }

        if let Some(blocking) = same_day
            .filter(|r| !r.is_cancelled())
            .find(|r| r.overlaps(start, end))
        {
            return SlotDecision::Reject(RejectReason::Overlap {
                reservation_id: blocking.id.clone(),
            });
        }

        SlotDecision::Create {
            slot: candidate.slot,
        }
    }
}
