//! Domain model for an administrator-declared availability window.
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailabilitySlot {
    pub id: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub room: String,
    pub is_available: bool,
}

impl AvailabilitySlot {
    pub fn generate_id() -> String {
        Uuid::new_v4().to_string()
    }

    /// Two declarations describe the same window when date, start and room match
    pub fn same_window(&self, other: &AvailabilitySlot) -> bool {
        self.date == other.date && self.start_time == other.start_time && self.room == other.room
    }
}
