//! Domain model for a laboratory reservation.
//!
//! The stored record keeps the slot label and the approval state in two
//! separate fields. Older data carried both in a single `status` string;
//! [`split_legacy_status`] converts that form.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Length of a booked window.
pub const SLOT_LENGTH_MINUTES: i64 = 60;

/// Default room name used when none is configured.
pub const DEFAULT_ROOM: &str = "Laboratory";

/// Half-day slot a reservation belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Slot {
    Morning,
    Afternoon,
}

impl Slot {
    /// Map a start time to its slot. Only 08:00 and 13:00 are bookable.
    pub fn from_start_time(start_time: NaiveTime) -> Option<Self> {
        if start_time == Slot::Morning.start_time() {
            Some(Slot::Morning)
        } else if start_time == Slot::Afternoon.start_time() {
            Some(Slot::Afternoon)
        } else {
            None
        }
    }

    /// Parse an "HH:MM" start time into its slot
    pub fn parse_start_time(value: &str) -> Option<Self> {
        parse_time(value).and_then(Self::from_start_time)
    }

    pub fn start_time(self) -> NaiveTime {
        match self {
            Slot::Morning => hour(8),
            Slot::Afternoon => hour(13),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Slot::Morning => "morning",
            Slot::Afternoon => "afternoon",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "morning" => Some(Slot::Morning),
            "afternoon" => Some(Slot::Afternoon),
            _ => None,
        }
    }
}

/// Approval state of a reservation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lifecycle {
    Pending,
    Accepted,
    Declined,
    Cancelled,
}

impl Lifecycle {
    pub fn as_str(self) -> &'static str {
        match self {
            Lifecycle::Pending => "pending",
            Lifecycle::Accepted => "accepted",
            Lifecycle::Declined => "declined",
            Lifecycle::Cancelled => "cancelled",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" => Some(Lifecycle::Pending),
            "accepted" => Some(Lifecycle::Accepted),
            "declined" => Some(Lifecycle::Declined),
            "cancelled" => Some(Lifecycle::Cancelled),
            _ => None,
        }
    }

    /// Pending and accepted reservations occupy their slot on the calendar
    pub fn shows_on_calendar(self) -> bool {
        matches!(self, Lifecycle::Pending | Lifecycle::Accepted)
    }
}

/// Split a single legacy status value into slot label and lifecycle.
///
/// Unknown values come back as `(None, Pending)` so the record is kept but
/// ignored by the calendar.
pub fn split_legacy_status(status: &str) -> (Option<Slot>, Lifecycle) {
    if let Some(slot) = Slot::parse(status) {
        return (Some(slot), Lifecycle::Pending);
    }
    match Lifecycle::parse(status) {
        Some(lifecycle) => (None, lifecycle),
        None => (None, Lifecycle::Pending),
    }
}

fn hour(h: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, 0, 0).unwrap_or_default()
}

/// Parse "HH:MM" (or "HH:MM:SS")
pub fn parse_time(value: &str) -> Option<NaiveTime> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .ok()
}

/// Parse "YYYY-MM-DD"
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

pub fn format_time(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// End of a booked window; wraps past midnight
pub fn slot_end(start_time: NaiveTime) -> NaiveTime {
    start_time
        .overflowing_add_signed(Duration::minutes(SLOT_LENGTH_MINUTES))
        .0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: String,
    pub user_id: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub room: String,
    pub slot: Option<Slot>,
    pub lifecycle: Lifecycle,
    pub created_at: DateTime<Utc>,
}

impl Reservation {
    pub fn generate_id() -> String {
        Uuid::new_v4().to_string()
    }

    pub fn is_cancelled(&self) -> bool {
        self.lifecycle == Lifecycle::Cancelled
    }

    /// Half-open interval overlap against `[start, end)`
    pub fn overlaps(&self, start: NaiveTime, end: NaiveTime) -> bool {
        start < self.end_time && end > self.start_time
    }

    /// "HH:MM - HH:MM"
    pub fn time_range(&self) -> String {
        format!("{} - {}", format_time(self.start_time), format_time(self.end_time))
    }
}

/// Ordering applied by [`ReservationQuery`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReservationOrder {
    #[default]
    DateAscending,
    CreatedAtDescending,
}

/// Equality filters for listing reservations. `None` matches everything.
#[derive(Debug, Clone, Default)]
pub struct ReservationQuery {
    pub user_id: Option<String>,
    pub date: Option<NaiveDate>,
    pub room: Option<String>,
    pub order: ReservationOrder,
}

impl ReservationQuery {
    pub fn for_user(user_id: &str) -> Self {
        Self {
            user_id: Some(user_id.to_string()),
            ..Self::default()
        }
    }

    pub fn matches(&self, reservation: &Reservation) -> bool {
        self.user_id.as_ref().map_or(true, |id| &reservation.user_id == id)
            && self.date.map_or(true, |date| reservation.date == date)
            && self.room.as_ref().map_or(true, |room| &reservation.room == room)
    }

    /// Filter and sort a full table scan
    pub fn apply(&self, reservations: Vec<Reservation>) -> Vec<Reservation> {
        let mut matching: Vec<Reservation> = reservations
            .into_iter()
            .filter(|r| self.matches(r))
            .collect();
        match self.order {
            ReservationOrder::DateAscending => {
                matching.sort_by(|a, b| (a.date, a.start_time).cmp(&(b.date, b.start_time)))
            }
            ReservationOrder::CreatedAtDescending => {
                matching.sort_by(|a, b| b.created_at.cmp(&a.created_at))
            }
        }
        matching
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_slot_from_start_time() {
        assert_eq!(Slot::parse_start_time("08:00"), Some(Slot::Morning));
        assert_eq!(Slot::parse_start_time("13:00"), Some(Slot::Afternoon));
        assert_eq!(Slot::parse_start_time("13:00:00"), Some(Slot::Afternoon));
        assert_eq!(Slot::parse_start_time("09:30"), None);
        assert_eq!(Slot::parse_start_time("not a time"), None);
    }

    #[test]
    fn test_split_legacy_status() {
        assert_eq!(split_legacy_status("morning"), (Some(Slot::Morning), Lifecycle::Pending));
        assert_eq!(split_legacy_status("afternoon"), (Some(Slot::Afternoon), Lifecycle::Pending));
        assert_eq!(split_legacy_status("accepted"), (None, Lifecycle::Accepted));
        assert_eq!(split_legacy_status("cancelled"), (None, Lifecycle::Cancelled));
        assert_eq!(split_legacy_status("on-hold"), (None, Lifecycle::Pending));
    }

    #[test]
    fn test_slot_end_is_one_hour_later() {
        assert_eq!(slot_end(time(8, 0)), time(9, 0));
        assert_eq!(slot_end(time(23, 30)), time(0, 30));
    }

    #[test]
    fn test_overlap_is_half_open() {
        let reservation = Reservation {
            id: "r1".to_string(),
            user_id: "u1".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
            start_time: time(8, 0),
            end_time: time(9, 0),
            room: DEFAULT_ROOM.to_string(),
            slot: Some(Slot::Morning),
            lifecycle: Lifecycle::Pending,
            created_at: Utc::now(),
        };

        assert!(reservation.overlaps(time(8, 30), time(9, 30)));
        assert!(!reservation.overlaps(time(9, 0), time(10, 0)));
        assert!(!reservation.overlaps(time(7, 0), time(8, 0)));
        assert_eq!(reservation.time_range(), "08:00 - 09:00");
    }
}
