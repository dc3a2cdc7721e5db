use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse half-day slot a reservation is booked into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotLabel {
    /// 08:00 start
    Morning,
    /// 13:00 start
    Afternoon,
}

impl fmt::Display for SlotLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotLabel::Morning => write!(f, "morning"),
            SlotLabel::Afternoon => write!(f, "afternoon"),
        }
    }
}

/// Approval state of a reservation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationLifecycle {
    Pending,
    Accepted,
    Declined,
    Cancelled,
}

/// Reservation ID is a UUID v4 string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: String,
    /// ID of the user who owns this reservation
    pub user_id: String,
    /// Calendar day (YYYY-MM-DD)
    pub date: String,
    /// Start of the booked window (HH:MM)
    pub start_time: String,
    /// End of the booked window (HH:MM)
    pub end_time: String,
    pub room: String,
    /// Slot label, absent when the stored label was not recognised
    pub slot: Option<SlotLabel>,
    pub lifecycle: ReservationLifecycle,
    /// RFC 3339 timestamp
    pub created_at: String,
}

/// Reservation joined with the email of the user who owns it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReservationWithUser {
    #[serde(flatten)]
    pub reservation: Reservation,
    pub user_email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitReservationRequest {
    /// Target day (YYYY-MM-DD)
    pub date: String,
    /// "08:00" for the morning slot or "13:00" for the afternoon slot
    pub start_time: String,
}

/// Whether a submission inserted a new row or re-used an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmitOutcome {
    Created,
    Reactivated,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitReservationResponse {
    pub reservation: Reservation,
    pub outcome: SubmitOutcome,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReservationListResponse {
    pub reservations: Vec<Reservation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReservationHistoryResponse {
    pub reservations: Vec<ReservationWithUser>,
}

/// Response after accepting, declining or cancelling a reservation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReservationActionResponse {
    pub reservation: Reservation,
    pub success_message: String,
}

/// Display status of a calendar cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarDayStatus {
    Empty,
    Morning,
    Afternoon,
    /// Both slots reserved
    Red,
}

/// Represents a single cell in the Monday-first month grid
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CalendarDay {
    /// ISO date, `None` for padding cells
    pub date: Option<String>,
    pub day: Option<u32>,
    pub status: CalendarDayStatus,
    /// "HH:MM - HH:MM" for every reservation the user holds that day
    pub reservation_times: Vec<String>,
    /// True when at least one of the day's reservations was cancelled
    pub has_cancelled: bool,
}

impl CalendarDay {
    pub fn padding() -> Self {
        Self {
            date: None,
            day: None,
            status: CalendarDayStatus::Empty,
            reservation_times: Vec::new(),
            has_cancelled: false,
        }
    }

    pub fn is_padding(&self) -> bool {
        self.date.is_none()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct MonthRef {
    pub year: i32,
    pub month: u32,
}

/// Represents a calendar month with the user's reservation status per day
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CalendarMonth {
    pub year: i32,
    pub month: u32,
    pub month_name: String,
    pub first_weekday: u32, // 0 = Monday, ..., 6 = Sunday
    pub days: Vec<CalendarDay>,
    pub previous_month: MonthRef,
    pub next_month: MonthRef,
}

/// Request for calendar month data
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CalendarMonthRequest {
    pub year: i32,
    pub month: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CurrentDateResponse {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub formatted_date: String,
    pub iso_date: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Student,
    Admin,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub student_id: Option<String>,
    pub role: UserRole,
    pub is_active: bool,
    /// RFC 3339 timestamp
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserListResponse {
    pub users: Vec<User>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateAccountRequest {
    pub email: String,
    pub password: String,
    pub student_id: Option<String>,
    /// Defaults to student
    pub role: Option<UserRole>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateAccountRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub student_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountResponse {
    pub user: User,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignInResponse {
    /// Bearer token for the `Authorization` header
    pub token: String,
    pub user_id: String,
    pub role: UserRole,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignOutResponse {
    pub success_message: String,
}

/// Administrator-declared availability window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailabilitySlot {
    pub id: String,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub room: String,
    pub is_available: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeclareAvailabilityRequest {
    pub date: String,
    pub start_time: String,
    /// Defaults to the configured room
    pub room: Option<String>,
    /// Defaults to true
    pub is_available: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailabilityListResponse {
    pub slots: Vec<AvailabilitySlot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditLogEntry {
    pub id: String,
    pub action: String,
    pub user_email: String,
    /// RFC 3339 timestamp
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditLogListResponse {
    pub logs: Vec<AuditLogEntry>,
}

/// Response after permanently removing a record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub success_message: String,
}

/// Body returned for every failed request; the message is shown to the user as-is
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
