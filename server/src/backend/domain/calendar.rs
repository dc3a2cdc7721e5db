//! Calendar domain logic for the reservation dashboard.
//!
//! Projects one user's reservations onto a Monday-first month grid. The grid
//! starts with padding cells up to the weekday of the 1st and is padded at the
//! end to a whole number of weeks.

use chrono::{Datelike, NaiveDate};
use log::debug;
use shared::{CalendarDay, CalendarDayStatus, CalendarMonth, CurrentDateResponse, MonthRef};

use crate::backend::domain::clock::Clock;
use crate::backend::domain::models::reservation::{format_date, Reservation, Slot};

/// Calendar service that handles all calendar-related business logic
#[derive(Clone, Default)]
pub struct CalendarService;

impl CalendarService {
    pub fn new() -> Self {
        Self
    }

    /// Build the month grid for `user_id`.
    ///
    /// Records owned by other users are skipped, so callers may pass an
    /// unfiltered list. A month outside 1..=12 yields a grid with no cells.
    pub fn project_month(
        &self,
        user_id: &str,
        year: i32,
        month: u32,
        reservations: &[Reservation],
    ) -> CalendarMonth {
        let previous = self.previous_month(year, month);
        let next = self.next_month(year, month);
        let mut calendar = CalendarMonth {
            year,
            month,
            month_name: self.month_name(month).to_string(),
            first_weekday: 0,
            days: Vec::new(),
            previous_month: MonthRef { year: previous.0, month: previous.1 },
            next_month: MonthRef { year: next.0, month: next.1 },
        };

        if !(1..=12).contains(&month) {
            return calendar;
        }

        let days_in_month = self.days_in_month(year, month);
        let first_weekday = self.first_weekday(year, month);
        debug!(
            "Projecting {}/{} for user {}: {} days, first weekday {}",
            month, year, user_id, days_in_month, first_weekday
        );

        let mut days = Vec::with_capacity(42);
        days.extend((0..first_weekday).map(|_| CalendarDay::padding()));

        for day in 1..=days_in_month {
            let Some(date) = NaiveDate::from_ymd_opt(year, month, day) else {
                continue;
            };
            let mut on_day: Vec<&Reservation> = reservations
                .iter()
                .filter(|r| r.user_id == user_id && r.date == date)
                .collect();
            on_day.sort_by_key(|r| r.start_time);

            days.push(CalendarDay {
                date: Some(format_date(date)),
                day: Some(day),
                status: self.classify_day(&on_day),
                reservation_times: on_day.iter().map(|r| r.time_range()).collect(),
                has_cancelled: on_day.iter().any(|r| r.is_cancelled()),
            });
        }

        while days.len() % 7 != 0 {
            days.push(CalendarDay::padding());
        }

        calendar.first_weekday = first_weekday;
        calendar.days = days;
        calendar
    }

    /// Status of a single day from that day's reservations
    pub fn classify_day(&self, reservations: &[&Reservation]) -> CalendarDayStatus {
        let holds = |slot: Slot| {
            reservations
                .iter()
                .any(|r| r.slot == Some(slot) && r.lifecycle.shows_on_calendar())
        };

        match (holds(Slot::Morning), holds(Slot::Afternoon)) {
            (true, true) => CalendarDayStatus::Red,
            (false, true) => CalendarDayStatus::Afternoon,
            (true, false) => CalendarDayStatus::Morning,
            (false, false) => CalendarDayStatus::Empty,
        }
    }

    /// Get the number of days in a given month and year
    pub fn days_in_month(&self, year: i32, month: u32) -> u32 {
        match month {
            2 => if self.is_leap_year(year) { 29 } else { 28 },
            4 | 6 | 9 | 11 => 30,
            _ => 31,
        }
    }

    pub fn is_leap_year(&self, year: i32) -> bool {
        year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
    }

    /// Weekday of the 1st with Monday = 0 ... Sunday = 6
    pub fn first_weekday(&self, year: i32, month: u32) -> u32 {
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(|date| (date.weekday().num_days_from_sunday() + 6) % 7)
            .unwrap_or(0)
    }

    pub fn month_name(&self, month: u32) -> &'static str {
        match month {
            1 => "January", 2 => "February", 3 => "March", 4 => "April",
            5 => "May", 6 => "June", 7 => "July", 8 => "August",
            9 => "September", 10 => "October", 11 => "November", 12 => "December",
            _ => "Invalid Month",
        }
    }

    /// (year, month) before the given one
    pub fn previous_month(&self, year: i32, month: u32) -> (i32, u32) {
        if month <= 1 {
            (year - 1, 12)
        } else if month > 12 {
            (year, 12)
        } else {
            (year, month - 1)
        }
    }

    /// (year, month) after the given one
    pub fn next_month(&self, year: i32, month: u32) -> (i32, u32) {
        if month >= 12 {
            (year + 1, 1)
        } else if month == 0 {
            (year, 1)
        } else {
            (year, month + 1)
        }
    }

    pub fn current_date(&self, clock: &dyn Clock) -> CurrentDateResponse {
        let today = clock.today();
        let (year, month, day) = (today.year(), today.month(), today.day());

        CurrentDateResponse {
            year,
            month,
            day,
            formatted_date: format!("{} {}, {}", self.month_name(month), day, year),
            iso_date: format_date(today),
        }
    }
}
