use shared::{
    Reservation as ReservationDto, ReservationLifecycle, ReservationWithUser, SlotLabel,
    SubmitOutcome as SubmitOutcomeDto,
};

use crate::backend::domain::commands::reservations::{ReservationWithOwner, SubmitOutcome};
use crate::backend::domain::models::reservation::{format_date, format_time, Lifecycle, Reservation, Slot};

pub struct ReservationMapper;

impl ReservationMapper {
    pub fn slot_to_dto(slot: Slot) -> SlotLabel {
        match slot {
            Slot::Morning => SlotLabel::Morning,
            Slot::Afternoon => SlotLabel::Afternoon,
        }
    }

    pub fn lifecycle_to_dto(lifecycle: Lifecycle) -> ReservationLifecycle {
        match lifecycle {
            Lifecycle::Pending => ReservationLifecycle::Pending,
            Lifecycle::Accepted => ReservationLifecycle::Accepted,
            Lifecycle::Declined => ReservationLifecycle::Declined,
            Lifecycle::Cancelled => ReservationLifecycle::Cancelled,
        }
    }

    pub fn outcome_to_dto(outcome: SubmitOutcome) -> SubmitOutcomeDto {
        match outcome {
            SubmitOutcome::Created => SubmitOutcomeDto::Created,
            SubmitOutcome::Reactivated => SubmitOutcomeDto::Reactivated,
        }
    }

    /// Convert domain Reservation to shared Reservation DTO
    pub fn to_dto(domain: Reservation) -> ReservationDto {
        ReservationDto {
            id: domain.id,
            user_id: domain.user_id,
            date: format_date(domain.date),
            start_time: format_time(domain.start_time),
            end_time: format_time(domain.end_time),
            room: domain.room,
            slot: domain.slot.map(Self::slot_to_dto),
            lifecycle: Self::lifecycle_to_dto(domain.lifecycle),
            created_at: domain.created_at.to_rfc3339(),
        }
    }

    pub fn to_dto_list(domain: Vec<Reservation>) -> Vec<ReservationDto> {
        domain.into_iter().map(Self::to_dto).collect()
    }

    pub fn with_owner_to_dto(domain: ReservationWithOwner) -> ReservationWithUser {
        ReservationWithUser {
            reservation: Self::to_dto(domain.reservation),
            user_email: domain.user_email,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};

    #[test]
    fn test_to_dto_formats_fields() {
        let domain = Reservation {
            id: "r1".to_string(),
            user_id: "u1".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
            start_time: NaiveTime::from_hms_opt(13, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
            room: "Laboratory".to_string(),
            slot: Some(Slot::Afternoon),
            lifecycle: Lifecycle::Accepted,
            created_at: Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap(),
        };

        let dto = ReservationMapper::to_dto(domain);
        assert_eq!(dto.date, "2024-06-10");
        assert_eq!(dto.start_time, "13:00");
        assert_eq!(dto.end_time, "14:00");
        assert_eq!(dto.slot, Some(SlotLabel::Afternoon));
        assert_eq!(dto.lifecycle, ReservationLifecycle::Accepted);
        assert_eq!(dto.created_at, "2024-06-01T10:00:00+00:00");
    }
}
