use shared::AvailabilitySlot as AvailabilitySlotDto;

use crate::backend::domain::models::availability::AvailabilitySlot;
use crate::backend::domain::models::reservation::{format_date, format_time};

pub struct AvailabilityMapper;

impl AvailabilityMapper {
    pub fn to_dto(domain: AvailabilitySlot) -> AvailabilitySlotDto {
        AvailabilitySlotDto {
            id: domain.id,
            date: format_date(domain.date),
            start_time: format_time(domain.start_time),
            end_time: format_time(domain.end_time),
            room: domain.room,
            is_available: domain.is_available,
        }
    }

    pub fn to_dto_list(domain: Vec<AvailabilitySlot>) -> Vec<AvailabilitySlotDto> {
        domain.into_iter().map(Self::to_dto).collect()
    }
}
