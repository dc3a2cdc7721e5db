//! # CSV Lab Availability Repository
//!
//! Administrator-declared windows in `lab_availability.csv`. A declaration
//! for an existing (date, start_time, room) replaces that row.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use log::{info, warn};
use serde::{Deserialize, Serialize};

use super::connection::CsvConnection;
use crate::backend::domain::models::availability::AvailabilitySlot;
use crate::backend::domain::models::reservation::{format_date, format_time, parse_date, parse_time};
use crate::backend::storage::traits::AvailabilityStorage;

const FILE_NAME: &str = "lab_availability.csv";
const HEADER: [&str; 6] = ["id", "date", "start_time", "end_time", "room", "is_available"];

#[derive(Debug, Clone, Serialize, Deserialize)]
struct AvailabilityRecord {
    id: String,
    date: String,
    start_time: String,
    end_time: String,
    room: String,
    is_available: bool,
}

impl From<&AvailabilitySlot> for AvailabilityRecord {
    fn from(slot: &AvailabilitySlot) -> Self {
        AvailabilityRecord {
            id: slot.id.clone(),
            date: format_date(slot.date),
            start_time: format_time(slot.start_time),
            end_time: format_time(slot.end_time),
            room: slot.room.clone(),
            is_available: slot.is_available,
        }
    }
}

impl TryFrom<AvailabilityRecord> for AvailabilitySlot {
    type Error = anyhow::Error;

    fn try_from(record: AvailabilityRecord) -> Result<Self> {
        Ok(AvailabilitySlot {
            date: parse_date(&record.date).ok_or_else(|| anyhow!("bad date '{}'", record.date))?,
            start_time: parse_time(&record.start_time)
                .ok_or_else(|| anyhow!("bad start_time '{}'", record.start_time))?,
            end_time: parse_time(&record.end_time)
                .ok_or_else(|| anyhow!("bad end_time '{}'", record.end_time))?,
            id: record.id,
            room: record.room,
            is_available: record.is_available,
        })
    }
}

#[derive(Clone)]
pub struct AvailabilityRepository {
    connection: CsvConnection,
}

impl AvailabilityRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    fn read_all(&self) -> Result<Vec<AvailabilitySlot>> {
        let records: Vec<AvailabilityRecord> = self.connection.read_csv(FILE_NAME)?;
        let mut slots = Vec::with_capacity(records.len());
        for record in records {
            let id = record.id.clone();
            match AvailabilitySlot::try_from(record) {
                Ok(slot) => slots.push(slot),
                Err(e) => warn!("Failed to parse availability slot {}: {}. Skipping.", id, e),
            }
        }
        Ok(slots)
    }
}

#[async_trait]
impl AvailabilityStorage for AvailabilityRepository {
    async fn upsert_slot(&self, slot: &AvailabilitySlot) -> Result<AvailabilitySlot> {
        let _guard = self.connection.lock_writes().await;
        let mut slots = self.read_all()?;

        let stored = match slots.iter_mut().find(|s| s.same_window(slot)) {
            Some(existing) => {
                existing.end_time = slot.end_time;
                existing.is_available = slot.is_available;
                existing.clone()
            }
            None => {
                slots.push(slot.clone());
                slot.clone()
            }
        };

        let records: Vec<AvailabilityRecord> = slots.iter().map(AvailabilityRecord::from).collect();
        self.connection.write_csv(FILE_NAME, &HEADER, &records)?;
        info!(
            "Declared {} {} in {} as {}",
            format_date(stored.date),
            format_time(stored.start_time),
            stored.room,
            if stored.is_available { "available" } else { "unavailable" }
        );
        Ok(stored)
    }

    async fn list_slots(&self, only_available: bool) -> Result<Vec<AvailabilitySlot>> {
        let mut slots: Vec<AvailabilitySlot> = self
            .read_all()?
            .into_iter()
            .filter(|s| !only_available || s.is_available)
            .collect();
        slots.sort_by(|a, b| (a.date, a.start_time).cmp(&(b.date, b.start_time)));
        Ok(slots)
    }
}
