//! # CSV Reservation Repository
//!
//! All reservations live in `reservations.csv`:
//!
//! ```csv
//! id,user_id,date,start_time,end_time,room,slot,lifecycle,created_at
//! 3f2a...,9c1e...,2024-06-10,08:00,09:00,Laboratory,morning,pending,2024-06-01T10:00:00+00:00
//! ```
//!
//! Files written before the slot/lifecycle split carry a single `status`
//! column instead; such rows are converted on read and written back in the
//! current layout on the next write.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use super::connection::CsvConnection;
use crate::backend::domain::models::reservation::{
    format_date, format_time, parse_date, parse_time, split_legacy_status, Lifecycle,
    Reservation, ReservationQuery, Slot,
};
use crate::backend::storage::traits::ReservationStorage;

const FILE_NAME: &str = "reservations.csv";
const HEADER: [&str; 9] = [
    "id", "user_id", "date", "start_time", "end_time", "room", "slot", "lifecycle", "created_at",
];

/// CSV record structure for reservations
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ReservationRecord {
    id: String,
    user_id: String,
    date: String,
    start_time: String,
    end_time: String,
    room: String,
    #[serde(default)]
    slot: String,
    #[serde(default)]
    lifecycle: String,
    created_at: String,
    #[serde(default, skip_serializing)]
    status: String,
}

impl From<&Reservation> for ReservationRecord {
    fn from(reservation: &Reservation) -> Self {
        ReservationRecord {
            id: reservation.id.clone(),
            user_id: reservation.user_id.clone(),
            date: format_date(reservation.date),
            start_time: format_time(reservation.start_time),
            end_time: format_time(reservation.end_time),
            room: reservation.room.clone(),
            slot: reservation.slot.map(Slot::as_str).unwrap_or_default().to_string(),
            lifecycle: reservation.lifecycle.as_str().to_string(),
            created_at: reservation.created_at.to_rfc3339(),
            status: String::new(),
        }
    }
}

impl TryFrom<ReservationRecord> for Reservation {
    type Error = anyhow::Error;

    fn try_from(record: ReservationRecord) -> Result<Self> {
        let date = parse_date(&record.date).ok_or_else(|| anyhow!("bad date '{}'", record.date))?;
        let start_time = parse_time(&record.start_time)
            .ok_or_else(|| anyhow!("bad start_time '{}'", record.start_time))?;
        let end_time = parse_time(&record.end_time)
            .ok_or_else(|| anyhow!("bad end_time '{}'", record.end_time))?;
        let created_at = DateTime::parse_from_rfc3339(record.created_at.trim())
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| anyhow!("bad created_at '{}': {}", record.created_at, e))?;

        let (slot, lifecycle) = match Lifecycle::parse(&record.lifecycle) {
            Some(lifecycle) => (Slot::parse(&record.slot), lifecycle),
            None => split_legacy_status(&record.status),
        };

        Ok(Reservation {
            id: record.id,
            user_id: record.user_id,
            date,
            start_time,
            end_time,
            room: record.room,
            slot,
            lifecycle,
            created_at,
        })
    }
}

/// CSV-based reservation repository
#[derive(Clone)]
pub struct ReservationRepository {
    connection: CsvConnection,
}

impl ReservationRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    fn read_all(&self) -> Result<Vec<Reservation>> {
        let records: Vec<ReservationRecord> = self.connection.read_csv(FILE_NAME)?;
        let mut reservations = Vec::with_capacity(records.len());
        for record in records {
            let id = record.id.clone();
            match Reservation::try_from(record) {
                Ok(reservation) => reservations.push(reservation),
                Err(e) => warn!("Failed to parse reservation {}: {}. Skipping.", id, e),
            }
        }
        Ok(reservations)
    }

    fn write_all(&self, reservations: &[Reservation]) -> Result<()> {
        let records: Vec<ReservationRecord> = reservations.iter().map(ReservationRecord::from).collect();
        self.connection.write_csv(FILE_NAME, &HEADER, &records)
    }
}

#[async_trait]
impl ReservationStorage for ReservationRepository {
    async fn store_reservation(&self, reservation: &Reservation) -> Result<()> {
        let _guard = self.connection.lock_writes().await;
        let mut reservations = self.read_all()?;
        if reservations.iter().any(|r| r.id == reservation.id) {
            return Err(anyhow!("Reservation {} already exists", reservation.id));
        }
        reservations.push(reservation.clone());
        self.write_all(&reservations)?;
        info!("Stored reservation {} for user {}", reservation.id, reservation.user_id);
        Ok(())
    }

    async fn get_reservation(&self, reservation_id: &str) -> Result<Option<Reservation>> {
        Ok(self.read_all()?.into_iter().find(|r| r.id == reservation_id))
    }

    async fn list_reservations(&self, query: &ReservationQuery) -> Result<Vec<Reservation>> {
        Ok(query.apply(self.read_all()?))
    }

    async fn update_reservation(&self, reservation: &Reservation) -> Result<()> {
        let _guard = self.connection.lock_writes().await;
        let mut reservations = self.read_all()?;
        let existing = reservations
            .iter_mut()
            .find(|r| r.id == reservation.id)
            .ok_or_else(|| anyhow!("Reservation {} not found", reservation.id))?;
        *existing = reservation.clone();
        self.write_all(&reservations)?;
        info!("Updated reservation {} to {}", reservation.id, reservation.lifecycle.as_str());
        Ok(())
    }

    async fn delete_reservation(&self, reservation_id: &str) -> Result<bool> {
        let _guard = self.connection.lock_writes().await;
        let mut reservations = self.read_all()?;
        let before = reservations.len();
        reservations.retain(|r| r.id != reservation_id);
        if reservations.len() == before {
            return Ok(false);
        }
        self.write_all(&reservations)?;
        info!("Deleted reservation {}", reservation_id);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::domain::models::reservation::{slot_end, ReservationOrder, DEFAULT_ROOM};
    use crate::backend::storage::csv::test_utils::TestEnvironment;
    use chrono::{Duration, NaiveDate, NaiveTime};

    fn reservation(user: &str, date: &str, start: &str, created_offset_minutes: i64) -> Reservation {
        let start_time = NaiveTime::parse_from_str(start, "%H:%M").unwrap();
        Reservation {
            id: Reservation::generate_id(),
            user_id: user.to_string(),
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            start_time,
            end_time: slot_end(start_time),
            room: DEFAULT_ROOM.to_string(),
            slot: Slot::from_start_time(start_time),
            lifecycle: Lifecycle::Pending,
            created_at: DateTime::parse_from_rfc3339("2024-06-01T10:00:00+00:00").unwrap().with_timezone(&Utc)
                + Duration::minutes(created_offset_minutes),
        }
    }

    #[tokio::test]
    async fn test_store_and_get() {
        let env = TestEnvironment::new().await.unwrap();
        let repo = ReservationRepository::new(env.connection.clone());
        let stored = reservation("u1", "2024-06-10", "08:00", 0);

        repo.store_reservation(&stored).await.unwrap();

        let loaded = repo.get_reservation(&stored.id).await.unwrap().unwrap();
        assert_eq!(loaded, stored);
        assert!(repo.get_reservation("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_id_rejected() {
        let env = TestEnvironment::new().await.unwrap();
        let repo = ReservationRepository::new(env.connection.clone());
        let stored = reservation("u1", "2024-06-10", "08:00", 0);

        repo.store_reservation(&stored).await.unwrap();
        assert!(repo.store_reservation(&stored).await.is_err());
    }

    #[tokio::test]
    async fn test_list_filters_and_orders() {
        let env = TestEnvironment::new().await.unwrap();
        let repo = ReservationRepository::new(env.connection.clone());
        let late = reservation("u1", "2024-06-12", "08:00", 0);
        let early = reservation("u1", "2024-06-10", "13:00", 5);
        let other = reservation("u2", "2024-06-10", "08:00", 10);
        for r in [&late, &early, &other] {
            repo.store_reservation(r).await.unwrap();
        }

        let mine = repo.list_reservations(&ReservationQuery::for_user("u1")).await.unwrap();
        assert_eq!(mine.iter().map(|r| r.id.as_str()).collect::<Vec<_>>(), vec![early.id.as_str(), late.id.as_str()]);

        let newest_first = repo
            .list_reservations(&ReservationQuery { order: ReservationOrder::CreatedAtDescending, ..Default::default() })
            .await
            .unwrap();
        assert_eq!(newest_first[0].id, other.id);
        assert_eq!(newest_first.len(), 3);

        let on_day = repo
            .list_reservations(&ReservationQuery { date: early.date.into(), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(on_day.len(), 2);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let env = TestEnvironment::new().await.unwrap();
        let repo = ReservationRepository::new(env.connection.clone());
        let mut stored = reservation("u1", "2024-06-10", "08:00", 0);
        repo.store_reservation(&stored).await.unwrap();

        stored.lifecycle = Lifecycle::Cancelled;
        repo.update_reservation(&stored).await.unwrap();
        let loaded = repo.get_reservation(&stored.id).await.unwrap().unwrap();
        assert_eq!(loaded.lifecycle, Lifecycle::Cancelled);
        assert_eq!(loaded.slot, Some(Slot::Morning));

        assert!(repo.delete_reservation(&stored.id).await.unwrap());
        assert!(!repo.delete_reservation(&stored.id).await.unwrap());
        assert!(repo.update_reservation(&stored).await.is_err());
    }

    #[tokio::test]
    async fn test_reads_legacy_status_column() {
        let env = TestEnvironment::new().await.unwrap();
        std::fs::write(
            env.connection.file_path(FILE_NAME),
            "id,user_id,date,start_time,end_time,room,status,created_at\n\
             r1,u1,2024-06-10,08:00:00,09:00:00,Laboratory,morning,2024-06-01T10:00:00+00:00\n\
             r2,u1,2024-06-11,13:00,14:00,Laboratory,cancelled,2024-06-01T10:00:00+00:00\n\
             r3,u1,2024-06-12,08:00,09:00,Laboratory,on-hold,2024-06-01T10:00:00+00:00\n\
             r4,u1,not-a-date,08:00,09:00,Laboratory,morning,2024-06-01T10:00:00+00:00\n",
        )
        .unwrap();
        let repo = ReservationRepository::new(env.connection.clone());

        let all = repo.list_reservations(&ReservationQuery::default()).await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!((all[0].slot, all[0].lifecycle), (Some(Slot::Morning), Lifecycle::Pending));
        assert_eq!((all[1].slot, all[1].lifecycle), (None, Lifecycle::Cancelled));
        assert_eq!((all[2].slot, all[2].lifecycle), (None, Lifecycle::Pending));
    }
}
