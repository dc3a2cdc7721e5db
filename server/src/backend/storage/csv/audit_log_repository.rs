//! # CSV Audit Log Repository
//!
//! Append-only action log in `logs.csv`. Entries can be deleted one at a time
//! by an administrator.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use super::connection::CsvConnection;
use crate::backend::domain::models::audit_log::AuditLogEntry;
use crate::backend::storage::traits::AuditLogStorage;

const FILE_NAME: &str = "logs.csv";
const HEADER: [&str; 4] = ["id", "action", "user_email", "created_at"];

#[derive(Debug, Clone, Serialize, Deserialize)]
struct AuditLogRecord {
    id: String,
    action: String,
    user_email: String,
    created_at: String,
}

impl From<&AuditLogEntry> for AuditLogRecord {
    fn from(entry: &AuditLogEntry) -> Self {
        AuditLogRecord {
            id: entry.id.clone(),
            action: entry.action.clone(),
            user_email: entry.user_email.clone(),
            created_at: entry.created_at.to_rfc3339(),
        }
    }
}

impl TryFrom<AuditLogRecord> for AuditLogEntry {
    type Error = anyhow::Error;

    fn try_from(record: AuditLogRecord) -> Result<Self> {
        let created_at = DateTime::parse_from_rfc3339(record.created_at.trim())
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| anyhow!("bad created_at '{}': {}", record.created_at, e))?;
        Ok(AuditLogEntry {
            id: record.id,
            action: record.action,
            user_email: record.user_email,
            created_at,
        })
    }
}

#[derive(Clone)]
pub struct AuditLogRepository {
    connection: CsvConnection,
}

impl AuditLogRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    fn read_all(&self) -> Result<Vec<AuditLogEntry>> {
        let records: Vec<AuditLogRecord> = self.connection.read_csv(FILE_NAME)?;
        let mut entries = Vec::with_capacity(records.len());
        for record in records {
            let id = record.id.clone();
            match AuditLogEntry::try_from(record) {
                Ok(entry) => entries.push(entry),
                Err(e) => warn!("Failed to parse log entry {}: {}. Skipping.", id, e),
            }
        }
        Ok(entries)
    }

    fn write_all(&self, entries: &[AuditLogEntry]) -> Result<()> {
        let records: Vec<AuditLogRecord> = entries.iter().map(AuditLogRecord::from).collect();
        self.connection.write_csv(FILE_NAME, &HEADER, &records)
    }
}

#[async_trait]
impl AuditLogStorage for AuditLogRepository {
    async fn append_log(&self, entry: &AuditLogEntry) -> Result<()> {
        let _guard = self.connection.lock_writes().await;
        let mut entries = self.read_all()?;
        entries.push(entry.clone());
        self.write_all(&entries)?;
        debug!("Logged '{}' for {}", entry.action, entry.user_email);
        Ok(())
    }

    async fn list_logs(&self) -> Result<Vec<AuditLogEntry>> {
        let mut entries = self.read_all()?;
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(entries)
    }

    async fn delete_log(&self, log_id: &str) -> Result<bool> {
        let _guard = self.connection.lock_writes().await;
        let mut entries = self.read_all()?;
        let before = entries.len();
        entries.retain(|e| e.id != log_id);
        if entries.len() == before {
            return Ok(false);
        }
        self.write_all(&entries)?;
        info!("Deleted log entry {}", log_id);
        Ok(true)
    }
}
