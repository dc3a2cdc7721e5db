//! Records administrator-visible action history.

use anyhow::Result;
use log::{info, warn};
use std::sync::Arc;

use crate::backend::domain::clock::Clock;
use crate::backend::domain::models::audit_log::AuditLogEntry;
use crate::backend::storage::{AuditLogStorage, Connection};

#[derive(Clone)]
pub struct AuditLogService<C: Connection> {
    audit_log_repository: C::AuditLogRepository,
    clock: Arc<dyn Clock>,
}

impl<C: Connection> AuditLogService<C> {
    pub fn new(connection: Arc<C>, clock: Arc<dyn Clock>) -> Self {
        Self {
            audit_log_repository: connection.create_audit_log_repository(),
            clock,
        }
    }

    /// Append an entry. A failed write is logged and does not fail the
    /// action being recorded.
    pub async fn record(&self, action: impl Into<String>, user_email: &str) {
        let entry = AuditLogEntry::new(action, user_email, self.clock.now());
        if let Err(e) = self.audit_log_repository.append_log(&entry).await {
            warn!("Failed to record audit entry '{}': {}", entry.action, e);
        }
    }

    /// All entries, newest first
    pub async fn list_logs(&self) -> Result<Vec<AuditLogEntry>> {
        self.audit_log_repository.list_logs().await
    }

    /// Returns false when no entry has this id
    pub async fn delete_log(&self, log_id: &str) -> Result<bool> {
        let deleted = self.audit_log_repository.delete_log(log_id).await?;
        if deleted {
            info!("Deleted audit entry {}", log_id);
        }
        Ok(deleted)
    }
}
