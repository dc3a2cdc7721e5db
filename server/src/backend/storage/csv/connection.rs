//! # CSV Connection
//!
//! Owns the data directory and the file helpers shared by every repository.
//!
//! ```text
//! data/
//! ├── users.yaml
//! ├── credentials.yaml
//! ├── reservations.csv
//! ├── lab_availability.csv
//! └── logs.csv
//! ```

use anyhow::{Context, Result};
use csv::{ReaderBuilder, WriterBuilder};
use log::{debug, info, warn};
use serde::{de::DeserializeOwned, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};

use crate::backend::storage::traits::Connection;

use super::audit_log_repository::AuditLogRepository;
use super::availability_repository::AvailabilityRepository;
use super::credential_repository::CredentialRepository;
use super::reservation_repository::ReservationRepository;
use super::user_repository::UserRepository;

/// Directory name used under the platform data directory
pub const DEFAULT_DIRECTORY_NAME: &str = "lab-reservation";

/// CsvConnection manages the data directory and serialises file writes
#[derive(Clone)]
pub struct CsvConnection {
    base_directory: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl CsvConnection {
    /// Create a new CSV connection rooted at `base_directory`, creating it if needed
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        let base_path = base_directory.as_ref().to_path_buf();

        if !base_path.exists() {
            fs::create_dir_all(&base_path).with_context(|| {
                format!("Failed to create data directory {}", base_path.display())
            })?;
            info!("Created data directory: {}", base_path.display());
        }

        Ok(Self {
            base_directory: base_path,
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    /// Platform data directory (e.g. `~/.local/share/lab-reservation` on Linux)
    pub fn default_directory() -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| anyhow::anyhow!("Could not determine a data directory"))?;
        Ok(data_dir.join(DEFAULT_DIRECTORY_NAME))
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    pub fn file_path(&self, file_name: &str) -> PathBuf {
        self.base_directory.join(file_name)
    }

    /// Hold this across a read-modify-write of any file
    pub async fn lock_writes(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().await
    }

    /// Read every row of a CSV table. A missing file is an empty table and a
    /// row that fails to deserialize is skipped with a warning.
    pub fn read_csv<T: DeserializeOwned>(&self, file_name: &str) -> Result<Vec<T>> {
        let path = self.file_path(file_name);
        if !path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&path).with_context(|| format!("Failed to open {}", path.display()))?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(BufReader::new(file));

        let mut rows = Vec::new();
        for (index, result) in reader.deserialize::<T>().enumerate() {
            match result {
                Ok(row) => rows.push(row),
                Err(e) => warn!("Skipping unreadable row {} in {}: {}", index + 1, file_name, e),
            }
        }
        Ok(rows)
    }

    /// Rewrite a CSV table atomically. The header is always written, even for
    /// an empty table.
    pub fn write_csv<T: Serialize>(&self, file_name: &str, header: &[&str], rows: &[T]) -> Result<()> {
        let path = self.file_path(file_name);
        let temp_path = path.with_extension("csv.tmp");

        {
            let file = File::create(&temp_path)
                .with_context(|| format!("Failed to create {}", temp_path.display()))?;
            let mut writer = WriterBuilder::new()
                .has_headers(false)
                .from_writer(BufWriter::new(file));
            writer.write_record(header)?;
            for row in rows {
                writer.serialize(row)?;
            }
            writer.flush()?;
        }

        fs::rename(&temp_path, &path)
            .with_context(|| format!("Failed to replace {}", path.display()))?;
        debug!("Wrote {} rows to {}", rows.len(), file_name);
        Ok(())
    }

    /// Read a YAML document, returning the default value when the file is absent
    pub fn read_yaml<T: DeserializeOwned + Default>(&self, file_name: &str) -> Result<T> {
        let path = self.file_path(file_name);
        if !path.exists() {
            return Ok(T::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        if content.trim().is_empty() {
            return Ok(T::default());
        }
        serde_yaml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn write_yaml<T: Serialize>(&self, file_name: &str, value: &T) -> Result<()> {
        let path = self.file_path(file_name);
        let temp_path = path.with_extension("yaml.tmp");

        let content = serde_yaml::to_string(value)?;
        fs::write(&temp_path, content)
            .with_context(|| format!("Failed to write {}", temp_path.display()))?;
        fs::rename(&temp_path, &path)
            .with_context(|| format!("Failed to replace {}", path.display()))?;
        Ok(())
    }
}

impl Connection for CsvConnection {
    type ReservationRepository = ReservationRepository;
    type UserRepository = UserRepository;
    type IdentityRepository = CredentialRepository;
    type AvailabilityRepository = AvailabilityRepository;
    type AuditLogRepository = AuditLogRepository;

    fn create_reservation_repository(&self) -> Self::ReservationRepository {
        ReservationRepository::new(self.clone())
    }

    fn create_user_repository(&self) -> Self::UserRepository {
        UserRepository::new(self.clone())
    }

    fn create_identity_repository(&self) -> Self::IdentityRepository {
        CredentialRepository::new(self.clone())
    }

    fn create_availability_repository(&self) -> Self::AvailabilityRepository {
        AvailabilityRepository::new(self.clone())
    }

    fn create_audit_log_repository(&self) -> Self::AuditLogRepository {
        AuditLogRepository::new(self.clone())
    }
}
