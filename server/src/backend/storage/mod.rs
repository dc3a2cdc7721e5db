//! # Storage Module
//!
//! Persistence for reservations, users, credentials, lab availability and
//! audit logs. Domain services only see the traits in [`traits`]; the CSV and
//! YAML files under the data directory are one implementation of them.
//!
//! Every write rewrites the whole file through a temp file and a rename, and
//! all writes on a connection share one lock so files are never torn. The
//! lock does not make a service-level read-check-write sequence atomic.

pub mod csv;
pub mod traits;

pub use csv::CsvConnection;
pub use traits::*;
