//! mig-core - Core library for Migrator
//!
//! This crate provides the filesystem side of the migration runner: script
//! discovery and parsing, content fingerprints, database target enumeration,
//! configuration parsing, and the consistency check between scripts on disk
//! and the recorded migration history.

pub mod checksum;
pub mod config;
pub mod database_name;
pub mod error;
pub mod history;
pub mod script;
pub mod target;
pub mod verify;

pub use checksum::compute_hash;
pub use config::Config;
pub use database_name::DatabaseName;
pub use error::{CoreError, CoreResult};
pub use history::{last_applied, MigrationHistoryEntry};
pub use script::{MigrationScript, ScriptLoader, MAX_ORDER};
pub use target::{discover_targets, select_targets, DatabaseTarget};
pub use verify::{find_drift, is_consistent, set_fingerprint, verify, ConsistencyError, Drift};
