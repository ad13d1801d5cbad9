//! mig-db - DuckDB layer for Migrator
//!
//! Owns everything that touches a database: connections and transactions,
//! the `migration_history` table, the per-database lock row, transactional
//! batch apply, and the [`Runner`] that drives all databases in turn.

pub mod apply;
pub mod connection;
pub mod error;
pub mod history;
pub mod lock;
pub mod runner;

pub use apply::apply;
pub use connection::{ConnectionParams, DatabaseLocation, MigrationDb};
pub use error::{ErrorKind, MigrateError, MigrateResult};
pub use runner::{
    DatabaseReport, DatabaseStatus, PlannedDatabase, RunMode, RunOptions, RunSummary, Runner,
};
