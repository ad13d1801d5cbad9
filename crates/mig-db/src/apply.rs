//! Transactional batch apply.
//!
//! All outstanding scripts of one database run in a single transaction
//! together with their history rows. Either the whole batch commits or none
//! of it is visible.

use crate::connection::MigrationDb;
use crate::error::{MigrateError, MigrateResult};
use crate::history::record;
use crate::lock;
use duckdb::Connection;
use mig_core::{CoreError, DatabaseName, MigrationScript};

/// Apply `outstanding` to `db` in one transaction and return how many ran.
///
/// Scripts must be strictly ascending by order. Any failure rolls back the
/// entire batch.
pub fn apply(db: &MigrationDb, outstanding: &[MigrationScript]) -> MigrateResult<usize> {
    check_ascending(db.name(), outstanding)?;
    db.transaction(|conn| {
        lock::acquire(conn, db.name())?;
        apply_batch(conn, db.name(), outstanding)
    })
}

/// Reject batches that are not strictly ascending by order.
pub(crate) fn check_ascending(
    database: &DatabaseName,
    scripts: &[MigrationScript],
) -> MigrateResult<()> {
    for pair in scripts.windows(2) {
        if pair[1].order() <= pair[0].order() {
            return Err(CoreError::UnorderedBatch {
                database: database.to_string(),
                order: pair[1].order(),
            }
            .into());
        }
    }
    Ok(())
}

/// Execute each script and record it, inside the caller's transaction.
pub(crate) fn apply_batch(
    conn: &Connection,
    database: &DatabaseName,
    scripts: &[MigrationScript],
) -> MigrateResult<usize> {
    for script in scripts {
        log::info!("Applying {} to '{database}'", script.file_name());
        conn.execute_batch(script.sql_text())
            .map_err(|e| MigrateError::Execution {
                database: database.clone(),
                order: script.order(),
                file_name: script.file_name().to_string(),
                source: e,
            })?;
        record(conn, database, script)?;
    }
    Ok(scripts.len())
}

#[cfg(test)]
#[path = "apply_test.rs"]
mod tests;
