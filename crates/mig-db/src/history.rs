//! The `migration_history` table.
//!
//! One append-only row per applied script, stored in the migrated database
//! itself. The column is `order_num` because `order` is reserved in SQL.

use crate::error::{MigrateError, MigrateResult};
use duckdb::Connection;
use mig_core::{DatabaseName, MigrationHistoryEntry, MigrationScript};

/// Name of the history table.
pub const HISTORY_TABLE: &str = "migration_history";

const HISTORY_DDL: &str = "
    CREATE SEQUENCE IF NOT EXISTS migration_history_id_seq START 1;
    CREATE TABLE IF NOT EXISTS migration_history (
        id         BIGINT PRIMARY KEY DEFAULT nextval('migration_history_id_seq'),
        order_num  INTEGER NOT NULL UNIQUE,
        file_name  VARCHAR NOT NULL,
        name       VARCHAR NOT NULL,
        sql_text   VARCHAR NOT NULL,
        hash       VARCHAR NOT NULL,
        applied_at TIMESTAMP NOT NULL DEFAULT now()
    );
    CREATE TABLE IF NOT EXISTS migration_lock (
        id        INTEGER PRIMARY KEY,
        locked_at TIMESTAMP,
        locked_by VARCHAR
    );
    INSERT OR IGNORE INTO migration_lock (id) VALUES (1);
";

/// Create the history and lock tables if they do not exist yet.
pub fn ensure_history_table(conn: &Connection, database: &DatabaseName) -> MigrateResult<()> {
    conn.execute_batch(HISTORY_DDL)
        .map_err(|e| MigrateError::History {
            database: database.clone(),
            message: format!("failed to create {HISTORY_TABLE} table: {e}"),
        })
}

/// Whether the history table exists, without creating it.
pub fn history_table_exists(conn: &Connection, database: &DatabaseName) -> MigrateResult<bool> {
    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM information_schema.tables WHERE table_schema = 'main' AND table_name = ?",
            duckdb::params![HISTORY_TABLE],
            |row| row.get(0),
        )
        .map_err(|e| MigrateError::History {
            database: database.clone(),
            message: format!("failed to look up {HISTORY_TABLE}: {e}"),
        })?;
    Ok(count > 0)
}

/// Read every history row, ascending by order.
pub fn load_history(
    conn: &Connection,
    database: &DatabaseName,
) -> MigrateResult<Vec<MigrationHistoryEntry>> {
    let history_err = |e: duckdb::Error| MigrateError::History {
        database: database.clone(),
        message: format!("failed to read {HISTORY_TABLE}: {e}"),
    };

    let mut stmt = conn
        .prepare(
            "SELECT order_num, file_name, name, sql_text, hash, CAST(applied_at AS VARCHAR)
             FROM migration_history
             ORDER BY order_num",
        )
        .map_err(history_err)?;
    let rows = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                MigrationHistoryEntry {
                    order: 0,
                    file_name: row.get(1)?,
                    description: row.get(2)?,
                    sql_text: row.get(3)?,
                    content_hash: row.get(4)?,
                    applied_at: row.get(5)?,
                },
            ))
        })
        .map_err(history_err)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(history_err)?;

    rows.into_iter()
        .map(|(order, mut entry)| {
            entry.order = u32::try_from(order)
                .ok()
                .filter(|o| *o > 0)
                .ok_or_else(|| MigrateError::History {
                    database: database.clone(),
                    message: format!(
                        "row for '{}' has invalid order_num {order}",
                        entry.file_name
                    ),
                })?;
            Ok(entry)
        })
        .collect()
}

/// Append the history row for `script`.
///
/// Must run inside the transaction that executed the script.
pub fn record(
    conn: &Connection,
    database: &DatabaseName,
    script: &MigrationScript,
) -> MigrateResult<()> {
    let entry = MigrationHistoryEntry::from_script(script);
    conn.execute(
        "INSERT INTO migration_history (order_num, file_name, name, sql_text, hash)
         VALUES (?, ?, ?, ?, ?)",
        duckdb::params![
            entry.order,
            entry.file_name,
            entry.description,
            entry.sql_text,
            entry.content_hash
        ],
    )
    .map_err(|e| MigrateError::Record {
        database: database.clone(),
        order: script.order(),
        file_name: script.file_name().to_string(),
        source: e,
    })?;
    Ok(())
}

#[cfg(test)]
#[path = "history_test.rs"]
mod tests;
