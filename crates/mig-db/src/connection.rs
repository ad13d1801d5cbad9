//! Database connection wrapper.
//!
//! [`MigrationDb`] owns a DuckDB [`Connection`] to one logical database and
//! provides the transaction helpers the applier and runner build on.

use crate::error::{MigrateError, MigrateResult};
use duckdb::Connection;
use mig_core::DatabaseName;
use std::fmt;
use std::path::{Path, PathBuf};

/// Shared connection settings, combined with a database name to locate it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionParams {
    data_dir: PathBuf,
    in_memory: bool,
}

impl ConnectionParams {
    /// Databases live as `<data_dir>/<name>.duckdb`.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            in_memory: false,
        }
    }

    /// Every database is a fresh in-memory DuckDB instance.
    ///
    /// Nothing survives the connection, so this only suits single-open tests.
    pub fn in_memory() -> Self {
        Self {
            data_dir: PathBuf::new(),
            in_memory: true,
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Resolve where `database` lives.
    pub fn location(&self, database: &DatabaseName) -> DatabaseLocation {
        if self.in_memory {
            DatabaseLocation::Memory
        } else {
            DatabaseLocation::File(self.data_dir.join(format!("{database}.duckdb")))
        }
    }
}

/// Resolved location of one database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseLocation {
    Memory,
    File(PathBuf),
}

impl fmt::Display for DatabaseLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatabaseLocation::Memory => f.write_str(":memory:"),
            DatabaseLocation::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Connection to one logical database.
///
/// Single-threaded: databases are migrated one at a time.
pub struct MigrationDb {
    conn: Connection,
    name: DatabaseName,
    location: DatabaseLocation,
}

impl MigrationDb {
    /// Open (or create) the database for `name`.
    ///
    /// Creates the data directory if needed.
    pub fn open(name: &DatabaseName, params: &ConnectionParams) -> MigrateResult<Self> {
        let location = params.location(name);
        let conn = match &location {
            DatabaseLocation::Memory => Connection::open_in_memory(),
            DatabaseLocation::File(path) => {
                std::fs::create_dir_all(params.data_dir()).map_err(|e| MigrateError::DataDir {
                    path: params.data_dir().display().to_string(),
                    source: e,
                })?;
                Connection::open(path)
            }
        }
        .map_err(|e| MigrateError::Connectivity {
            database: name.clone(),
            location: location.to_string(),
            source: e,
        })?;

        log::debug!("Opened database '{name}' at {location}");
        Ok(Self {
            conn,
            name: name.clone(),
            location,
        })
    }

    /// Open an existing database without write access.
    ///
    /// Returns `Ok(None)` when the database file does not exist yet, so
    /// inspecting a fresh environment creates nothing.
    pub fn open_read_only(
        name: &DatabaseName,
        params: &ConnectionParams,
    ) -> MigrateResult<Option<Self>> {
        let location = params.location(name);
        let path = match &location {
            DatabaseLocation::Memory => return Self::open(name, params).map(Some),
            DatabaseLocation::File(path) if !path.exists() => return Ok(None),
            DatabaseLocation::File(path) => path.clone(),
        };

        let connectivity = |e| MigrateError::Connectivity {
            database: name.clone(),
            location: location.to_string(),
            source: e,
        };
        let config = duckdb::Config::default()
            .access_mode(duckdb::AccessMode::ReadOnly)
            .map_err(connectivity)?;
        let conn = Connection::open_with_flags(&path, config).map_err(connectivity)?;

        Ok(Some(Self {
            conn,
            name: name.clone(),
            location,
        }))
    }

    /// Borrow the underlying DuckDB connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    pub fn name(&self) -> &DatabaseName {
        &self.name
    }

    pub fn location(&self) -> &DatabaseLocation {
        &self.location
    }

    /// Execute `body` within a `BEGIN` / `COMMIT` transaction, rolling back on
    /// error.
    pub fn transaction<F, T>(&self, body: F) -> MigrateResult<T>
    where
        F: FnOnce(&Connection) -> MigrateResult<T>,
    {
        self.begin()?;

        let result = body(&self.conn);

        match &result {
            Ok(_) => {
                if let Err(commit_err) = self.conn.execute_batch("COMMIT") {
                    let _ = self.conn.execute_batch("ROLLBACK");
                    return Err(MigrateError::Transaction {
                        database: self.name.clone(),
                        message: format!("COMMIT failed: {commit_err}"),
                    });
                }
            }
            Err(e) => {
                log::debug!("Rolling back '{}': {e}", self.name);
                if let Err(rollback_err) = self.rollback() {
                    log::warn!("{rollback_err}");
                }
            }
        }
        result
    }

    /// Execute `body` within a transaction that is always rolled back.
    pub fn dry_run<F, T>(&self, body: F) -> MigrateResult<T>
    where
        F: FnOnce(&Connection) -> MigrateResult<T>,
    {
        self.begin()?;
        let result = body(&self.conn);
        let rolled_back = self.rollback();
        match (result, rolled_back) {
            (Ok(value), Ok(())) => Ok(value),
            (Ok(_), Err(rollback_err)) => Err(rollback_err),
            (Err(e), Ok(())) => Err(e),
            (Err(e), Err(rollback_err)) => {
                log::warn!("{rollback_err}");
                Err(e)
            }
        }
    }

    fn begin(&self) -> MigrateResult<()> {
        self.conn
            .execute_batch("BEGIN TRANSACTION")
            .map_err(|e| MigrateError::Transaction {
                database: self.name.clone(),
                message: format!("BEGIN failed: {e}"),
            })
    }

    fn rollback(&self) -> MigrateResult<()> {
        self.conn
            .execute_batch("ROLLBACK")
            .map_err(|e| MigrateError::Transaction {
                database: self.name.clone(),
                message: format!("ROLLBACK failed: {e}"),
            })
    }
}

#[cfg(test)]
#[path = "connection_test.rs"]
mod tests;
