//! Error types for mig-db

use mig_core::{ConsistencyError, CoreError, DatabaseName};
use thiserror::Error;

/// Broad failure category, used for exit codes and reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad directory layout, file names, or config. Raised before any database is touched.
    Configuration,
    /// Scripts on disk no longer match recorded history.
    Consistency,
    /// A script or its history row failed; the batch was rolled back.
    Execution,
    /// The database could not be opened or locked.
    Connectivity,
}

/// Migration run errors
#[derive(Error, Debug)]
pub enum MigrateError {
    /// Directory, file name, or config problem.
    #[error(transparent)]
    Configuration(#[from] CoreError),

    /// History drift for one database.
    #[error(transparent)]
    Consistency(#[from] ConsistencyError),

    /// A script failed to execute (M001).
    #[error("[M001] Migration {order} ({file_name}) failed on database '{database}'")]
    Execution {
        database: DatabaseName,
        order: u32,
        file_name: String,
        #[source]
        source: duckdb::Error,
    },

    /// The history row for a script could not be written (M002).
    #[error("[M002] Failed to record migration {order} ({file_name}) on database '{database}'")]
    Record {
        database: DatabaseName,
        order: u32,
        file_name: String,
        #[source]
        source: duckdb::Error,
    },

    /// BEGIN, COMMIT, or ROLLBACK failed (M003).
    #[error("[M003] Transaction on database '{database}' failed: {message}")]
    Transaction {
        database: DatabaseName,
        message: String,
    },

    /// The database could not be opened (M004).
    #[error("[M004] Cannot connect to database '{database}' at {location}")]
    Connectivity {
        database: DatabaseName,
        location: String,
        #[source]
        source: duckdb::Error,
    },

    /// The data directory could not be created (M005).
    #[error("[M005] Cannot prepare data directory '{path}'")]
    DataDir {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Another run holds the database's migration lock (M006).
    #[error("[M006] Database '{database}' is locked by another migration run: {message}")]
    Locked {
        database: DatabaseName,
        message: String,
    },

    /// The history table could not be created or read (M007).
    #[error("[M007] Migration history of database '{database}' is unreadable: {message}")]
    History {
        database: DatabaseName,
        message: String,
    },
}

/// Result type alias for [`MigrateError`].
pub type MigrateResult<T> = Result<T, MigrateError>;

impl MigrateError {
    /// Category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            MigrateError::Configuration(_) => ErrorKind::Configuration,
            MigrateError::Consistency(_) => ErrorKind::Consistency,
            MigrateError::Execution { .. }
            | MigrateError::Record { .. }
            | MigrateError::Transaction { .. }
            | MigrateError::History { .. } => ErrorKind::Execution,
            MigrateError::Connectivity { .. }
            | MigrateError::DataDir { .. }
            | MigrateError::Locked { .. } => ErrorKind::Connectivity,
        }
    }

    /// Database the run stopped at, when the error is tied to one.
    pub fn database(&self) -> Option<&DatabaseName> {
        match self {
            MigrateError::Consistency(e) => Some(&e.database),
            MigrateError::Execution { database, .. }
            | MigrateError::Record { database, .. }
            | MigrateError::Transaction { database, .. }
            | MigrateError::Connectivity { database, .. }
            | MigrateError::Locked { database, .. }
            | MigrateError::History { database, .. } => Some(database),
            MigrateError::Configuration(_) | MigrateError::DataDir { .. } => None,
        }
    }
}
