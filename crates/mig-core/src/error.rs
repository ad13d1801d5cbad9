//! Error types for mig-core
//!
//! Every variant here is a configuration problem: it is detected from the
//! filesystem or the config file before any database is touched.

use thiserror::Error;

/// Core error type for Migrator
#[derive(Error, Debug)]
pub enum CoreError {
    /// C001: Scripts directory missing or not a directory
    #[error("[C001] Scripts directory not found: {path}")]
    DirectoryNotFound { path: String },

    /// C002: Root directory has no database subdirectories
    #[error("[C002] No databases to migrate: '{path}' has no subdirectories")]
    NoDatabases { path: String },

    /// C003: Two scripts in one directory share an order number
    #[error("[C003] Duplicate migration order {order} in '{directory}': '{first}' and '{second}'")]
    DuplicateOrder {
        directory: String,
        order: u32,
        first: String,
        second: String,
    },

    /// C004: Filename matches the script pattern but cannot be parsed
    #[error("[C004] Invalid migration file name '{file_name}' in '{directory}': {reason}")]
    InvalidScriptName {
        directory: String,
        file_name: String,
        reason: String,
    },

    /// C005: Script file has no SQL
    #[error("[C005] Migration script '{path}' is empty")]
    EmptyScript { path: String },

    /// C006: Script file is not valid UTF-8
    #[error("[C006] Migration script '{path}' is not valid UTF-8")]
    InvalidEncoding { path: String },

    /// C007: Database subdirectory name is unusable
    #[error("[C007] Invalid database directory '{path}': {reason}")]
    InvalidDatabaseDirectory { path: String, reason: String },

    /// C008: Requested database does not exist under the scripts root
    #[error("[C008] Unknown database '{name}': no such directory under '{root}'")]
    UnknownDatabase { name: String, root: String },

    /// C009: Scripts passed to the applier are not strictly ascending
    #[error("[C009] Migration batch for '{database}' is not in ascending order at {order}")]
    UnorderedBatch { database: String, order: u32 },

    /// C011: Config file not found
    #[error("[C011] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// C012: Invalid configuration value
    #[error("[C012] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// C013: IO error with file path context
    #[error("[C013] Failed to read '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },

    /// C014: YAML parse error
    #[error("[C014] Config parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// C015: Script value violates its invariants
    #[error("[C015] Invalid migration script '{file_name}': {reason}")]
    InvalidScript { file_name: String, reason: String },
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
