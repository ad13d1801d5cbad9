//! Migration history records.

use crate::script::MigrationScript;
use serde::Serialize;

/// A durable record that a script was applied to a database.
///
/// Captures the script as it was at apply time so later edits to the file
/// can be detected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationHistoryEntry {
    pub order: u32,
    pub file_name: String,
    pub description: String,
    pub sql_text: String,
    pub content_hash: String,
    /// Set when read back from a database; `None` before insertion.
    pub applied_at: Option<String>,
}

impl MigrationHistoryEntry {
    /// Build the history row that records `script` being applied.
    pub fn from_script(script: &MigrationScript) -> Self {
        Self {
            order: script.order(),
            file_name: script.file_name().to_string(),
            description: script.description().to_string(),
            sql_text: script.sql_text().to_string(),
            content_hash: script.content_hash().to_string(),
            applied_at: None,
        }
    }
}

/// Highest applied order, or 0 when nothing has been applied.
pub fn last_applied(history: &[MigrationHistoryEntry]) -> u32 {
    history.iter().map(|e| e.order).max().unwrap_or(0)
}
