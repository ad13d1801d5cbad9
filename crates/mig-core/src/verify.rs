//! Drift detection between scripts on disk and recorded history.
//!
//! Only scripts at or below the last applied order are compared. Outstanding
//! scripts may be edited freely until they are applied.

use crate::checksum::compute_hash;
use crate::database_name::DatabaseName;
use crate::history::{last_applied, MigrationHistoryEntry};
use crate::script::MigrationScript;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// One reason why scripts and history disagree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Drift {
    /// The file was edited after it was applied.
    Modified {
        order: u32,
        file_name: String,
        recorded_hash: String,
        current_hash: String,
    },
    /// History has a row whose script file is gone.
    MissingScript { order: u32, file_name: String },
    /// A script sits at or below the last applied order but was never applied.
    Unrecorded { order: u32, file_name: String },
    /// History holds the same order more than once.
    DuplicateHistory { order: u32 },
}

impl fmt::Display for Drift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Drift::Modified {
                order,
                file_name,
                recorded_hash,
                current_hash,
            } => write!(
                f,
                "script {order} ({file_name}) changed after it was applied (recorded {}, now {})",
                short_hash(recorded_hash),
                short_hash(current_hash)
            ),
            Drift::MissingScript { order, file_name } => {
                write!(f, "script {order} ({file_name}) was applied but is missing on disk")
            }
            Drift::Unrecorded { order, file_name } => write!(
                f,
                "script {order} ({file_name}) is below the last applied order but was never applied"
            ),
            Drift::DuplicateHistory { order } => {
                write!(f, "history records order {order} more than once")
            }
        }
    }
}

fn short_hash(hash: &str) -> &str {
    hash.get(..12).unwrap_or(hash)
}

/// Scripts and history for one database disagree.
#[derive(Error, Debug, Clone)]
#[error(
    "[C010] Migration history of database '{database}' does not match scripts in '{}': {}",
    .directory.display(),
    describe(.drift)
)]
pub struct ConsistencyError {
    pub database: DatabaseName,
    pub directory: PathBuf,
    pub drift: Vec<Drift>,
}

fn describe(drift: &[Drift]) -> String {
    if drift.is_empty() {
        return "applied set fingerprint differs".to_string();
    }
    drift
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Order-independent SHA-256 fingerprint of a set of `(order, hash)` pairs.
///
/// Pairs are sorted and length-prefixed before hashing, so equal sets give
/// equal fingerprints regardless of input order and repeated pairs never
/// cancel out.
pub fn set_fingerprint<'a, I>(pairs: I) -> String
where
    I: IntoIterator<Item = (u32, &'a str)>,
{
    let mut pairs: Vec<(u32, &str)> = pairs.into_iter().collect();
    pairs.sort_unstable();

    let mut canonical = String::new();
    for (order, hash) in pairs {
        canonical.push_str(&format!("{order}:{}:{hash}\n", hash.len()));
    }
    compute_hash(&canonical)
}

fn considered(scripts: &[MigrationScript], last_applied: u32) -> Vec<&MigrationScript> {
    scripts.iter().filter(|s| s.order() <= last_applied).collect()
}

/// Check that scripts at or below `last_applied` match `history` exactly.
///
/// Requires both equal counts and equal set fingerprints.
pub fn is_consistent(
    scripts: &[MigrationScript],
    history: &[MigrationHistoryEntry],
    last_applied: u32,
) -> bool {
    let considered = considered(scripts, last_applied);
    if considered.len() != history.len() {
        return false;
    }

    let on_disk = set_fingerprint(considered.iter().map(|s| (s.order(), s.content_hash())));
    let recorded = set_fingerprint(history.iter().map(|e| (e.order, e.content_hash.as_str())));
    on_disk == recorded
}

/// List every per-order difference between scripts and history.
///
/// Empty when [`is_consistent`] holds.
pub fn find_drift(
    scripts: &[MigrationScript],
    history: &[MigrationHistoryEntry],
    last_applied: u32,
) -> Vec<Drift> {
    let mut drift = Vec::new();

    let mut recorded: BTreeMap<u32, &MigrationHistoryEntry> = BTreeMap::new();
    for entry in history {
        if recorded.insert(entry.order, entry).is_some() {
            drift.push(Drift::DuplicateHistory { order: entry.order });
        }
    }
    let on_disk: BTreeMap<u32, &MigrationScript> = considered(scripts, last_applied)
        .into_iter()
        .map(|s| (s.order(), s))
        .collect();

    for (order, entry) in &recorded {
        match on_disk.get(order) {
            Some(script) if script.content_hash() != entry.content_hash => {
                drift.push(Drift::Modified {
                    order: *order,
                    file_name: script.file_name().to_string(),
                    recorded_hash: entry.content_hash.clone(),
                    current_hash: script.content_hash().to_string(),
                });
            }
            Some(_) => {}
            None => drift.push(Drift::MissingScript {
                order: *order,
                file_name: entry.file_name.clone(),
            }),
        }
    }
    for (order, script) in &on_disk {
        if !recorded.contains_key(order) {
            drift.push(Drift::Unrecorded {
                order: *order,
                file_name: script.file_name().to_string(),
            });
        }
    }

    drift
}

/// Verify one database and return its last applied order.
///
/// On failure nothing may be applied to the database.
pub fn verify(
    database: &DatabaseName,
    directory: &Path,
    scripts: &[MigrationScript],
    history: &[MigrationHistoryEntry],
) -> Result<u32, ConsistencyError> {
    let last = last_applied(history);
    if is_consistent(scripts, history, last) {
        return Ok(last);
    }
    Err(ConsistencyError {
        database: database.clone(),
        directory: directory.to_path_buf(),
        drift: find_drift(scripts, history, last),
    })
}

#[cfg(test)]
#[path = "verify_test.rs"]
mod tests;
