//! Migration script discovery and parsing.
//!
//! A script is a file named `<order>.<description>.sql` directly inside a
//! database's script directory, e.g. `0001.create_users.sql`. Files that do
//! not match the pattern are skipped so operators can keep notes next to
//! their scripts.

use crate::checksum::compute_hash;
use crate::error::{CoreError, CoreResult};
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Largest order the `order_num INTEGER` history column can hold.
pub const MAX_ORDER: u32 = i32::MAX as u32;

/// A versioned unit of SQL found on disk.
///
/// Fields are private so a script cannot change after its hash is computed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationScript {
    order: u32,
    file_name: String,
    description: String,
    sql_text: String,
    content_hash: String,
}

impl MigrationScript {
    /// Build a script, computing its content hash.
    ///
    /// Rejects orders outside `1..=MAX_ORDER` and blank file name, description,
    /// or SQL.
    pub fn new(
        order: u32,
        file_name: impl Into<String>,
        description: impl Into<String>,
        sql_text: impl Into<String>,
    ) -> CoreResult<Self> {
        let file_name = file_name.into();
        let description = description.into();
        let sql_text = sql_text.into();

        let invalid = |reason: &str| CoreError::InvalidScript {
            file_name: file_name.clone(),
            reason: reason.to_string(),
        };
        if order == 0 {
            return Err(invalid("order must be greater than 0"));
        }
        if order > MAX_ORDER {
            return Err(invalid("order exceeds the largest storable order"));
        }
        if file_name.trim().is_empty() {
            return Err(invalid("file name is empty"));
        }
        if description.trim().is_empty() {
            return Err(invalid("description is empty"));
        }
        if sql_text.trim().is_empty() {
            return Err(invalid("SQL text is empty"));
        }

        let content_hash = compute_hash(&sql_text);
        Ok(Self {
            order,
            file_name,
            description,
            sql_text,
            content_hash,
        })
    }

    pub fn order(&self) -> u32 {
        self.order
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn sql_text(&self) -> &str {
        &self.sql_text
    }

    pub fn content_hash(&self) -> &str {
        &self.content_hash
    }
}

/// Discovers and parses migration scripts in a directory.
///
/// Owns the compiled filename pattern; create one per run and reuse it for
/// every database directory.
#[derive(Debug, Clone)]
pub struct ScriptLoader {
    pattern: Regex,
}

impl Default for ScriptLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptLoader {
    /// Create a loader for `<digits>.<description>.sql` file names.
    pub fn new() -> Self {
        Self {
            pattern: Regex::new(r"^([0-9]+)\.(.+)\.(?i:sql)$").expect("valid regex literal"),
        }
    }

    /// Parse a file name into `(order, description)`.
    ///
    /// Returns `Ok(None)` for names that do not look like scripts and an error
    /// for names that do but carry an unusable order or description.
    pub fn parse_file_name(
        &self,
        directory: &Path,
        file_name: &str,
    ) -> CoreResult<Option<(u32, String)>> {
        let Some(caps) = self.pattern.captures(file_name) else {
            return Ok(None);
        };

        let invalid = |reason: String| CoreError::InvalidScriptName {
            directory: directory.display().to_string(),
            file_name: file_name.to_string(),
            reason,
        };

        let digits = &caps[1];
        let order: u32 = digits
            .parse()
            .map_err(|e| invalid(format!("order '{digits}' is not a valid number: {e}")))?;
        if order == 0 {
            return Err(invalid("order must be greater than 0".to_string()));
        }
        if order > MAX_ORDER {
            return Err(invalid(format!("order must not exceed {MAX_ORDER}")));
        }

        let description = caps[2].trim();
        if description.is_empty() {
            return Err(invalid("description is empty".to_string()));
        }

        Ok(Some((order, description.to_string())))
    }

    /// Load all scripts in `directory`, sorted ascending by order.
    ///
    /// Only immediate regular files are considered. Duplicate orders, blank
    /// scripts and unreadable files are errors.
    pub fn load(&self, directory: &Path) -> CoreResult<Vec<MigrationScript>> {
        if !directory.is_dir() {
            return Err(CoreError::DirectoryNotFound {
                path: directory.display().to_string(),
            });
        }

        let io_err = |e: std::io::Error| CoreError::IoWithPath {
            path: directory.display().to_string(),
            source: e,
        };

        let mut scripts: BTreeMap<u32, MigrationScript> = BTreeMap::new();
        for entry in std::fs::read_dir(directory).map_err(io_err)? {
            let entry = entry.map_err(io_err)?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
                log::debug!("Skipping non UTF-8 file name: {}", path.display());
                continue;
            };
            let Some((order, description)) = self.parse_file_name(directory, file_name)? else {
                log::debug!("Ignoring non-migration file: {}", path.display());
                continue;
            };

            let bytes = std::fs::read(&path).map_err(|e| CoreError::IoWithPath {
                path: path.display().to_string(),
                source: e,
            })?;
            let sql_text = String::from_utf8(bytes).map_err(|_| CoreError::InvalidEncoding {
                path: path.display().to_string(),
            })?;
            if sql_text.trim().is_empty() {
                return Err(CoreError::EmptyScript {
                    path: path.display().to_string(),
                });
            }

            let script = MigrationScript::new(order, file_name, description, sql_text)?;
            if let Some(existing) = scripts.get(&order) {
                let (first, second) = if existing.file_name() <= script.file_name() {
                    (existing.file_name(), script.file_name())
                } else {
                    (script.file_name(), existing.file_name())
                };
                return Err(CoreError::DuplicateOrder {
                    directory: directory.display().to_string(),
                    order,
                    first: first.to_string(),
                    second: second.to_string(),
                });
            }
            scripts.insert(order, script);
        }

        log::debug!(
            "Loaded {} migration scripts from {}",
            scripts.len(),
            directory.display()
        );
        Ok(scripts.into_values().collect())
    }
}

#[cfg(test)]
#[path = "script_test.rs"]
mod tests;
