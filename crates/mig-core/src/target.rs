//! Database target discovery
//!
//! Every immediate subdirectory of the scripts root is one logical database.

use crate::database_name::DatabaseName;
use crate::error::{CoreError, CoreResult};
use std::path::{Path, PathBuf};

/// One logical database and the directory holding its scripts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseTarget {
    pub name: DatabaseName,
    pub directory: PathBuf,
}

/// Enumerate database targets under `root`, sorted by name.
///
/// Hidden directories (leading `.`) are skipped. A root without any database
/// directory is an error.
pub fn discover_targets(root: &Path) -> CoreResult<Vec<DatabaseTarget>> {
    if !root.is_dir() {
        return Err(CoreError::DirectoryNotFound {
            path: root.display().to_string(),
        });
    }

    let io_err = |e: std::io::Error| CoreError::IoWithPath {
        path: root.display().to_string(),
        source: e,
    };

    let mut targets = Vec::new();
    for entry in std::fs::read_dir(root).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        if !path.is_dir() {
            continue;
        }
        let name = match path.file_name().and_then(|n| n.to_str()) {
            Some(name) if name.starts_with('.') => {
                log::debug!("Skipping hidden directory: {}", path.display());
                continue;
            }
            Some(name) => DatabaseName::try_new(name),
            None => None,
        };
        let Some(name) = name else {
            return Err(CoreError::InvalidDatabaseDirectory {
                path: path.display().to_string(),
                reason: "directory name is not valid UTF-8".to_string(),
            });
        };
        targets.push(DatabaseTarget {
            name,
            directory: path,
        });
    }

    if targets.is_empty() {
        return Err(CoreError::NoDatabases {
            path: root.display().to_string(),
        });
    }

    targets.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(targets)
}

/// Keep only the targets named in `names`; an empty filter keeps all.
///
/// Unknown names are an error rather than a silent no-op.
pub fn select_targets(
    targets: Vec<DatabaseTarget>,
    names: &[String],
    root: &Path,
) -> CoreResult<Vec<DatabaseTarget>> {
    if names.is_empty() {
        return Ok(targets);
    }
    for name in names {
        if !targets.iter().any(|t| t.name == *name) {
            return Err(CoreError::UnknownDatabase {
                name: name.clone(),
                root: root.display().to_string(),
            });
        }
    }
    Ok(targets
        .into_iter()
        .filter(|t| names.iter().any(|n| t.name == *n))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_discover_sorted_subdirectories() {
        let root = TempDir::new().unwrap();
        std::fs::create_dir(root.path().join("orders")).unwrap();
        std::fs::create_dir(root.path().join("accounts")).unwrap();
        std::fs::create_dir(root.path().join(".git")).unwrap();
        std::fs::write(root.path().join("README.md"), "docs").unwrap();

        let targets = discover_targets(root.path()).unwrap();
        let names: Vec<&str> = targets.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["accounts", "orders"]);
        assert_eq!(targets[0].directory, root.path().join("accounts"));
    }

    #[test]
    fn test_no_subdirectories_is_error() {
        let root = TempDir::new().unwrap();
        std::fs::write(root.path().join("0001.init.sql"), "SELECT 1").unwrap();

        let err = discover_targets(root.path()).unwrap_err();
        assert!(matches!(err, CoreError::NoDatabases { .. }));
    }

    #[test]
    fn test_missing_root_is_error() {
        let root = TempDir::new().unwrap();
        let err = discover_targets(&root.path().join("nope")).unwrap_err();
        assert!(matches!(err, CoreError::DirectoryNotFound { .. }));
    }

    #[test]
    fn test_select_targets() {
        let root = TempDir::new().unwrap();
        for name in ["a", "b", "c"] {
            std::fs::create_dir(root.path().join(name)).unwrap();
        }
        let targets = discover_targets(root.path()).unwrap();

        let all = select_targets(targets.clone(), &[], root.path()).unwrap();
        assert_eq!(all.len(), 3);

        let picked =
            select_targets(targets.clone(), &["c".to_string(), "a".to_string()], root.path())
                .unwrap();
        let names: Vec<&str> = picked.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["a", "c"]);

        let err = select_targets(targets, &["z".to_string()], root.path()).unwrap_err();
        assert!(matches!(err, CoreError::UnknownDatabase { .. }));
    }
}
