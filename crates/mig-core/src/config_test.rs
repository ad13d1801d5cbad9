use super::*;
use tempfile::TempDir;

#[test]
fn test_parse_full_config() {
    let yaml = r#"
scripts_dir: db/scripts
data_dir: var/db
databases:
  - accounts
  - orders
"#;
    let config: Config = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(config.scripts_dir, "db/scripts");
    assert_eq!(config.data_dir, "var/db");
    assert_eq!(config.databases, vec!["accounts", "orders"]);
}

#[test]
fn test_defaults() {
    let config: Config = serde_yaml::from_str("{}").unwrap();
    assert_eq!(config, Config::default());
    assert_eq!(config.scripts_dir, "migrations");
    assert_eq!(config.data_dir, "data");
    assert!(config.databases.is_empty());
}

#[test]
fn test_unknown_field_rejected() {
    let result: Result<Config, _> = serde_yaml::from_str("scripts: db\n");
    assert!(result.is_err());
}

#[test]
fn test_load_missing_file() {
    let dir = TempDir::new().unwrap();
    let err = Config::load(&dir.path().join("migrator.yml")).unwrap_err();
    assert!(matches!(err, CoreError::ConfigNotFound { .. }));
}

#[test]
fn test_load_rejects_duplicate_databases() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("migrator.yml");
    std::fs::write(&path, "databases: [app, app]\n").unwrap();

    let err = Config::load(&path).unwrap_err();
    assert!(matches!(err, CoreError::ConfigInvalid { .. }));
}

#[test]
fn test_load_rejects_empty_scripts_dir() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("migrator.yml");
    std::fs::write(&path, "scripts_dir: \"\"\n").unwrap();

    assert!(Config::load(&path).is_err());
}

#[test]
fn test_load_from_dir_prefers_yml() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("migrator.yml"), "data_dir: from_yml\n").unwrap();
    std::fs::write(dir.path().join("migrator.yaml"), "data_dir: from_yaml\n").unwrap();

    let config = Config::load_from_dir(dir.path()).unwrap();
    assert_eq!(config.data_dir, "from_yml");
}

#[test]
fn test_load_from_dir_defaults_when_absent() {
    let dir = TempDir::new().unwrap();
    assert_eq!(Config::load_from_dir(dir.path()).unwrap(), Config::default());
}

#[test]
fn test_absolute_paths() {
    let config = Config::default();
    let root = Path::new("/srv/app");
    assert_eq!(
        config.scripts_dir_absolute(root),
        PathBuf::from("/srv/app/migrations")
    );
    assert_eq!(config.data_dir_absolute(root), PathBuf::from("/srv/app/data"));
}
