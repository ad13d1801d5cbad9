use super::*;
use tempfile::TempDir;

fn count(db: &MigrationDb, sql: &str) -> i64 {
    db.conn()
        .query_row(sql, [], |row| row.get::<_, i64>(0))
        .unwrap()
}

#[test]
fn location_joins_data_dir_and_name() {
    let params = ConnectionParams::new("/var/lib/migrator");
    let location = params.location(&DatabaseName::new("orders"));
    assert_eq!(
        location,
        DatabaseLocation::File(PathBuf::from("/var/lib/migrator/orders.duckdb"))
    );
    assert_eq!(location.to_string(), "/var/lib/migrator/orders.duckdb");
    assert_eq!(
        ConnectionParams::in_memory().location(&DatabaseName::new("orders")),
        DatabaseLocation::Memory
    );
}

#[test]
fn open_creates_data_dir_and_file() {
    let dir = TempDir::new().unwrap();
    let params = ConnectionParams::new(dir.path().join("nested/data"));
    let name = DatabaseName::new("app");

    let db = MigrationDb::open(&name, &params).unwrap();
    assert_eq!(db.name(), &name);
    assert!(dir.path().join("nested/data/app.duckdb").exists());
}

#[test]
fn open_read_only_missing_file_is_none() {
    let dir = TempDir::new().unwrap();
    let params = ConnectionParams::new(dir.path());
    let db = MigrationDb::open_read_only(&DatabaseName::new("ghost"), &params).unwrap();
    assert!(db.is_none());
    assert!(!dir.path().join("ghost.duckdb").exists());
}

#[test]
fn open_read_only_sees_existing_data() {
    let dir = TempDir::new().unwrap();
    let params = ConnectionParams::new(dir.path());
    let name = DatabaseName::new("app");
    {
        let db = MigrationDb::open(&name, &params).unwrap();
        db.conn()
            .execute_batch("CREATE TABLE t (id INTEGER); INSERT INTO t VALUES (1);")
            .unwrap();
    }

    let db = MigrationDb::open_read_only(&name, &params).unwrap().unwrap();
    assert_eq!(count(&db, "SELECT COUNT(*) FROM t"), 1);
    assert!(db.conn().execute_batch("INSERT INTO t VALUES (2)").is_err());
}

#[test]
fn transaction_commits_on_success() {
    let db = MigrationDb::open(&DatabaseName::new("app"), &ConnectionParams::in_memory()).unwrap();
    db.transaction(|conn| {
        conn.execute_batch("CREATE TABLE t (id INTEGER); INSERT INTO t VALUES (1);")
            .unwrap();
        Ok(())
    })
    .unwrap();
    assert_eq!(count(&db, "SELECT COUNT(*) FROM t"), 1);
}

#[test]
fn transaction_rolls_back_on_error() {
    let db = MigrationDb::open(&DatabaseName::new("app"), &ConnectionParams::in_memory()).unwrap();
    db.conn().execute_batch("CREATE TABLE t (id INTEGER)").unwrap();

    let result: MigrateResult<()> = db.transaction(|conn| {
        conn.execute_batch("INSERT INTO t VALUES (1)").unwrap();
        Err(MigrateError::History {
            database: DatabaseName::new("app"),
            message: "boom".to_string(),
        })
    });
    assert!(result.is_err());
    assert_eq!(count(&db, "SELECT COUNT(*) FROM t"), 0);
}

#[test]
fn dry_run_always_rolls_back() {
    let db = MigrationDb::open(&DatabaseName::new("app"), &ConnectionParams::in_memory()).unwrap();
    let value = db
        .dry_run(|conn| {
            conn.execute_batch("CREATE TABLE t (id INTEGER)").unwrap();
            Ok(42)
        })
        .unwrap();
    assert_eq!(value, 42);

    let tables = count(
        &db,
        "SELECT COUNT(*) FROM information_schema.tables WHERE table_name = 't'",
    );
    assert_eq!(tables, 0);
}

#[test]
fn dry_run_keeps_body_error_when_rollback_fails() {
    let db = MigrationDb::open(&DatabaseName::new("app"), &ConnectionParams::in_memory()).unwrap();

    // Ending the transaction inside the body makes the closing ROLLBACK fail.
    let err = db
        .dry_run(|conn| -> MigrateResult<()> {
            conn.execute_batch("COMMIT").unwrap();
            Err(MigrateError::History {
                database: DatabaseName::new("app"),
                message: "body failed".to_string(),
            })
        })
        .unwrap_err();
    assert!(matches!(err, MigrateError::History { ref message, .. } if message == "body failed"));
}

#[test]
fn dry_run_reports_rollback_failure_after_success() {
    let db = MigrationDb::open(&DatabaseName::new("app"), &ConnectionParams::in_memory()).unwrap();

    let err = db
        .dry_run(|conn| -> MigrateResult<()> {
            conn.execute_batch("COMMIT").unwrap();
            Ok(())
        })
        .unwrap_err();
    assert!(matches!(err, MigrateError::Transaction { .. }));
}
