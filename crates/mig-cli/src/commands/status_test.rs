use super::*;
use mig_core::{DatabaseName, Drift};

fn status(exists: bool, outstanding: Vec<u32>, drift: Vec<Drift>) -> DatabaseStatus {
    DatabaseStatus {
        database: DatabaseName::new("app"),
        exists,
        last_applied: 2,
        applied_count: 2,
        outstanding,
        consistent: drift.is_empty(),
        drift,
    }
}

#[test]
fn state_label_prefers_drift() {
    let drifted = status(
        true,
        vec![3],
        vec![Drift::MissingScript {
            order: 1,
            file_name: "0001.init.sql".to_string(),
        }],
    );
    assert_eq!(state_label(&drifted), "DRIFTED");
    assert_eq!(state_label(&status(false, vec![1], vec![])), "NEW");
    assert_eq!(state_label(&status(true, vec![3], vec![])), "PENDING");
    assert_eq!(state_label(&status(true, vec![], vec![])), "UP TO DATE");
}

#[test]
fn json_output_includes_tagged_drift() {
    let statuses = vec![status(
        true,
        vec![],
        vec![Drift::DuplicateHistory { order: 1 }],
    )];
    let json = serde_json::to_value(&statuses).unwrap();
    assert_eq!(json[0]["database"], "app");
    assert_eq!(json[0]["consistent"], false);
    assert_eq!(json[0]["drift"][0]["kind"], "duplicate_history");
}
