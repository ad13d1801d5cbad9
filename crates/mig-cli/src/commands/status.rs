//! Status command implementation

use anyhow::{Context, Result};
use mig_db::{DatabaseStatus, ErrorKind};

use crate::cli::{GlobalArgs, StatusArgs, StatusOutput};
use crate::commands::common::{self, ExitCode, Settings};

/// Execute the status command
///
/// Exits with the consistency code when any database has drifted.
pub(crate) fn execute(args: &StatusArgs, global: &GlobalArgs) -> Result<()> {
    let settings = Settings::resolve(global, args.databases.as_deref())?;
    let statuses = settings
        .runner()
        .status(&settings.databases)
        .map_err(common::run_error)?;

    match args.output {
        StatusOutput::Table => print_table(&statuses),
        StatusOutput::Json => print_json(&statuses)?,
    }

    let drifted = statuses.iter().filter(|s| !s.consistent).count();
    if drifted > 0 {
        log::warn!("{drifted} database(s) have drifted from their recorded history");
        return Err(ExitCode(common::exit_code_for_kind(ErrorKind::Consistency)).into());
    }
    Ok(())
}

fn state_label(status: &DatabaseStatus) -> &'static str {
    if !status.consistent {
        "DRIFTED"
    } else if !status.exists {
        "NEW"
    } else if status.outstanding.is_empty() {
        "UP TO DATE"
    } else {
        "PENDING"
    }
}

fn print_table(statuses: &[DatabaseStatus]) {
    if statuses.is_empty() {
        println!("No databases found.");
        return;
    }

    let name_width = statuses
        .iter()
        .map(|s| s.database.len())
        .max()
        .unwrap_or(8)
        .max(8);
    let last_width = 12;
    let applied_width = 7;
    let pending_width = 11;

    println!(
        "{:<name_width$}  {:<last_width$}  {:<applied_width$}  {:<pending_width$}  STATE",
        "DATABASE", "LAST_APPLIED", "APPLIED", "OUTSTANDING",
    );
    println!(
        "{:-<name_width$}  {:-<last_width$}  {:-<applied_width$}  {:-<pending_width$}  {}",
        "",
        "",
        "",
        "",
        "-".repeat(10),
    );

    for status in statuses {
        println!(
            "{:<name_width$}  {:<last_width$}  {:<applied_width$}  {:<pending_width$}  {}",
            status.database.as_str(),
            status.last_applied,
            status.applied_count,
            status.outstanding.len(),
            state_label(status),
        );
    }

    for status in statuses.iter().filter(|s| !s.drift.is_empty()) {
        println!();
        println!("Drift in '{}':", status.database);
        for drift in &status.drift {
            println!("  - {drift}");
        }
    }
}

fn print_json(statuses: &[DatabaseStatus]) -> Result<()> {
    let json = serde_json::to_string_pretty(statuses).context("Failed to serialize to JSON")?;
    println!("{}", json);
    Ok(())
}

#[cfg(test)]
#[path = "status_test.rs"]
mod tests;
