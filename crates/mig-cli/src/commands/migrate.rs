//! Migrate command implementation

use anyhow::Result;
use mig_db::{RunMode, RunOptions, RunSummary};

use crate::cli::{GlobalArgs, MigrateArgs};
use crate::commands::common::{self, Settings};

/// Execute the migrate command
pub(crate) fn execute(args: &MigrateArgs, global: &GlobalArgs) -> Result<()> {
    let mode = if args.dry_run {
        RunMode::VerifyOnly
    } else {
        RunMode::Apply
    };
    run(global, args.databases.as_deref(), mode)
}

/// Resolve settings, run every selected database, and print the summary.
pub(crate) fn run(global: &GlobalArgs, databases: Option<&str>, mode: RunMode) -> Result<()> {
    let settings = Settings::resolve(global, databases)?;
    let runner = settings.runner();

    let summary = runner
        .run(&RunOptions {
            mode,
            databases: settings.databases.clone(),
        })
        .map_err(common::run_error)?;

    print_summary(&summary);
    Ok(())
}

fn print_summary(summary: &RunSummary) {
    let verb = match summary.mode {
        RunMode::Apply => "applied",
        RunMode::VerifyOnly => "pending",
    };

    for report in &summary.databases {
        if report.applied.is_empty() {
            println!(
                "  ✓ {} - up to date (last applied {})",
                report.database, report.last_applied
            );
        } else {
            let orders: Vec<String> = report.applied.iter().map(u32::to_string).collect();
            println!(
                "  ✓ {} - {} {verb} after {}: {}",
                report.database,
                report.applied.len(),
                report.last_applied,
                orders.join(", ")
            );
        }
    }

    println!();
    println!(
        "{} database(s), {} migration(s) {verb}",
        summary.databases.len(),
        summary.total_applied()
    );
}
