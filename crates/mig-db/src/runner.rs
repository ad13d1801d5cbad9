//! Multi-database orchestration.
//!
//! A run has two phases. Planning loads and validates the scripts of every
//! database before any connection is opened, so directory and file name
//! problems surface first. Execution then migrates databases one at a time
//! and stops at the first failure; later databases are left untouched.

use crate::apply::apply_batch;
use crate::connection::{ConnectionParams, MigrationDb};
use crate::error::MigrateResult;
use crate::history::{ensure_history_table, history_table_exists, load_history};
use crate::lock;
use mig_core::{
    discover_targets, find_drift, is_consistent, last_applied, select_targets, verify,
    DatabaseName, DatabaseTarget, Drift, MigrationHistoryEntry, MigrationScript, ScriptLoader,
};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// What a run does once a database verifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    /// Apply outstanding scripts.
    #[default]
    Apply,
    /// Stop after verification; nothing is executed or recorded.
    VerifyOnly,
}

/// Options for [`Runner::run`].
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub mode: RunMode,
    /// Restrict the run to these databases (empty means all).
    pub databases: Vec<String>,
}

/// A database together with its validated scripts.
#[derive(Debug, Clone)]
pub struct PlannedDatabase {
    pub target: DatabaseTarget,
    pub scripts: Vec<MigrationScript>,
}

/// Outcome for one database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatabaseReport {
    pub database: DatabaseName,
    /// Last applied order before this run.
    pub last_applied: u32,
    /// Orders applied, or that would be applied in verify-only mode.
    pub applied: Vec<u32>,
}

/// Outcome of a whole run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub mode: RunMode,
    pub databases: Vec<DatabaseReport>,
}

impl RunSummary {
    pub fn total_applied(&self) -> usize {
        self.databases.iter().map(|d| d.applied.len()).sum()
    }
}

/// Read-only view of one database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatabaseStatus {
    pub database: DatabaseName,
    /// False when the database file has not been created yet.
    pub exists: bool,
    pub last_applied: u32,
    pub applied_count: usize,
    pub outstanding: Vec<u32>,
    pub consistent: bool,
    pub drift: Vec<Drift>,
}

/// Drives script loading, verification, and apply for every database.
pub struct Runner {
    scripts_root: PathBuf,
    params: ConnectionParams,
    loader: ScriptLoader,
}

impl Runner {
    pub fn new(scripts_root: impl Into<PathBuf>, params: ConnectionParams) -> Self {
        Self {
            scripts_root: scripts_root.into(),
            params,
            loader: ScriptLoader::new(),
        }
    }

    pub fn scripts_root(&self) -> &Path {
        &self.scripts_root
    }

    /// Discover databases and load all their scripts.
    ///
    /// Touches only the filesystem.
    pub fn plan(&self, databases: &[String]) -> MigrateResult<Vec<PlannedDatabase>> {
        let targets = discover_targets(&self.scripts_root)?;
        let targets = select_targets(targets, databases, &self.scripts_root)?;

        let mut planned = Vec::with_capacity(targets.len());
        for target in targets {
            let scripts = self.loader.load(&target.directory)?;
            log::debug!(
                "Database '{}': {} scripts in {}",
                target.name,
                scripts.len(),
                target.directory.display()
            );
            planned.push(PlannedDatabase { target, scripts });
        }
        Ok(planned)
    }

    /// Migrate (or verify) every selected database, stopping at the first failure.
    pub fn run(&self, options: &RunOptions) -> MigrateResult<RunSummary> {
        let planned = self.plan(&options.databases)?;

        let mut reports = Vec::with_capacity(planned.len());
        for database in &planned {
            match self.migrate_database(database, options.mode) {
                Ok(report) => reports.push(report),
                Err(e) => {
                    log::error!(
                        "Stopping run at database '{}'; {} remaining database(s) not attempted",
                        database.target.name,
                        planned.len() - reports.len() - 1
                    );
                    return Err(e);
                }
            }
        }

        Ok(RunSummary {
            mode: options.mode,
            databases: reports,
        })
    }

    /// Ensure history, then lock, verify, and apply in one transaction.
    fn migrate_database(
        &self,
        planned: &PlannedDatabase,
        mode: RunMode,
    ) -> MigrateResult<DatabaseReport> {
        let name = &planned.target.name;
        let db = MigrationDb::open(name, &self.params)?;
        ensure_history_table(db.conn(), name)?;

        let body = |conn: &duckdb::Connection| -> MigrateResult<DatabaseReport> {
            lock::acquire(conn, name)?;
            let history = load_history(conn, name)?;
            let last = verify(name, &planned.target.directory, &planned.scripts, &history)?;

            let outstanding = outstanding_after(&planned.scripts, last);
            if outstanding.is_empty() {
                log::info!("Database '{name}' is up to date (last applied {last})");
            } else if mode == RunMode::Apply {
                log::info!(
                    "Database '{name}': applying {} migration(s) after {last}",
                    outstanding.len()
                );
                apply_batch(conn, name, outstanding)?;
            } else {
                log::info!(
                    "Database '{name}': {} migration(s) pending after {last}",
                    outstanding.len()
                );
            }

            Ok(DatabaseReport {
                database: name.clone(),
                last_applied: last,
                applied: outstanding.iter().map(|s| s.order()).collect(),
            })
        };

        match mode {
            RunMode::Apply => db.transaction(body),
            RunMode::VerifyOnly => db.dry_run(body),
        }
    }

    /// Report the state of every selected database without changing anything.
    ///
    /// Drift is reported, not raised; directory problems are still errors.
    pub fn status(&self, databases: &[String]) -> MigrateResult<Vec<DatabaseStatus>> {
        let planned = self.plan(databases)?;

        let mut statuses = Vec::with_capacity(planned.len());
        for database in &planned {
            let name = &database.target.name;
            let (exists, history) = match MigrationDb::open_read_only(name, &self.params)? {
                Some(db) => (true, read_history_if_present(&db)?),
                None => (false, Vec::new()),
            };

            let last = last_applied(&history);
            statuses.push(DatabaseStatus {
                database: name.clone(),
                exists,
                last_applied: last,
                applied_count: history.len(),
                outstanding: outstanding_after(&database.scripts, last)
                    .iter()
                    .map(|s| s.order())
                    .collect(),
                consistent: is_consistent(&database.scripts, &history, last),
                drift: find_drift(&database.scripts, &history, last),
            });
        }
        Ok(statuses)
    }
}

fn read_history_if_present(db: &MigrationDb) -> MigrateResult<Vec<MigrationHistoryEntry>> {
    if history_table_exists(db.conn(), db.name())? {
        load_history(db.conn(), db.name())
    } else {
        Ok(Vec::new())
    }
}

/// Scripts above `last_applied`; `scripts` must be sorted ascending.
fn outstanding_after(scripts: &[MigrationScript], last_applied: u32) -> &[MigrationScript] {
    let start = scripts.partition_point(|s| s.order() <= last_applied);
    &scripts[start..]
}

#[cfg(test)]
#[path = "runner_test.rs"]
mod tests;
