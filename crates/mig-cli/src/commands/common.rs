//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use mig_core::{Config, CoreError};
use mig_db::{ConnectionParams, ErrorKind, MigrateError, Runner};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::cli::GlobalArgs;

/// Exit with a specific code without printing an error message.
///
/// Use `return Err(ExitCode(N).into())` instead of `std::process::exit(N)`
/// so that RAII destructors run and cleanup happens properly.
#[derive(Debug)]
pub(crate) struct ExitCode(pub(crate) i32);

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "")
    }
}

impl std::error::Error for ExitCode {}

/// Exit code for a failure category.
pub(crate) fn exit_code_for_kind(kind: ErrorKind) -> i32 {
    match kind {
        ErrorKind::Configuration => 2,
        ErrorKind::Consistency => 3,
        ErrorKind::Execution => 4,
        ErrorKind::Connectivity => 5,
    }
}

/// Map a command error to a process exit code.
pub(crate) fn exit_code_for(err: &anyhow::Error) -> i32 {
    if let Some(ExitCode(code)) = err.downcast_ref::<ExitCode>() {
        return *code;
    }
    if let Some(e) = err.downcast_ref::<MigrateError>() {
        return exit_code_for_kind(e.kind());
    }
    if err.downcast_ref::<CoreError>().is_some() {
        return exit_code_for_kind(ErrorKind::Configuration);
    }
    1
}

/// Resolved locations and database filter for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Settings {
    pub scripts_root: PathBuf,
    pub data_dir: PathBuf,
    pub databases: Vec<String>,
}

impl Settings {
    /// Resolve settings from the config file and command line.
    ///
    /// Paths in the config file are relative to the file's directory; paths
    /// given on the command line are used as-is.
    pub(crate) fn resolve(global: &GlobalArgs, databases: Option<&str>) -> Result<Self> {
        let (config, base) = match &global.config {
            Some(path) => {
                let path = Path::new(path);
                let config = Config::load(path)
                    .with_context(|| format!("Failed to load config {}", path.display()))?;
                let base = match path.parent() {
                    Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
                    _ => PathBuf::from("."),
                };
                (config, base)
            }
            None => {
                let cwd = std::env::current_dir().context("Failed to get current directory")?;
                let config = Config::load_from_dir(&cwd).context("Failed to load config")?;
                (config, cwd)
            }
        };

        let scripts_root = match &global.scripts_dir {
            Some(dir) => PathBuf::from(dir),
            None => config.scripts_dir_absolute(&base),
        };
        let data_dir = match &global.data_dir {
            Some(dir) => PathBuf::from(dir),
            None => config.data_dir_absolute(&base),
        };
        let databases = match databases {
            Some(list) => parse_database_list(list),
            None => config.databases,
        };

        log::debug!(
            "Scripts root: {}, data directory: {}",
            scripts_root.display(),
            data_dir.display()
        );

        Ok(Self {
            scripts_root,
            data_dir,
            databases,
        })
    }

    pub(crate) fn runner(&self) -> Runner {
        Runner::new(
            self.scripts_root.clone(),
            ConnectionParams::new(self.data_dir.clone()),
        )
    }
}

/// Split a comma-separated database list, dropping blanks and repeats.
pub(crate) fn parse_database_list(list: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for name in list.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}

/// Attach the failing database to a run error, keeping the original for
/// exit code mapping.
pub(crate) fn run_error(err: MigrateError) -> anyhow::Error {
    match err.database().map(ToString::to_string) {
        Some(database) => anyhow::Error::new(err)
            .context(format!("Migration run stopped at database '{database}'")),
        None => anyhow::Error::new(err),
    }
}

#[cfg(test)]
#[path = "common_test.rs"]
mod tests;
