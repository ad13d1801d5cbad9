//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Migrator - verify and apply versioned SQL migrations
#[derive(Parser, Debug)]
#[command(name = "migrator")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file path (default: migrator.yml in the current directory, if present)
    #[arg(short, long, global = true, env = "MIGRATOR_CONFIG")]
    pub config: Option<String>,

    /// Root directory with one script subdirectory per database
    #[arg(short, long, global = true, env = "MIGRATOR_SCRIPTS_DIR")]
    pub scripts_dir: Option<String>,

    /// Directory holding the database files
    #[arg(short, long, global = true, env = "MIGRATOR_DATA_DIR")]
    pub data_dir: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Verify history and apply outstanding migrations
    Migrate(MigrateArgs),

    /// Verify history without applying anything
    Verify(VerifyArgs),

    /// Show applied and outstanding migrations per database
    Status(StatusArgs),
}

/// Arguments for the migrate command
#[derive(Args, Debug)]
pub struct MigrateArgs {
    /// Database names to migrate (comma-separated, default: all)
    #[arg(short = 'D', long)]
    pub databases: Option<String>,

    /// Verify and report pending migrations without applying them
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the verify command
#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Database names to verify (comma-separated, default: all)
    #[arg(short = 'D', long)]
    pub databases: Option<String>,
}

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Database names to inspect (comma-separated, default: all)
    #[arg(short = 'D', long)]
    pub databases: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: StatusOutput,
}

/// Status output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusOutput {
    /// Table format
    Table,
    /// JSON output
    Json,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
