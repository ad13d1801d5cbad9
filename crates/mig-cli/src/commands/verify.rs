//! Verify command implementation

use anyhow::Result;
use mig_db::RunMode;

use crate::cli::{GlobalArgs, VerifyArgs};
use crate::commands::migrate;

/// Execute the verify command
pub(crate) fn execute(args: &VerifyArgs, global: &GlobalArgs) -> Result<()> {
    migrate::run(global, args.databases.as_deref(), RunMode::VerifyOnly)
}
