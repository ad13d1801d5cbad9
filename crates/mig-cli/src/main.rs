//! Migrator CLI - verify and apply versioned SQL migrations

use clap::Parser;

mod cli;
mod commands;

use cli::Cli;
use commands::{common, migrate, status, verify};

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    init_logging(cli.global.verbose);

    let result = match &cli.command {
        cli::Commands::Migrate(args) => migrate::execute(args, &cli.global),
        cli::Commands::Verify(args) => verify::execute(args, &cli.global),
        cli::Commands::Status(args) => status::execute(args, &cli.global),
    };

    match result {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(err) => {
            let code = common::exit_code_for(&err);
            if err.downcast_ref::<common::ExitCode>().is_none() {
                eprintln!("Error: {err:#}");
            }
            std::process::ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}
