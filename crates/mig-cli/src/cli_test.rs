use super::*;
use clap::CommandFactory;

#[test]
fn verify_cli_args() {
    // Validates the entire command tree: short flag conflicts,
    // duplicate args, and other clap definition errors.
    Cli::command().debug_assert();
}

#[test]
fn parses_migrate_with_filter_and_dry_run() {
    let cli = Cli::try_parse_from([
        "migrator",
        "--scripts-dir",
        "db/scripts",
        "migrate",
        "--databases",
        "app,audit",
        "--dry-run",
    ])
    .unwrap();

    assert_eq!(cli.global.scripts_dir.as_deref(), Some("db/scripts"));
    match cli.command {
        Commands::Migrate(args) => {
            assert_eq!(args.databases.as_deref(), Some("app,audit"));
            assert!(args.dry_run);
        }
        other => panic!("expected migrate, got {other:?}"),
    }
}

#[test]
fn status_output_defaults_to_table() {
    let cli = Cli::try_parse_from(["migrator", "status", "-v"]).unwrap();
    assert!(cli.global.verbose);
    match cli.command {
        Commands::Status(args) => assert_eq!(args.output, StatusOutput::Table),
        other => panic!("expected status, got {other:?}"),
    }

    let cli = Cli::try_parse_from(["migrator", "status", "--output", "json"]).unwrap();
    match cli.command {
        Commands::Status(args) => assert_eq!(args.output, StatusOutput::Json),
        other => panic!("expected status, got {other:?}"),
    }
}
