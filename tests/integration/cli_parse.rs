use clap::{CommandFactory, Parser};
use pagewise::tooling::cli::{Cli, Commands, ConfigCommands};

#[test]
fn parse_valid_command_matrix() {
    let cases: Vec<Vec<&str>> = vec![
        vec!["pagewise", "list", "expenses"],
        vec!["pagewise", "list", "support/messages", "--role", "agent", "--identity", "a-1"],
        vec!["pagewise", "list", "todos", "--search", "milk", "--pages", "2", "--format", "json"],
        vec![
            "pagewise",
            "list",
            "expenses",
            "--start-date",
            "2024-01-01",
            "--end-date",
            "2024-01-31",
            "--filter",
            "category=travel",
            "--filter",
            "status=approved",
        ],
        vec!["pagewise", "config", "show"],
        vec!["pagewise", "config", "show", "--format", "json"],
        vec!["pagewise", "--log-level", "debug", "config", "show"],
        vec!["pagewise", "list", "todos", "--log-format", "json", "--log-output", "stdout"],
    ];

    for args in cases {
        let parsed = Cli::try_parse_from(args.clone());
        assert!(parsed.is_ok(), "expected valid parse for args: {args:?}");
    }
}

#[test]
fn parse_rejects_invalid_input() {
    let cases: Vec<Vec<&str>> = vec![
        vec!["pagewise"],
        vec!["pagewise", "list"],
        vec!["pagewise", "list", "todos", "--pages", "many"],
        vec!["pagewise", "list", "todos", "--role", "superuser"],
        vec!["pagewise", "config"],
    ];

    for args in cases {
        assert!(
            Cli::try_parse_from(args.clone()).is_err(),
            "expected parse failure for args: {args:?}"
        );
    }
}

#[test]
fn repeated_filters_are_collected() {
    let cli = Cli::parse_from([
        "pagewise", "list", "expenses", "--filter", "a=1", "--filter", "b=2",
    ]);
    match cli.command {
        Commands::List { filters, .. } => assert_eq!(filters, vec!["a=1", "b=2"]),
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn global_flags_after_subcommand() {
    let cli = Cli::parse_from(["pagewise", "config", "show", "--config", "/tmp/pagewise.toml"]);
    assert_eq!(
        cli.config.as_deref(),
        Some(std::path::Path::new("/tmp/pagewise.toml"))
    );
    assert!(matches!(
        cli.command,
        Commands::Config {
            command: ConfigCommands::Show { .. }
        }
    ));
}

#[test]
fn help_lists_commands() {
    let help = Cli::command().render_help().to_string();
    assert!(help.contains("list"));
    assert!(help.contains("config"));
}
