use super::*;

#[test]
fn parses_db_ping_command() {
    let cli = Cli::try_parse_from(["competeaware-cli", "db", "ping"])
        .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Ping
        })
    ));
}

#[test]
fn parses_db_migrate_command() {
    let cli = Cli::try_parse_from(["competeaware-cli", "db", "migrate"])
        .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Migrate
        })
    ));
}

#[test]
fn parses_db_seed_command() {
    let cli = Cli::try_parse_from(["competeaware-cli", "db", "seed"])
        .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Seed
        })
    ));
}

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["competeaware-cli"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn scrape_defaults_to_live_run() {
    let cli = Cli::try_parse_from(["competeaware-cli", "scrape"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Scrape { dry_run: false })
    ));
}

#[test]
fn scrape_accepts_dry_run() {
    let cli = Cli::try_parse_from(["competeaware-cli", "scrape", "--dry-run"]).unwrap();
    assert!(matches!(cli.command, Some(Commands::Scrape { dry_run: true })));
}

#[test]
fn parses_categorize_command() {
    let cli = Cli::try_parse_from(["competeaware-cli", "categorize"]).unwrap();
    assert!(matches!(cli.command, Some(Commands::Categorize)));
}

#[test]
fn parses_classifier_train() {
    let cli = Cli::try_parse_from(["competeaware-cli", "classifier", "train"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Classifier {
            command: ClassifierCommands::Train
        })
    ));
}

#[test]
fn parses_classifier_predict_text() {
    let cli = Cli::try_parse_from([
        "competeaware-cli",
        "classifier",
        "predict",
        "New partnership announced",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Classifier {
            command: ClassifierCommands::Predict { ref text }
        }) if text == "New partnership announced"
    ));
}

#[test]
fn classifier_predict_requires_text() {
    assert!(Cli::try_parse_from(["competeaware-cli", "classifier", "predict"]).is_err());
}

#[test]
fn unknown_subcommand_is_rejected() {
    assert!(Cli::try_parse_from(["competeaware-cli", "report"]).is_err());
}
