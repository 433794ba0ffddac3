//! Seedling CLI - find the recurring themes across your notes.

use anyhow::Context;
use clap::Parser;
use seedling_cli::commands;
use seedling_cli::notes::load_vault;
use seedling_cli::{Cli, CliError, Command, Formatter, SeedlingConfig};
use seedling_domain::InMemoryVault;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config_path = match cli.config {
        Some(path) => path,
        None => SeedlingConfig::default_path()?,
    };
    let config = SeedlingConfig::load_from(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;

    let format = cli.format.map(Into::into).unwrap_or(config.settings.format);
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(format, color_enabled);

    let notes = cli.notes;
    match cli.command {
        Command::Config(args) => commands::execute_config(args, &config, &config_path, &formatter)?,
        Command::Discover(args) => {
            let coordinator = commands::build_coordinator(open_notes(notes)?, &config)?;
            commands::execute_discover(args, &coordinator, &formatter).await?;
        }
        Command::Moc(args) => {
            let coordinator = commands::build_coordinator(open_notes(notes)?, &config)?;
            commands::execute_moc(args, &coordinator, &formatter).await?;
        }
        Command::Tags(args) => commands::execute_tags(args, &open_notes(notes)?, &formatter)?,
        Command::Clusters(args) => {
            commands::execute_clusters(args, &open_notes(notes)?, &config, &formatter)?
        }
    }

    Ok(())
}

fn open_notes(path: Option<PathBuf>) -> seedling_cli::Result<InMemoryVault> {
    let path = path.ok_or_else(|| {
        CliError::InvalidInput("no notes file given (use --notes or SEEDLING_NOTES)".to_string())
    })?;
    load_vault(&path)
}
