//! Config command implementation.

use crate::cli::{ConfigAction, ConfigArgs};
use crate::config::SeedlingConfig;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use std::path::Path;

/// Execute the config command.
pub fn execute_config(
    args: ConfigArgs,
    config: &SeedlingConfig,
    path: &Path,
    formatter: &Formatter,
) -> Result<()> {
    match args.action {
        ConfigAction::Show => {
            let rendered = toml::to_string_pretty(config)
                .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))?;
            println!("{}", rendered);
        }
        ConfigAction::Path => println!("{}", path.display()),
        ConfigAction::Init { force } => {
            let message = init_config(path, force)?;
            println!("{}", formatter.success(&message));
        }
    }
    Ok(())
}

/// Write a default configuration file.
fn init_config(path: &Path, force: bool) -> Result<String> {
    if path.exists() && !force {
        return Err(CliError::Config(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }
    SeedlingConfig::default().save_to(path)?;
    Ok(format!("Wrote default configuration to {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        init_config(&path, false).unwrap();
        assert!(path.exists());
        assert!(init_config(&path, false).is_err());
        assert!(init_config(&path, true).is_ok());

        let loaded = SeedlingConfig::load_from(&path).unwrap();
        assert_eq!(loaded.discovery.moc_min_notes, 5);
    }
}
