//! Loading a host note export.

use crate::error::{CliError, Result};
use seedling_domain::{InMemoryVault, Note};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Load a JSON array of notes into a vault.
///
/// Backlinks are computed from outgoing links unless the export already
/// carries them.
pub fn load_vault(path: &Path) -> Result<InMemoryVault> {
    let contents = fs::read_to_string(path).map_err(|e| {
        CliError::InvalidInput(format!("cannot read notes file {}: {}", path.display(), e))
    })?;
    let vault = parse_vault(&contents)?;
    info!("Loaded {} notes from {}", vault.len(), path.display());
    Ok(vault)
}

/// Parse a JSON array of notes into a vault.
pub fn parse_vault(json: &str) -> Result<InMemoryVault> {
    let notes: Vec<Note> = serde_json::from_str(json)?;
    let has_backlinks = notes.iter().any(|n| !n.backlinks.is_empty());

    let mut vault = InMemoryVault::new(notes);
    if !has_backlinks {
        debug!("Export has no backlinks, computing them from links");
        vault.compute_backlinks();
    }
    Ok(vault)
}
