//! Discover and moc command implementations.

use crate::cli::{DiscoverArgs, FilterArgs, MocArgs};
use crate::config::SeedlingConfig;
use crate::error::Result;
use crate::output::Formatter;
use seedling_discovery::{CenterDiscoveryCoordinator, DiscoveryOptions, DiscoveryOutcome};
use seedling_domain::{InMemoryVault, NoteId};
use seedling_orchestrator::AiOrchestrator;
use std::sync::Arc;

/// Coordinator over a loaded note export.
pub type VaultCoordinator = CenterDiscoveryCoordinator<InMemoryVault, InMemoryVault>;

/// Build a coordinator backed by the configured provider.
pub fn build_coordinator(vault: InMemoryVault, config: &SeedlingConfig) -> Result<VaultCoordinator> {
    let orchestrator = AiOrchestrator::from_config(
        &config.provider,
        config.orchestrator.clone(),
        config.provider.api_key_from_env(),
    )?;
    let vault = Arc::new(vault);
    Ok(CenterDiscoveryCoordinator::new(
        vault.clone(),
        vault,
        Arc::new(orchestrator),
        config.discovery.clone(),
    ))
}

/// Execute the discover command.
pub async fn execute_discover(
    args: DiscoverArgs,
    coordinator: &VaultCoordinator,
    formatter: &Formatter,
) -> Result<()> {
    let ids: Vec<NoteId> = args.ids.into_iter().map(NoteId::from).collect();
    let outcome = coordinator
        .discover_from_seeds(&ids, &options(&args.filter))
        .await?;
    print_outcome(&outcome, &args.filter, coordinator, formatter)
}

/// Execute the moc command.
pub async fn execute_moc(args: MocArgs, coordinator: &VaultCoordinator, formatter: &Formatter) -> Result<()> {
    let outcome = coordinator
        .discover_from_moc(&NoteId::from(args.id), &options(&args.filter))
        .await?;
    print_outcome(&outcome, &args.filter, coordinator, formatter)
}

/// Discovery options from command-line filters.
pub fn options(filter: &FilterArgs) -> DiscoveryOptions {
    let options = DiscoveryOptions::default().with_tags(filter.tags.clone(), filter.tag_mode());
    if filter.no_hints {
        options.with_relationship_hints(false)
    } else {
        options
    }
}

fn print_outcome(
    outcome: &DiscoveryOutcome,
    filter: &FilterArgs,
    coordinator: &VaultCoordinator,
    formatter: &Formatter,
) -> Result<()> {
    println!("{}", formatter.format_outcome(outcome)?);
    if filter.stats {
        eprintln!("\n{}", coordinator.orchestrator().metrics().summary());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use seedling_domain::TagFilterMode;

    #[test]
    fn test_options_from_filter() {
        let filter = FilterArgs {
            tags: vec!["home".into()],
            match_all: true,
            no_hints: true,
            stats: false,
        };
        let options = options(&filter);
        assert_eq!(options.tags, vec!["home"]);
        assert_eq!(options.tag_mode, TagFilterMode::All);
        assert_eq!(options.relationship_hints, Some(false));
    }

    #[test]
    fn test_hints_follow_config_by_default() {
        let filter = FilterArgs {
            tags: Vec::new(),
            match_all: false,
            no_hints: false,
            stats: false,
        };
        assert_eq!(options(&filter).relationship_hints, None);
    }
}
