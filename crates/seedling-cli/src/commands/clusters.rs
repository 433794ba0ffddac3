//! Clusters command implementation.

use crate::cli::ClustersArgs;
use crate::config::SeedlingConfig;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use seedling_domain::InMemoryVault;
use seedling_graph::ClusterFinder;
use tracing::debug;

/// Execute the clusters command.
pub fn execute_clusters(
    args: ClustersArgs,
    vault: &InMemoryVault,
    config: &SeedlingConfig,
    formatter: &Formatter,
) -> Result<()> {
    println!("{}", render_clusters(&args, vault, config, formatter)?);
    Ok(())
}

/// Find and render clusters.
pub fn render_clusters(
    args: &ClustersArgs,
    vault: &InMemoryVault,
    config: &SeedlingConfig,
    formatter: &Formatter,
) -> Result<String> {
    let threshold = args.threshold.unwrap_or(config.discovery.cluster_threshold);
    if !(0.0..=1.0).contains(&threshold) {
        return Err(CliError::InvalidInput(
            "Threshold must be between 0.0 and 1.0".to_string(),
        ));
    }

    let clusters = ClusterFinder::new(args.max_edges).find_clusters(vault.notes(), threshold);
    debug!("Found {} clusters at threshold {}", clusters.len(), threshold);
    formatter.format_clusters(&clusters)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use seedling_domain::Note;

    fn vault() -> InMemoryVault {
        let mut vault = InMemoryVault::new(vec![
            Note::new("a.md", "").with_links(["b"]),
            Note::new("b.md", "").with_links(["a"]),
            Note::new("c.md", ""),
        ]);
        vault.compute_backlinks();
        vault
    }

    #[test]
    fn test_linked_pair_forms_cluster() {
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let args = ClustersArgs { threshold: None, max_edges: 10 };
        let output = render_clusters(&args, &vault(), &SeedlingConfig::default(), &formatter).unwrap();
        assert_eq!(output, "a.md b.md");
    }

    #[test]
    fn test_threshold_out_of_range() {
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let args = ClustersArgs { threshold: Some(1.5), max_edges: 10 };
        let err = render_clusters(&args, &vault(), &SeedlingConfig::default(), &formatter).unwrap_err();
        assert!(matches!(err, CliError::InvalidInput(_)));
    }
}
