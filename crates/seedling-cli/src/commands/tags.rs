//! Tags command implementation.

use crate::cli::{TagsAction, TagsArgs};
use crate::error::Result;
use crate::output::Formatter;
use seedling_domain::{normalize_tag, InMemoryVault};
use seedling_graph::TagCoOccurrenceIndex;

/// Execute the tags command.
pub fn execute_tags(args: TagsArgs, vault: &InMemoryVault, formatter: &Formatter) -> Result<()> {
    println!("{}", render_tags(args.action, vault, formatter)?);
    Ok(())
}

/// Render one tag action over the vault.
pub fn render_tags(action: TagsAction, vault: &InMemoryVault, formatter: &Formatter) -> Result<String> {
    let index = TagCoOccurrenceIndex::build(vault.notes());

    match action {
        TagsAction::Frequency { prefix, limit } => {
            let mut stats = match prefix {
                Some(prefix) => index.search_tags(&prefix),
                None => index.tags_by_frequency(),
            };
            stats.truncate(limit);
            formatter.format_tag_stats(&stats)
        }
        TagsAction::Related { tag, limit } => {
            let tag = normalize_tag(&tag);
            formatter.format_related(&tag, &index.related_tags(&tag, limit))
        }
        TagsAction::Combinations { min, limit } => {
            formatter.format_combinations(&index.suggested_combinations(min, limit))
        }
    }
}
