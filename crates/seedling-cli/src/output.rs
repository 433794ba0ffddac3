//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::{Color, Colorize};
use seedling_discovery::DiscoveryOutcome;
use seedling_domain::{CenterStrength, Cluster, TagCombination, TagCount, TagStats};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format a discovery result.
    pub fn format_outcome(&self, outcome: &DiscoveryOutcome) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(outcome)?),
            OutputFormat::Quiet => Ok(outcome
                .centers
                .iter()
                .map(|c| c.name.clone())
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => Ok(self.format_outcome_table(outcome)),
        }
    }

    fn format_outcome_table(&self, outcome: &DiscoveryOutcome) -> String {
        let mut lines = vec![self.info(&format!(
            "{} center(s) from {}",
            outcome.centers.len(),
            outcome.source
        ))];
        if outcome.skipped_notes > 0 {
            lines.push(self.warning(&format!(
                "{} note(s) could not be read and were skipped",
                outcome.skipped_notes
            )));
        }

        if outcome.centers.is_empty() {
            lines.push(self.colorize("No centers found.", Color::Yellow));
            return lines.join("\n");
        }

        let mut builder = Builder::default();
        builder.push_record(["#", "Center", "Strength", "Confidence", "Notes"]);
        for (i, center) in outcome.centers.iter().enumerate() {
            builder.push_record([
                (i + 1).to_string(),
                center.name.clone(),
                self.strength(center.strength),
                format!("{:.2}", center.confidence),
                center.connected_notes.len().to_string(),
            ]);
        }
        lines.push(self.table(builder));

        for center in &outcome.centers {
            lines.push(String::new());
            lines.push(self.colorize(&center.name, Color::Cyan));
            if !center.explanation.is_empty() {
                lines.push(format!("  {}", center.explanation));
            }
            for note in &center.connected_notes {
                lines.push(format!("  - {}", note));
            }
            if let Some(recommendation) = &center.recommendation {
                lines.push(self.success(&format!("Start here: {}", recommendation)));
            }
        }

        lines.push(String::new());
        if let Some(coverage) = outcome.coverage {
            lines.push(format!("Coverage: {}% of {} notes", coverage, outcome.note_count));
        }
        lines.push(format!(
            "Estimated cost: ${:.4} ({} input / {} output tokens)",
            outcome.cost.cost_usd, outcome.cost.input_tokens, outcome.cost.output_tokens
        ));
        lines.join("\n")
    }

    /// Format tag frequency rows.
    pub fn format_tag_stats(&self, stats: &[&TagStats]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(stats)?),
            OutputFormat::Quiet => Ok(stats.iter().map(|s| s.tag.clone()).collect::<Vec<_>>().join("\n")),
            OutputFormat::Table => {
                if stats.is_empty() {
                    return Ok(self.colorize("No tags found.", Color::Yellow));
                }
                let mut builder = Builder::default();
                builder.push_record(["Tag", "Notes", "Seen with"]);
                for s in stats {
                    let partners: Vec<&str> = s.co_occurrences.iter().take(3).map(|c| c.tag.as_str()).collect();
                    builder.push_record([s.tag.clone(), s.count.to_string(), partners.join(", ")]);
                }
                Ok(self.table(builder))
            }
        }
    }

    /// Format tags related to `tag`.
    pub fn format_related(&self, tag: &str, related: &[TagCount]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(related)?),
            OutputFormat::Quiet => Ok(related.iter().map(|r| r.tag.clone()).collect::<Vec<_>>().join("\n")),
            OutputFormat::Table => {
                if related.is_empty() {
                    return Ok(self.colorize(&format!("No tags seen with '{}'.", tag), Color::Yellow));
                }
                let mut builder = Builder::default();
                builder.push_record(["Tag", "Together"]);
                for r in related {
                    builder.push_record([r.tag.clone(), r.count.to_string()]);
                }
                Ok(self.table(builder))
            }
        }
    }

    /// Format suggested tag pairs.
    pub fn format_combinations(&self, combinations: &[TagCombination]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(combinations)?),
            OutputFormat::Quiet => Ok(combinations
                .iter()
                .map(|c| format!("{} {}", c.tags.0, c.tags.1))
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                if combinations.is_empty() {
                    return Ok(self.colorize("No tag combinations found.", Color::Yellow));
                }
                let mut builder = Builder::default();
                builder.push_record(["Tags", "Together", "Combined"]);
                for c in combinations {
                    builder.push_record([
                        format!("{} + {}", c.tags.0, c.tags.1),
                        c.co_occurrence.to_string(),
                        c.combined_frequency.to_string(),
                    ]);
                }
                Ok(self.table(builder))
            }
        }
    }

    /// Format clusters.
    pub fn format_clusters(&self, clusters: &[Cluster]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(clusters)?),
            OutputFormat::Quiet => Ok(clusters
                .iter()
                .map(|c| c.notes.iter().map(|n| n.as_str()).collect::<Vec<_>>().join(" "))
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                if clusters.is_empty() {
                    return Ok(self.colorize("No clusters found.", Color::Yellow));
                }
                let mut lines = Vec::new();
                for (i, cluster) in clusters.iter().enumerate() {
                    lines.push(self.colorize(
                        &format!("Cluster {} ({} notes)", i + 1, cluster.len()),
                        Color::Cyan,
                    ));
                    lines.extend(cluster.notes.iter().map(|n| format!("  - {}", n)));
                }
                Ok(lines.join("\n"))
            }
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), Color::Green)
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), Color::Blue)
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), Color::Yellow)
    }

    fn strength(&self, strength: CenterStrength) -> String {
        let color = match strength {
            CenterStrength::Strong => Color::Green,
            CenterStrength::Medium => Color::Yellow,
            CenterStrength::Weak => Color::White,
        };
        self.colorize(strength.as_str(), color)
    }

    fn table(&self, builder: Builder) -> String {
        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: Color) -> String {
        if !self.color_enabled {
            return text.to_string();
        }
        text.color(color).to_string()
    }
}
