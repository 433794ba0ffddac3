//! CLI command definitions and argument parsing.

use crate::config::OutputFormat;
use clap::{Args, Parser, Subcommand};
use seedling_domain::TagFilterMode;
use std::path::PathBuf;

/// Seedling - find the recurring themes across your notes.
#[derive(Debug, Parser)]
#[command(name = "seedling")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// JSON export of notes (an array of note objects)
    #[arg(short, long, global = true, env = "SEEDLING_NOTES")]
    pub notes: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path (default: ~/.seedling/config.toml)
    #[arg(short, long, global = true, env = "SEEDLING_CONFIG")]
    pub config: Option<PathBuf>,

    /// Debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Text and tables (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (names only)
    Quiet,
}

impl From<CliFormat> for OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => OutputFormat::Table,
            CliFormat::Json => OutputFormat::Json,
            CliFormat::Quiet => OutputFormat::Quiet,
        }
    }
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Discover centers across hand-picked notes
    Discover(DiscoverArgs),

    /// Discover centers across the notes a map of content links to
    Moc(MocArgs),

    /// Explore tag statistics
    Tags(TagsArgs),

    /// Group strongly connected notes
    Clusters(ClustersArgs),

    /// Show or initialize the configuration file
    Config(ConfigArgs),
}

/// Options shared by both discovery commands.
#[derive(Debug, Clone, Args)]
pub struct FilterArgs {
    /// Keep only notes with these tags (repeatable)
    #[arg(short, long = "tag")]
    pub tags: Vec<String>,

    /// Require every tag instead of any
    #[arg(long)]
    pub match_all: bool,

    /// Do not send link and shared-tag hints
    #[arg(long)]
    pub no_hints: bool,

    /// Print orchestrator metrics after the result
    #[arg(long)]
    pub stats: bool,
}

impl FilterArgs {
    /// Tag combination mode
    pub fn tag_mode(&self) -> TagFilterMode {
        if self.match_all {
            TagFilterMode::All
        } else {
            TagFilterMode::Any
        }
    }
}

/// Arguments for the discover command.
#[derive(Debug, Parser)]
pub struct DiscoverArgs {
    /// Note ids (paths) to analyze; at least two
    #[arg(required = true, num_args = 1..)]
    pub ids: Vec<String>,

    #[command(flatten)]
    pub filter: FilterArgs,
}

/// Arguments for the moc command.
#[derive(Debug, Parser)]
pub struct MocArgs {
    /// Id (path) of the map-of-content note
    pub id: String,

    #[command(flatten)]
    pub filter: FilterArgs,
}

/// Arguments for the tags command.
#[derive(Debug, Parser)]
pub struct TagsArgs {
    #[command(subcommand)]
    pub action: TagsAction,
}

/// Tag exploration actions.
#[derive(Debug, Subcommand)]
pub enum TagsAction {
    /// Tags by how many notes carry them
    Frequency {
        /// Only tags starting with this prefix
        #[arg(short, long)]
        prefix: Option<String>,

        /// Maximum rows
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Tags most often seen alongside a tag
    Related {
        /// Tag to look up
        tag: String,

        /// Maximum rows
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },

    /// Tag pairs that frequently appear together
    Combinations {
        /// Minimum notes carrying both tags
        #[arg(short, long, default_value = "2")]
        min: usize,

        /// Maximum rows
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },
}

/// Arguments for the clusters command.
#[derive(Debug, Parser)]
pub struct ClustersArgs {
    /// Minimum edge strength (default: discovery.cluster_threshold)
    #[arg(short, long)]
    pub threshold: Option<f64>,

    /// Strongest edges considered per note
    #[arg(long, default_value = "10")]
    pub max_edges: usize,
}

/// Arguments for the config command.
#[derive(Debug, Parser)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,

    /// Write a configuration file with defaults
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the configuration file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_discover() {
        let cli = Cli::try_parse_from([
            "seedling", "--notes", "notes.json", "discover", "a.md", "b.md", "--tag", "home",
            "--match-all",
        ])
        .unwrap();

        assert_eq!(cli.notes, Some(PathBuf::from("notes.json")));
        match cli.command {
            Command::Discover(args) => {
                assert_eq!(args.ids, vec!["a.md", "b.md"]);
                assert_eq!(args.filter.tags, vec!["home"]);
                assert_eq!(args.filter.tag_mode(), TagFilterMode::All);
                assert!(!args.filter.no_hints);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_discover_requires_ids() {
        assert!(Cli::try_parse_from(["seedling", "discover"]).is_err());
    }

    #[test]
    fn test_parse_tags_related() {
        let cli = Cli::try_parse_from(["seedling", "tags", "related", "family", "-l", "3"]).unwrap();
        match cli.command {
            Command::Tags(TagsArgs {
                action: TagsAction::Related { tag, limit },
            }) => {
                assert_eq!(tag, "family");
                assert_eq!(limit, 3);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["seedling", "clusters", "--format", "json", "-v"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.format, Some(CliFormat::Json)));
    }
}
