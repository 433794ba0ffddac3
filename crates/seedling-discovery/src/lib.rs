//! Seedling Discovery
//!
//! Finds the recurring thematic centers across a writer's notes.
//!
//! # Overview
//!
//! Two entry points on [`CenterDiscoveryCoordinator`]:
//!
//! - **Seed discovery**: a hand-picked set of notes (at least two)
//! - **Map-of-content discovery**: every note an index note links to
//!   (between 5 and 50 readable notes)
//!
//! # Architecture
//!
//! ```text
//! validating → context-building → awaiting-provider → ranking → done
//!      └──────────────┴──────────────────┴──────────────┴──→ failed
//! ```
//!
//! Only anonymized context leaves the process: notes become `seed-N`, links
//! are rendered as display text or seq ids, and frontmatter is removed.
//!
//! # Example Usage
//!
//! ```no_run
//! use seedling_discovery::{CenterDiscoveryCoordinator, DiscoveryConfig, DiscoveryOptions};
//! use seedling_domain::{InMemoryVault, Note, NoteId};
//! use seedling_llm::ProviderConfig;
//! use seedling_orchestrator::{AiOrchestrator, OrchestratorConfig};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut vault = InMemoryVault::new(vec![
//!     Note::new("seeds/kettle.md", "The kettle ticked as it cooled."),
//!     Note::new("seeds/stove.md", "She never let anyone else light the stove."),
//! ]);
//! vault.compute_backlinks();
//! let vault = Arc::new(vault);
//!
//! let provider = ProviderConfig::default();
//! let orchestrator = AiOrchestrator::from_config(
//!     &provider,
//!     OrchestratorConfig::default(),
//!     provider.api_key_from_env(),
//! )?;
//!
//! let coordinator = CenterDiscoveryCoordinator::new(
//!     vault.clone(),
//!     vault,
//!     Arc::new(orchestrator),
//!     DiscoveryConfig::default(),
//! );
//!
//! let ids = [NoteId::from("seeds/kettle.md"), NoteId::from("seeds/stove.md")];
//! let outcome = coordinator.discover_from_seeds(&ids, &DiscoveryOptions::default()).await?;
//! for center in &outcome.centers {
//!     println!("{} ({})", center.name, center.strength.as_str());
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
pub mod context;
mod coordinator;
mod phase;
pub mod ranking;
mod types;

pub use config::DiscoveryConfig;
pub use coordinator::CenterDiscoveryCoordinator;
pub use phase::{DiscoveryPhase, PhaseTrail};
pub use types::{DiscoveryOptions, DiscoveryOutcome};
