//! Seedling Orchestrator
//!
//! Wraps every provider-bound operation in the same pipeline:
//!
//! ```text
//! validate → cache lookup → rate-limit check → provider call (retries) → cache store
//! ```
//!
//! A cache hit bypasses the rate limiter and makes no network call. Each
//! [`AiOrchestrator`] owns its own cache and limiter.
//!
//! # Example Usage
//!
//! ```no_run
//! use seedling_orchestrator::{AiOrchestrator, OrchestratorConfig};
//! use seedling_llm::ProviderConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = ProviderConfig::default();
//! let api_key = provider.api_key_from_env();
//! let orchestrator = AiOrchestrator::from_config(&provider, OrchestratorConfig::default(), api_key)?;
//!
//! let unity = orchestrator.check_unity("The house was quiet. The kettle ticked as it cooled.").await?;
//! println!("Unity score: {}", unity.score);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod cache;
mod config;
mod metrics;
mod orchestrator;
pub mod prompt;
mod rate_limit;

pub use cache::{cache_key, CacheEntry, ResponseCache};
pub use config::OrchestratorConfig;
pub use metrics::OrchestratorMetrics;
pub use orchestrator::{AiOrchestrator, MIN_SEEDS};
pub use rate_limit::{RateLimitWindow, RateLimiter};
