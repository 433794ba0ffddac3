//! Command implementations.

pub mod clusters;
pub mod config;
pub mod discover;
pub mod tags;

pub use self::clusters::execute_clusters;
pub use self::config::execute_config;
pub use self::discover::{build_coordinator, execute_discover, execute_moc, VaultCoordinator};
pub use self::tags::execute_tags;
