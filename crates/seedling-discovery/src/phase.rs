//! Discovery request lifecycle

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Phase of one discovery request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiscoveryPhase {
    /// Checking input size and reading notes
    Validating,
    /// Building the scrubbed payload
    ContextBuilding,
    /// Waiting on the provider
    AwaitingProvider,
    /// Sorting centers and computing coverage
    Ranking,
    /// Finished successfully
    Done,
    /// Terminated with an error
    Failed,
}

impl DiscoveryPhase {
    /// Whether no further transition is possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, DiscoveryPhase::Done | DiscoveryPhase::Failed)
    }

    /// Whether `self → next` is a legal transition
    pub fn can_advance_to(&self, next: DiscoveryPhase) -> bool {
        use DiscoveryPhase::*;
        match (self, next) {
            (from, Failed) => !from.is_terminal(),
            (Validating, ContextBuilding)
            | (ContextBuilding, AwaitingProvider)
            | (AwaitingProvider, Ranking)
            | (Ranking, Done) => true,
            _ => false,
        }
    }
}

/// Ordered record of phases a request went through
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseTrail {
    phases: Vec<DiscoveryPhase>,
}

impl Default for PhaseTrail {
    fn default() -> Self {
        Self::new()
    }
}

impl PhaseTrail {
    /// A trail starting in [`DiscoveryPhase::Validating`]
    pub fn new() -> Self {
        Self {
            phases: vec![DiscoveryPhase::Validating],
        }
    }

    /// Current phase
    pub fn current(&self) -> DiscoveryPhase {
        self.phases.last().copied().unwrap_or(DiscoveryPhase::Validating)
    }

    /// Move to `next`; illegal transitions are ignored and return false
    pub fn advance(&mut self, next: DiscoveryPhase) -> bool {
        let current = self.current();
        if !current.can_advance_to(next) {
            warn!(?current, ?next, "Ignoring illegal discovery phase transition");
            return false;
        }
        debug!(?current, ?next, "Discovery phase change");
        self.phases.push(next);
        true
    }

    /// Phases visited so far
    pub fn phases(&self) -> &[DiscoveryPhase] {
        &self.phases
    }

    /// Consume into the phase list
    pub fn into_phases(self) -> Vec<DiscoveryPhase> {
        self.phases
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use DiscoveryPhase::*;

    #[test]
    fn test_happy_path() {
        let mut trail = PhaseTrail::new();
        for next in [ContextBuilding, AwaitingProvider, Ranking, Done] {
            assert!(trail.advance(next));
        }
        assert_eq!(trail.phases(), &[Validating, ContextBuilding, AwaitingProvider, Ranking, Done]);
    }

    #[test]
    fn test_failed_reachable_from_any_open_phase() {
        for phase in [Validating, ContextBuilding, AwaitingProvider, Ranking] {
            assert!(phase.can_advance_to(Failed));
        }
        assert!(!Done.can_advance_to(Failed));
        assert!(!Failed.can_advance_to(Failed));
    }

    #[test]
    fn test_skipping_is_rejected() {
        let mut trail = PhaseTrail::new();
        assert!(!trail.advance(Ranking));
        assert_eq!(trail.current(), Validating);
    }
}
