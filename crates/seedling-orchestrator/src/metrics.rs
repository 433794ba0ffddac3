//! Metrics collected by the orchestrator

use seedling_llm::{CostEstimate, OperationKind};
use std::collections::HashMap;

/// Counters for orchestrated calls
///
/// Tracks cache effectiveness, provider traffic and accumulated cost.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrchestratorMetrics {
    /// Calls answered from the cache
    pub cache_hits: usize,

    /// Calls that missed the cache
    pub cache_misses: usize,

    /// Calls that went to the provider, per operation
    pub provider_calls: HashMap<OperationKind, usize>,

    /// Calls rejected by the local rate limiter
    pub rate_limited: usize,

    /// Provider calls that ended in an error
    pub failures: usize,

    /// Cost of successful provider calls, from reported usage
    pub cost: CostEstimate,
}

impl OrchestratorMetrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a cache hit
    pub fn record_hit(&mut self) {
        self.cache_hits += 1;
    }

    /// Record a cache miss
    pub fn record_miss(&mut self) {
        self.cache_misses += 1;
    }

    /// Record a provider call for `operation`
    pub fn record_provider_call(&mut self, operation: OperationKind) {
        *self.provider_calls.entry(operation).or_insert(0) += 1;
    }

    /// Record a rate-limit rejection
    pub fn record_rate_limited(&mut self) {
        self.rate_limited += 1;
    }

    /// Record a failed provider call
    pub fn record_failure(&mut self) {
        self.failures += 1;
    }

    /// Add the cost of a completed call
    pub fn record_cost(&mut self, cost: &CostEstimate) {
        self.cost = self.cost.add(cost);
    }

    /// Total provider calls across operations
    pub fn total_provider_calls(&self) -> usize {
        self.provider_calls.values().sum()
    }

    /// Fraction of lookups answered from the cache
    pub fn hit_rate(&self) -> f64 {
        let lookups = self.cache_hits + self.cache_misses;
        if lookups == 0 {
            0.0
        } else {
            self.cache_hits as f64 / lookups as f64
        }
    }

    /// Reset all metrics
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Generate a summary report of metrics
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Orchestrator Metrics Summary".to_string(),
            "============================".to_string(),
            format!(
                "Cache: {} hits, {} misses ({:.0}% hit rate)",
                self.cache_hits,
                self.cache_misses,
                self.hit_rate() * 100.0
            ),
            format!("Rate limited: {}", self.rate_limited),
            format!("Failures: {}", self.failures),
            String::new(),
        ];

        if !self.provider_calls.is_empty() {
            let mut calls: Vec<_> = self.provider_calls.iter().collect();
            calls.sort_by_key(|(op, _)| op.as_str());
            lines.push("Provider calls by operation:".to_string());
            for (op, count) in calls {
                lines.push(format!("  {}: {}", op, count));
            }
            lines.push(format!("  Total: {}", self.total_provider_calls()));
            lines.push(String::new());
        }

        lines.push(format!(
            "Tokens: {} in, {} out (${:.4})",
            self.cost.input_tokens, self.cost.output_tokens, self.cost.cost_usd
        ));

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seedling_llm::Pricing;

    #[test]
    fn test_counters() {
        let mut metrics = OrchestratorMetrics::new();
        metrics.record_miss();
        metrics.record_provider_call(OperationKind::FindCenters);
        metrics.record_hit();
        metrics.record_provider_call(OperationKind::FindCenters);
        metrics.record_provider_call(OperationKind::CheckUnity);

        assert_eq!(metrics.total_provider_calls(), 3);
        assert_eq!(metrics.provider_calls[&OperationKind::FindCenters], 2);
        assert_eq!(metrics.hit_rate(), 0.5);
    }

    #[test]
    fn test_cost_accumulates() {
        let mut metrics = OrchestratorMetrics::new();
        let pricing = Pricing {
            input_per_million: 3.0,
            output_per_million: 15.0,
        };
        metrics.record_cost(&CostEstimate::from_tokens(1_000_000, 0, pricing));
        metrics.record_cost(&CostEstimate::from_tokens(0, 1_000_000, pricing));
        assert_eq!(metrics.cost.input_tokens, 1_000_000);
        assert!((metrics.cost.cost_usd - 18.0).abs() < 1e-9);
    }

    #[test]
    fn test_summary_and_reset() {
        let mut metrics = OrchestratorMetrics::new();
        metrics.record_provider_call(OperationKind::AnalyzeWholeness);
        metrics.record_rate_limited();

        let summary = metrics.summary();
        assert!(summary.contains("analyze-wholeness: 1"));
        assert!(summary.contains("Rate limited: 1"));

        metrics.reset();
        assert_eq!(metrics, OrchestratorMetrics::default());
    }
}
