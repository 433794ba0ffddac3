//! Core orchestrator implementation

use crate::cache::{cache_key, ResponseCache};
use crate::config::OrchestratorConfig;
use crate::metrics::OrchestratorMetrics;
use crate::prompt::{expansion_payload, seed_payload, system_prompt, text_payload};
use crate::rate_limit::{RateLimitWindow, RateLimiter};
use seedling_domain::{Clock, SeedPayload, SystemClock};
use seedling_llm::{
    create_adapter, AiError, CentersResponse, CompletionRequest, CostEstimate, ExpansionsResponse,
    OperationKind, ProviderClient, ProviderConfig, ReqwestTransport, SeedCentersResponse,
    TextCenter, UnityCheck, ValidatedResponse, WholenessAnalysis,
};
use serde::Serialize;
use serde_json::json;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, warn};

/// Minimum seeds for seed discovery
pub const MIN_SEEDS: usize = 2;

struct OrchestratorState {
    cache: ResponseCache,
    limiter: RateLimiter,
    metrics: OrchestratorMetrics,
}

/// Runs every provider-bound operation through validate, cache, rate limit
/// and provider call, in that order
///
/// Each instance owns its cache and limiter. Nothing runs in the background;
/// all work happens inside the awaited call.
pub struct AiOrchestrator {
    client: ProviderClient,
    clock: Arc<dyn Clock>,
    config: OrchestratorConfig,
    max_output_tokens: u32,
    state: Mutex<OrchestratorState>,
}

impl AiOrchestrator {
    /// Create an orchestrator around `client`
    pub fn new(client: ProviderClient, config: OrchestratorConfig) -> Self {
        let state = OrchestratorState {
            cache: ResponseCache::new(config.cache_ttl()),
            limiter: RateLimiter::new(config.rate_limit_per_minute, config.rate_limit_window()),
            metrics: OrchestratorMetrics::new(),
        };
        Self {
            client,
            clock: Arc::new(SystemClock),
            config,
            max_output_tokens: 4096,
            state: Mutex::new(state),
        }
    }

    /// Build the production stack from configuration
    ///
    /// # Errors
    ///
    /// [`AiError::InvalidRequest`] for invalid configuration,
    /// [`AiError::InvalidApiKey`] when a hosted backend has no key.
    pub fn from_config(
        provider: &ProviderConfig,
        config: OrchestratorConfig,
        api_key: Option<String>,
    ) -> Result<Self, AiError> {
        provider.validate().map_err(AiError::InvalidRequest)?;
        config.validate().map_err(AiError::InvalidRequest)?;

        let adapter = create_adapter(provider, api_key)?;
        let transport = ReqwestTransport::new(provider.attempt_timeout())
            .map_err(|e| AiError::Network(e.to_string()))?;
        let client = ProviderClient::new(adapter, Arc::new(transport))
            .with_retry_policy(provider.retry_policy())
            .with_attempt_timeout(provider.attempt_timeout());

        info!(
            "Orchestrator ready: provider {:?}, model '{}', limit {}/{}s",
            provider.kind, provider.model, config.rate_limit_per_minute, config.rate_limit_window_secs
        );

        Ok(Self::new(client, config).with_max_output_tokens(provider.max_output_tokens))
    }

    /// Read time through `clock` (shared with the client for backoff)
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.client = self.client.with_clock(clock.clone());
        self.clock = clock;
        self
    }

    /// Cap completion length
    pub fn with_max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.max_output_tokens = max_output_tokens;
        self
    }

    /// The configuration in use
    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    fn state(&self) -> MutexGuard<'_, OrchestratorState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn request(&self, operation: OperationKind, user: String) -> CompletionRequest {
        CompletionRequest::new(
            self.client.adapter().model(),
            self.max_output_tokens,
            system_prompt(operation),
            user,
        )
    }

    /// Find the centers of a text
    pub async fn find_centers(&self, text: &str) -> Result<CentersResponse, AiError> {
        require_text(text, "text")?;
        let op = OperationKind::FindCenters;
        let request = self.request(op, text_payload("Text", text));
        self.run(op, &json!({ "text": text }), request).await
    }

    /// Suggest ways to develop `center` within `context`
    pub async fn suggest_expansions(
        &self,
        center: &TextCenter,
        context: &str,
    ) -> Result<ExpansionsResponse, AiError> {
        require_text(&center.text, "center text")?;
        let op = OperationKind::SuggestExpansions;
        let request = self.request(op, expansion_payload(center, context));
        self.run(op, &json!({ "center": center, "context": context }), request)
            .await
    }

    /// Assess how a whole text holds together
    pub async fn analyze_wholeness(&self, text: &str) -> Result<WholenessAnalysis, AiError> {
        require_text(text, "text")?;
        let op = OperationKind::AnalyzeWholeness;
        let request = self.request(op, text_payload("Text", text));
        self.run(op, &json!({ "text": text }), request).await
    }

    /// Check a single paragraph for unity
    pub async fn check_unity(&self, paragraph: &str) -> Result<UnityCheck, AiError> {
        require_text(paragraph, "paragraph")?;
        let op = OperationKind::CheckUnity;
        let request = self.request(op, text_payload("Paragraph", paragraph));
        self.run(op, &json!({ "paragraph": paragraph }), request).await
    }

    /// Discover centers across ad-hoc seeds
    ///
    /// Connected seeds in the reply are seq ids (`seed-N`).
    pub async fn find_centers_from_seeds(
        &self,
        payload: &SeedPayload,
    ) -> Result<SeedCentersResponse, AiError> {
        if payload.len() < MIN_SEEDS {
            return Err(AiError::InsufficientSeeds {
                provided: payload.len(),
                required: MIN_SEEDS,
            });
        }
        let op = OperationKind::FindCentersFromSeeds;
        let request = self.request(op, seed_payload(payload)?);
        self.run(op, payload, request).await
    }

    /// Discover centers across the notes of a map of content
    pub async fn discover_centers_from_moc(
        &self,
        payload: &SeedPayload,
    ) -> Result<SeedCentersResponse, AiError> {
        if payload.is_empty() {
            return Err(AiError::InvalidRequest(
                "Map of content payload contains no notes".to_string(),
            ));
        }
        let op = OperationKind::DiscoverCentersFromMoc;
        let request = self.request(op, seed_payload(payload)?);
        self.run(op, payload, request).await
    }

    /// Pre-call cost estimate for a seed or MOC discovery
    pub fn estimate_seed_cost(
        &self,
        operation: OperationKind,
        payload: &SeedPayload,
    ) -> Result<CostEstimate, AiError> {
        let request = self.request(operation, seed_payload(payload)?);
        Ok(self
            .client
            .adapter()
            .estimate_cost(&request.input_text(), operation))
    }

    /// Snapshot of the rate-limit window
    pub fn rate_limit_status(&self) -> RateLimitWindow {
        let now = self.clock.now_millis();
        self.state().limiter.status(now)
    }

    /// Copy of the current metrics
    pub fn metrics(&self) -> OrchestratorMetrics {
        self.state().metrics.clone()
    }

    /// Number of cached replies
    pub fn cache_len(&self) -> usize {
        self.state().cache.len()
    }

    /// Drop expired cache entries
    pub fn prune_cache(&self) -> usize {
        let now = self.clock.now_millis();
        let removed = self.state().cache.prune_expired(now);
        debug!("Pruned {} expired cache entries", removed);
        removed
    }

    /// Clear the cache and the rate-limit window
    pub fn dispose(&self) {
        let mut state = self.state();
        state.cache.clear();
        state.limiter.reset();
        debug!("Orchestrator disposed");
    }

    async fn run<P, T>(
        &self,
        operation: OperationKind,
        params: &P,
        request: CompletionRequest,
    ) -> Result<T, AiError>
    where
        P: Serialize + ?Sized,
        T: ValidatedResponse,
    {
        let (key, source_key) = cache_key(operation, params)?;

        if self.config.cache_enabled {
            let now = self.clock.now_millis();
            let mut state = self.state();
            if let Some(hit) = state.cache.get::<T>(&key, now) {
                state.metrics.record_hit();
                debug!(operation = %operation, "Cache hit");
                return Ok(hit);
            }
            state.metrics.record_miss();
            debug!(operation = %operation, "Cache miss");
        }

        {
            let now = self.clock.now_millis();
            let mut state = self.state();
            if let Err(e) = state.limiter.check_and_record(operation.as_str(), now) {
                state.metrics.record_rate_limited();
                warn!(
                    operation = %operation,
                    retry_after_ms = e.retry_after_ms().unwrap_or_default(),
                    "Rate limit reached"
                );
                return Err(e);
            }
            state.metrics.record_provider_call(operation);
        }

        let result = self.client.complete_validated::<T>(operation, &request).await;

        let now = self.clock.now_millis();
        let mut state = self.state();
        match result {
            Ok(validated) => {
                let cost = CostEstimate::from_tokens(
                    validated.usage.input_tokens,
                    validated.usage.output_tokens,
                    self.client.adapter().pricing(),
                );
                state.metrics.record_cost(&cost);
                if self.config.cache_enabled {
                    state.cache.insert(key, source_key, &validated.value, now);
                }
                Ok(validated.value)
            }
            Err(e) => {
                state.metrics.record_failure();
                Err(e)
            }
        }
    }
}

fn require_text(value: &str, what: &str) -> Result<(), AiError> {
    if value.trim().is_empty() {
        return Err(AiError::InvalidRequest(format!("{} must not be blank", what)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use seedling_domain::ManualClock;
    use seedling_llm::{AnthropicAdapter, ErrorCode, MockTransport};

    fn orchestrator(transport: &MockTransport, config: OrchestratorConfig) -> AiOrchestrator {
        let adapter = Arc::new(AnthropicAdapter::new("http://mock", "claude-sonnet-4-5", "sk-test"));
        let client = ProviderClient::new(adapter, Arc::new(transport.clone()));
        AiOrchestrator::new(client, config).with_clock(Arc::new(ManualClock::new(1_000)))
    }

    #[tokio::test]
    async fn test_blank_input_rejected_before_network() {
        let transport = MockTransport::replying("{}");
        let orch = orchestrator(&transport, OrchestratorConfig::default());

        let err = orch.check_unity("   ").await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(transport.call_count(), 0);
        assert_eq!(orch.rate_limit_status().in_window(), 0);
    }

    #[tokio::test]
    async fn test_single_seed_rejected() {
        let transport = MockTransport::replying("{}");
        let orch = orchestrator(&transport, OrchestratorConfig::default());
        let payload = SeedPayload::new(vec![seedling_domain::SeedContext {
            seq_id: "seed-1".into(),
            content: "one".into(),
            tags: Vec::new(),
            created_at: 0,
            backlink_count: 0,
            photo: None,
        }]);

        let err = orch.find_centers_from_seeds(&payload).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::InsufficientSeeds);
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_failures_are_counted_and_not_cached() {
        let transport = MockTransport::replying("not json at all");
        let orch = orchestrator(&transport, OrchestratorConfig::default());

        assert!(orch.find_centers("text").await.is_err());
        assert!(orch.find_centers("text").await.is_err());
        assert_eq!(transport.call_count(), 2);
        assert_eq!(orch.metrics().failures, 2);
        assert_eq!(orch.cache_len(), 0);
    }

    #[tokio::test]
    async fn test_disabled_cache_always_calls_provider() {
        let transport = MockTransport::replying(r#"{"centers": [{"text": "a"}]}"#);
        let config = OrchestratorConfig {
            cache_enabled: false,
            ..Default::default()
        };
        let orch = orchestrator(&transport, config);

        orch.find_centers("text").await.unwrap();
        orch.find_centers("text").await.unwrap();
        assert_eq!(transport.call_count(), 2);
        assert_eq!(orch.metrics().cache_hits, 0);
    }

    #[tokio::test]
    async fn test_dispose_clears_cache_and_window() {
        let transport = MockTransport::replying(r#"{"centers": []}"#);
        let orch = orchestrator(&transport, OrchestratorConfig::default());

        orch.find_centers("text").await.unwrap();
        assert_eq!(orch.cache_len(), 1);
        assert_eq!(orch.rate_limit_status().in_window(), 1);

        orch.dispose();
        assert_eq!(orch.cache_len(), 0);
        assert_eq!(orch.rate_limit_status().in_window(), 0);
    }

    #[tokio::test]
    async fn test_request_uses_adapter_model_and_prompt() {
        let transport = MockTransport::replying(r#"{"centers": []}"#);
        let orch = orchestrator(&transport, OrchestratorConfig::default()).with_max_output_tokens(777);

        orch.find_centers("The kettle.").await.unwrap();
        let sent = &transport.requests()[0];
        assert_eq!(sent.body["model"], "claude-sonnet-4-5");
        assert_eq!(sent.body["max_tokens"], 777);
        assert!(sent.body["system"].as_str().unwrap().contains("centers"));
    }
}
