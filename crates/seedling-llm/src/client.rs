//! Provider client: one call, bounded retries, per-attempt timeout

use crate::adapter::ProviderAdapter;
use crate::error::AiError;
use crate::parse::extract_json_payload;
use crate::retry::{AttemptFailure, RetryDecision, RetryPolicy, RetryState};
use crate::schema::ValidatedResponse;
use crate::transport::{HttpTransport, TransportError};
use crate::types::{CompletionRequest, CompletionResponse, OperationKind, Usage};
use seedling_domain::{Clock, SystemClock};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Default time budget for one attempt
pub const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(60);

/// A validated reply together with its token usage
#[derive(Debug, Clone, PartialEq)]
pub struct Validated<T> {
    /// Typed reply
    pub value: T,
    /// Tokens the provider reported
    pub usage: Usage,
}

/// Sends completion requests through an adapter and a transport
#[derive(Clone)]
pub struct ProviderClient {
    adapter: Arc<dyn ProviderAdapter>,
    transport: Arc<dyn HttpTransport>,
    clock: Arc<dyn Clock>,
    policy: RetryPolicy,
    attempt_timeout: Duration,
}

impl ProviderClient {
    /// Client with the default retry policy and the system clock
    pub fn new(adapter: Arc<dyn ProviderAdapter>, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            adapter,
            transport,
            clock: Arc::new(SystemClock),
            policy: RetryPolicy::default(),
            attempt_timeout: DEFAULT_ATTEMPT_TIMEOUT,
        }
    }

    /// Use `clock` for backoff sleeps
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replace the retry policy
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Replace the per-attempt timeout
    pub fn with_attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = timeout;
        self
    }

    /// The adapter in use
    pub fn adapter(&self) -> &Arc<dyn ProviderAdapter> {
        &self.adapter
    }

    /// Send `request`, retrying transient failures
    ///
    /// # Errors
    ///
    /// - [`AiError::InvalidApiKey`] / [`AiError::QuotaExceeded`] on 401/402
    /// - [`AiError::Provider`] on other error statuses, after retries for 429/5xx
    /// - [`AiError::Network`] / [`AiError::Timeout`] once attempts are exhausted
    /// - [`AiError::InvalidResponse`] on an empty or malformed 2xx body
    pub async fn complete(
        &self,
        operation: OperationKind,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, AiError> {
        let http = self.adapter.build_request(request);
        let mut retry = RetryState::new(self.policy.clone(), operation);

        loop {
            let attempt = retry.attempt();
            debug!(operation = %operation, attempt, "Sending provider request");

            let failure = match tokio::time::timeout(self.attempt_timeout, self.transport.send(&http)).await {
                Err(_) | Ok(Err(TransportError::Timeout)) => AttemptFailure::Timeout,
                Ok(Err(TransportError::Network(message))) => AttemptFailure::Network(message),
                Ok(Ok(response)) if response.is_success() => {
                    match self.adapter.parse_response(&response.body) {
                        Ok(parsed) => {
                            debug!(
                                operation = %operation,
                                attempt,
                                input_tokens = parsed.usage.input_tokens,
                                output_tokens = parsed.usage.output_tokens,
                                "Provider request succeeded"
                            );
                            return Ok(parsed);
                        }
                        Err(e) => AttemptFailure::Malformed(e),
                    }
                }
                Ok(Ok(response)) => AttemptFailure::Status {
                    status: response.status,
                    retry_after: response.retry_after,
                    body: response.body,
                },
            };

            match retry.on_failure(failure) {
                RetryDecision::Retry { delay } => {
                    warn!(
                        operation = %operation,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        "Provider attempt failed, retrying"
                    );
                    self.clock.sleep(delay).await;
                }
                RetryDecision::GiveUp(error) => {
                    warn!(operation = %operation, attempt, code = %error.code(), "Provider call failed");
                    return Err(error);
                }
            }
        }
    }

    /// Send `request` and validate the JSON reply as `T`
    pub async fn complete_validated<T: ValidatedResponse>(
        &self,
        operation: OperationKind,
        request: &CompletionRequest,
    ) -> Result<Validated<T>, AiError> {
        let response = self.complete(operation, request).await?;
        let text = response.text();
        let payload = extract_json_payload(&text)?;
        let value = T::validate(&payload).map_err(|e| {
            AiError::invalid_response(format!("{} reply failed validation: {}", operation, e), &text)
        })?;

        Ok(Validated {
            value,
            usage: response.usage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anthropic::AnthropicAdapter;
    use crate::error::ErrorCode;
    use crate::mock::MockTransport;
    use crate::schema::UnityCheck;
    use crate::transport::HttpResponse;
    use seedling_domain::ManualClock;

    fn client(transport: &MockTransport, clock: &ManualClock) -> ProviderClient {
        let adapter = Arc::new(AnthropicAdapter::new("http://mock", "claude-sonnet-4-5", "sk-test"));
        ProviderClient::new(adapter, Arc::new(transport.clone())).with_clock(Arc::new(clock.clone()))
    }

    fn request() -> CompletionRequest {
        CompletionRequest::new("claude-sonnet-4-5", 256, "system", "paragraph")
    }

    #[tokio::test]
    async fn test_success_first_attempt() {
        let transport = MockTransport::replying("hello");
        let clock = ManualClock::new(0);
        let response = client(&transport, &clock)
            .complete(OperationKind::CheckUnity, &request())
            .await
            .unwrap();
        assert_eq!(response.text(), "hello");
        assert_eq!(transport.call_count(), 1);
        assert!(clock.sleeps().is_empty());
    }

    #[tokio::test]
    async fn test_recovers_after_server_error() {
        let transport = MockTransport::replying("ok");
        transport.push_response(HttpResponse::with_status(503, "overloaded"));
        let clock = ManualClock::new(0);

        let response = client(&transport, &clock)
            .complete(OperationKind::FindCenters, &request())
            .await
            .unwrap();
        assert_eq!(response.text(), "ok");
        assert_eq!(transport.call_count(), 2);
        assert_eq!(clock.sleeps(), vec![Duration::from_secs(1)]);
    }

    #[tokio::test]
    async fn test_bad_request_is_not_retried() {
        let transport = MockTransport::new(HttpResponse::with_status(400, "bad request"));
        let clock = ManualClock::new(0);
        let err = client(&transport, &clock)
            .complete(OperationKind::FindCenters, &request())
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::ProviderError);
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn test_validated_reply() {
        let reply = r#"Sure: {"hasUnity": true, "score": 8, "mainIdea": "home", "offTopicSentences": [], "suggestions": []}"#;
        let transport = MockTransport::replying(reply);
        let clock = ManualClock::new(0);
        let validated = client(&transport, &clock)
            .complete_validated::<UnityCheck>(OperationKind::CheckUnity, &request())
            .await
            .unwrap();
        assert!(validated.value.has_unity);
        assert_eq!(validated.usage.output_tokens, 5);
    }

    #[tokio::test]
    async fn test_validation_failure_names_field() {
        let transport = MockTransport::replying(r#"{"hasUnity": true}"#);
        let clock = ManualClock::new(0);
        let err = client(&transport, &clock)
            .complete_validated::<UnityCheck>(OperationKind::CheckUnity, &request())
            .await
            .unwrap_err();
        match err {
            AiError::InvalidResponse { message, .. } => {
                assert!(message.contains("check-unity"));
                assert!(message.contains("score"));
            }
            other => panic!("Expected InvalidResponse, got {:?}", other),
        }
    }
}
