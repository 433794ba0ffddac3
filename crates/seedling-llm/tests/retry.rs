//! Retry bound and backoff, driven through the public client

use seedling_domain::ManualClock;
use seedling_llm::{
    AiError, AnthropicAdapter, CompletionRequest, ErrorCode, HttpResponse, MockTransport,
    OperationKind, ProviderClient, TransportError,
};
use std::sync::Arc;
use std::time::Duration;

fn client(transport: &MockTransport, clock: &ManualClock) -> ProviderClient {
    let adapter = Arc::new(AnthropicAdapter::new("http://mock", "claude-sonnet-4-5", "sk-test"));
    ProviderClient::new(adapter, Arc::new(transport.clone())).with_clock(Arc::new(clock.clone()))
}

fn request() -> CompletionRequest {
    CompletionRequest::new("claude-sonnet-4-5", 512, "Find centers.", "The kitchen table.")
}

#[tokio::test]
async fn persistent_429_makes_exactly_three_attempts() {
    let transport = MockTransport::new(HttpResponse::with_status(429, "slow down"));
    let clock = ManualClock::new(0);

    let err = client(&transport, &clock)
        .complete(OperationKind::FindCenters, &request())
        .await
        .unwrap_err();

    assert_eq!(err.code(), ErrorCode::ProviderError);
    assert_eq!(transport.call_count(), 3);
    assert_eq!(clock.sleeps(), vec![Duration::from_secs(1), Duration::from_secs(2)]);
}

#[tokio::test]
async fn server_retry_after_overrides_backoff() {
    let transport = MockTransport::replying("done");
    transport.push_response(HttpResponse::with_status(429, "").with_retry_after(Duration::from_secs(5)));
    let clock = ManualClock::new(0);

    client(&transport, &clock)
        .complete(OperationKind::FindCenters, &request())
        .await
        .unwrap();

    assert_eq!(clock.sleeps(), vec![Duration::from_secs(5)]);
}

#[tokio::test]
async fn network_errors_exhaust_to_network_error() {
    let transport = MockTransport::failing(TransportError::Network("connection refused".into()));
    let clock = ManualClock::new(0);

    let err = client(&transport, &clock)
        .complete(OperationKind::AnalyzeWholeness, &request())
        .await
        .unwrap_err();

    assert_eq!(err.code(), ErrorCode::NetworkError);
    assert!(err.to_string().contains("analyze-wholeness"));
    assert_eq!(transport.call_count(), 3);
}

#[tokio::test]
async fn slow_attempts_time_out_and_retry() {
    let transport = MockTransport::replying("late").with_delay(Duration::from_millis(500));
    let clock = ManualClock::new(0);

    let err = client(&transport, &clock)
        .with_attempt_timeout(Duration::from_millis(20))
        .complete(OperationKind::CheckUnity, &request())
        .await
        .unwrap_err();

    assert_eq!(err.code(), ErrorCode::Timeout);
    assert_eq!(transport.call_count(), 3);
}

#[tokio::test]
async fn invalid_key_fails_without_retry() {
    let transport = MockTransport::new(HttpResponse::with_status(401, "invalid x-api-key"));
    let clock = ManualClock::new(0);

    let err = client(&transport, &clock)
        .complete(OperationKind::FindCenters, &request())
        .await
        .unwrap_err();

    assert!(matches!(err, AiError::InvalidApiKey(_)));
    assert_eq!(transport.call_count(), 1);
    assert!(clock.sleeps().is_empty());
}

#[tokio::test]
async fn empty_success_body_is_invalid_response() {
    let transport = MockTransport::new(HttpResponse::ok(""));
    let clock = ManualClock::new(0);

    let err = client(&transport, &clock)
        .complete(OperationKind::FindCenters, &request())
        .await
        .unwrap_err();

    assert_eq!(err.code(), ErrorCode::InvalidResponse);
    assert_eq!(transport.call_count(), 1);
}
