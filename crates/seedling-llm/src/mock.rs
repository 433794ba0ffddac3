//! Scripted transport for tests
//!
//! Replies are served from a queue; once the queue is empty every call gets
//! the default reply. All requests are recorded.
//!
//! # Examples
//!
//! ```
//! use seedling_llm::{HttpResponse, MockTransport};
//!
//! let transport = MockTransport::replying(r#"{"centers": []}"#);
//! transport.push_response(HttpResponse::with_status(503, "overloaded"));
//! assert_eq!(transport.call_count(), 0);
//! ```

use crate::transport::{HttpRequest, HttpResponse, HttpTransport, TransportError};
use async_trait::async_trait;
use serde_json::json;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

type Scripted = Result<HttpResponse, TransportError>;

/// Transport that never touches the network
#[derive(Debug, Clone)]
pub struct MockTransport {
    default_reply: Scripted,
    script: Arc<Mutex<VecDeque<Scripted>>>,
    requests: Arc<Mutex<Vec<HttpRequest>>>,
    delay: Option<Duration>,
}

impl MockTransport {
    /// Transport whose default reply is `response`
    pub fn new(response: HttpResponse) -> Self {
        Self {
            default_reply: Ok(response),
            script: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            delay: None,
        }
    }

    /// Transport that answers every call with an Anthropic-shaped reply carrying `text`
    pub fn replying(text: &str) -> Self {
        Self::new(HttpResponse::ok(anthropic_body(text)))
    }

    /// Transport whose default outcome is a transport error
    pub fn failing(error: TransportError) -> Self {
        let mut transport = Self::new(HttpResponse::ok(""));
        transport.default_reply = Err(error);
        transport
    }

    /// Hold every reply for `delay` of real time
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Queue a reply ahead of the default
    pub fn push_response(&self, response: HttpResponse) {
        lock(&self.script).push_back(Ok(response));
    }

    /// Queue a transport error ahead of the default
    pub fn push_error(&self, error: TransportError) {
        lock(&self.script).push_back(Err(error));
    }

    /// Number of requests sent so far
    pub fn call_count(&self) -> usize {
        lock(&self.requests).len()
    }

    /// Copies of every request sent so far
    pub fn requests(&self) -> Vec<HttpRequest> {
        lock(&self.requests).clone()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        lock(&self.requests).push(request.clone());
        let next = lock(&self.script).pop_front();

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        next.unwrap_or_else(|| self.default_reply.clone())
    }
}

/// Minimal Anthropic Messages API body wrapping `text`
pub fn anthropic_body(text: &str) -> String {
    json!({
        "id": "msg_mock",
        "type": "message",
        "role": "assistant",
        "content": [{"type": "text", "text": text}],
        "stop_reason": "end_turn",
        "usage": {"input_tokens": 10, "output_tokens": 5}
    })
    .to_string()
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> HttpRequest {
        HttpRequest {
            url: "http://mock/v1/messages".into(),
            headers: Vec::new(),
            body: json!({}),
        }
    }

    #[tokio::test]
    async fn test_script_then_default() {
        let transport = MockTransport::replying("fallback");
        transport.push_response(HttpResponse::with_status(500, "boom"));
        transport.push_error(TransportError::Timeout);

        assert_eq!(transport.send(&request()).await.unwrap().status, 500);
        assert_eq!(transport.send(&request()).await, Err(TransportError::Timeout));
        let last = transport.send(&request()).await.unwrap();
        assert!(last.body.contains("fallback"));
        assert_eq!(transport.call_count(), 3);
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let transport = MockTransport::replying("x");
        let clone = transport.clone();
        clone.send(&request()).await.unwrap();
        assert_eq!(transport.call_count(), 1);
        assert_eq!(transport.requests()[0].url, "http://mock/v1/messages");
    }

    #[tokio::test]
    async fn test_failing_default() {
        let transport = MockTransport::failing(TransportError::Network("refused".into()));
        assert!(matches!(
            transport.send(&request()).await,
            Err(TransportError::Network(_))
        ));
    }
}
