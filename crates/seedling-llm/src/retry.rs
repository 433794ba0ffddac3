//! Bounded retry state machine
//!
//! The policy is pure: it turns "attempt N failed like this" into either a
//! delay before the next attempt or a terminal error. The client owns the loop
//! and the sleeping, so the policy is testable without I/O or real delays.

use crate::error::{preview, AiError};
use crate::types::OperationKind;
use std::time::Duration;

/// Bounded exponential backoff policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first
    pub max_attempts: u32,
    /// Delay after the first failed attempt, doubled each time
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(1000),
        }
    }
}

impl RetryPolicy {
    /// Create a policy
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// Backoff after failed attempt number `attempt` (1-based): 1s, 2s, 4s, ...
    pub fn backoff(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        self.base_delay.saturating_mul(1u32 << exponent)
    }
}

/// How a single attempt failed
#[derive(Debug, Clone, PartialEq)]
pub enum AttemptFailure {
    /// A non-2xx status was received
    Status {
        /// HTTP status
        status: u16,
        /// Server-provided retry-after
        retry_after: Option<Duration>,
        /// Response body
        body: String,
    },
    /// Transport failed before any status arrived
    Network(String),
    /// The attempt exceeded its time budget
    Timeout,
    /// 2xx with an empty or unparseable body
    Malformed(AiError),
}

/// What to do after a failed attempt
#[derive(Debug, Clone, PartialEq)]
pub enum RetryDecision {
    /// Wait, then try again
    Retry {
        /// Delay before the next attempt
        delay: Duration,
    },
    /// Stop and surface this error
    GiveUp(AiError),
}

/// Attempt counter for one call
#[derive(Debug, Clone)]
pub struct RetryState {
    policy: RetryPolicy,
    operation: OperationKind,
    attempt: u32,
}

impl RetryState {
    /// Start a call; the first attempt is number 1
    pub fn new(policy: RetryPolicy, operation: OperationKind) -> Self {
        Self {
            policy,
            operation,
            attempt: 1,
        }
    }

    /// Current attempt number (1-based)
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    /// Record a failure of the current attempt and decide what happens next
    pub fn on_failure(&mut self, failure: AttemptFailure) -> RetryDecision {
        let op = self.operation.as_str();
        let (error, retryable, server_delay) = classify(op, failure);

        if !retryable {
            return RetryDecision::GiveUp(error);
        }
        if self.attempt >= self.policy.max_attempts {
            return RetryDecision::GiveUp(exhausted(error, self.attempt));
        }

        let delay = server_delay.unwrap_or_else(|| self.policy.backoff(self.attempt));
        self.attempt += 1;
        RetryDecision::Retry { delay }
    }
}

/// Map a failure to (error, retryable, server-provided delay)
fn classify(op: &str, failure: AttemptFailure) -> (AiError, bool, Option<Duration>) {
    match failure {
        AttemptFailure::Status {
            status,
            retry_after,
            body,
        } => {
            let detail = format!("{}: HTTP {} {}", op, status, preview(&body));
            match status {
                429 => (
                    AiError::Provider {
                        status: Some(status),
                        message: detail,
                    },
                    true,
                    retry_after,
                ),
                500..=599 => (
                    AiError::Provider {
                        status: Some(status),
                        message: detail,
                    },
                    true,
                    None,
                ),
                401 => (AiError::InvalidApiKey(detail), false, None),
                402 => (AiError::QuotaExceeded(detail), false, None),
                400..=499 if mentions_quota(&body) => (AiError::QuotaExceeded(detail), false, None),
                _ => (
                    AiError::Provider {
                        status: Some(status),
                        message: detail,
                    },
                    false,
                    None,
                ),
            }
        }
        AttemptFailure::Network(message) => (AiError::Network(format!("{}: {}", op, message)), true, None),
        AttemptFailure::Timeout => (
            AiError::Timeout(format!("{}: attempt exceeded its time budget", op)),
            true,
            None,
        ),
        AttemptFailure::Malformed(error) => (error, false, None),
    }
}

fn mentions_quota(body: &str) -> bool {
    let lower = body.to_lowercase();
    ["quota", "credit balance", "billing"]
        .iter()
        .any(|needle| lower.contains(needle))
}

/// Wrap the last transient failure once attempts are used up
fn exhausted(error: AiError, attempts: u32) -> AiError {
    let suffix = format!("(gave up after {} attempts)", attempts);
    match error {
        AiError::Provider { status, message } => AiError::Provider {
            status,
            message: format!("{} {}", message, suffix),
        },
        AiError::Network(message) => AiError::Network(format!("{} {}", message, suffix)),
        AiError::Timeout(message) => AiError::Timeout(format!("{} {}", message, suffix)),
        other => other,
    }
}
