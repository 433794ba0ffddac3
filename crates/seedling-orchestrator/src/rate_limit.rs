//! Sliding-window rate limiter
//!
//! Timestamps older than the window are pruned before every check. A call is
//! rejected when the pruned count has already reached the limit.

use seedling_llm::AiError;
use serde::Serialize;
use std::collections::VecDeque;
use std::time::Duration;

/// Snapshot of the limiter state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimitWindow {
    /// Request timestamps inside the window, oldest first (ms)
    pub timestamps: Vec<u64>,
    /// Configured limit
    pub limit: u32,
    /// Whether the next call would be rejected
    pub is_limited: bool,
    /// When the oldest request leaves the window, if limited (ms)
    pub reset_at: Option<u64>,
}

impl RateLimitWindow {
    /// Requests currently inside the window
    pub fn in_window(&self) -> usize {
        self.timestamps.len()
    }
}

/// Per-orchestrator request limiter
#[derive(Debug)]
pub struct RateLimiter {
    limit: u32,
    window_millis: u64,
    timestamps: VecDeque<u64>,
}

impl RateLimiter {
    /// Allow `limit` calls per `window`
    pub fn new(limit: u32, window: Duration) -> Self {
        Self {
            limit,
            window_millis: u64::try_from(window.as_millis()).unwrap_or(u64::MAX),
            timestamps: VecDeque::new(),
        }
    }

    fn prune(&mut self, now: u64) {
        while let Some(&oldest) = self.timestamps.front() {
            if now.saturating_sub(oldest) >= self.window_millis {
                self.timestamps.pop_front();
            } else {
                break;
            }
        }
    }

    fn reset_at(&self) -> Option<u64> {
        self.timestamps
            .front()
            .map(|oldest| oldest + self.window_millis)
    }

    /// Admit a call to `operation` at `now` or reject it with a retry-after hint
    ///
    /// # Errors
    ///
    /// [`AiError::RateLimitExceeded`] naming the operation and carrying the
    /// time until the oldest in-window request expires.
    pub fn check_and_record(&mut self, operation: &str, now: u64) -> Result<(), AiError> {
        self.prune(now);
        if self.timestamps.len() >= self.limit as usize {
            let retry_after_ms = self
                .reset_at()
                .map(|reset| reset.saturating_sub(now))
                .unwrap_or(self.window_millis);
            return Err(AiError::RateLimitExceeded {
                operation: operation.to_string(),
                retry_after_ms,
            });
        }
        self.timestamps.push_back(now);
        Ok(())
    }

    /// Current state at `now`
    pub fn status(&mut self, now: u64) -> RateLimitWindow {
        self.prune(now);
        let is_limited = self.timestamps.len() >= self.limit as usize;
        RateLimitWindow {
            timestamps: self.timestamps.iter().copied().collect(),
            limit: self.limit,
            is_limited,
            reset_at: if is_limited { self.reset_at() } else { None },
        }
    }

    /// Forget all recorded requests
    pub fn reset(&mut self) {
        self.timestamps.clear();
    }
}
