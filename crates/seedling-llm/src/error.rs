//! Error taxonomy shared by every engine layer
//!
//! Every error surfaced to callers maps onto one [`ErrorCode`].

use std::fmt;
use thiserror::Error;

/// Closed set of error codes exposed to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Bad caller input, never retried
    InvalidRequest,
    /// Local rate limit hit, no network activity
    RateLimitExceeded,
    /// Transport failure, retried with backoff
    NetworkError,
    /// Attempt exceeded its time budget, retried with backoff
    Timeout,
    /// Backend returned an error status
    ProviderError,
    /// Backend reply could not be parsed or validated
    InvalidResponse,
    /// Account quota or credit exhausted
    QuotaExceeded,
    /// Credentials rejected
    InvalidApiKey,
    /// Fewer than two seeds supplied
    InsufficientSeeds,
    /// Structured source resolves to too few notes
    MocTooSmall,
    /// Structured source resolves to too many notes
    MocTooLarge,
    /// Structured source resolves to no readable note
    MocNoValidNotes,
    /// Structured source itself is unreadable
    InvalidMoc,
}

impl ErrorCode {
    /// String code, e.g. `RATE_LIMIT_EXCEEDED`
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InvalidRequest => "INVALID_REQUEST",
            ErrorCode::RateLimitExceeded => "RATE_LIMIT_EXCEEDED",
            ErrorCode::NetworkError => "NETWORK_ERROR",
            ErrorCode::Timeout => "TIMEOUT",
            ErrorCode::ProviderError => "PROVIDER_ERROR",
            ErrorCode::InvalidResponse => "INVALID_RESPONSE",
            ErrorCode::QuotaExceeded => "QUOTA_EXCEEDED",
            ErrorCode::InvalidApiKey => "INVALID_API_KEY",
            ErrorCode::InsufficientSeeds => "INSUFFICIENT_SEEDS",
            ErrorCode::MocTooSmall => "MOC_TOO_SMALL",
            ErrorCode::MocTooLarge => "MOC_TOO_LARGE",
            ErrorCode::MocNoValidNotes => "MOC_NO_VALID_NOTES",
            ErrorCode::InvalidMoc => "INVALID_MOC",
        }
    }

    /// Whether errors with this code are retried with backoff
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ErrorCode::NetworkError | ErrorCode::Timeout | ErrorCode::ProviderError
        )
    }

    /// Whether this is an input-validation code raised before any network call
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ErrorCode::InvalidRequest
                | ErrorCode::InsufficientSeeds
                | ErrorCode::MocTooSmall
                | ErrorCode::MocTooLarge
                | ErrorCode::MocNoValidNotes
                | ErrorCode::InvalidMoc
        )
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur anywhere in the discovery pipeline
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AiError {
    /// Caller input rejected
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Local sliding-window limit reached
    #[error("Rate limit exceeded for {operation}: retry after {retry_after_ms}ms")]
    RateLimitExceeded {
        /// Operation that was refused
        operation: String,
        /// Time until the oldest request leaves the window
        retry_after_ms: u64,
    },

    /// Network or transport failure
    #[error("Network error: {0}")]
    Network(String),

    /// Attempt timed out
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Backend error status
    #[error("Provider error: {message}")]
    Provider {
        /// HTTP status, if one was received
        status: Option<u16>,
        /// Description including operation and context
        message: String,
    },

    /// Reply could not be parsed or failed validation
    #[error("Invalid response: {message} (preview: {preview:?})")]
    InvalidResponse {
        /// What went wrong
        message: String,
        /// Leading part of the raw reply
        preview: String,
    },

    /// Quota or credit exhausted
    #[error("Quota exceeded: {0}")]
    QuotaExceeded(String),

    /// Credentials rejected or missing
    #[error("Invalid API key: {0}")]
    InvalidApiKey(String),

    /// Too few seeds for discovery
    #[error("Insufficient seeds: need at least {required}, got {provided}")]
    InsufficientSeeds {
        /// Seeds supplied
        provided: usize,
        /// Minimum required
        required: usize,
    },

    /// Structured source below the minimum size
    #[error("Map of content '{source_name}' is too small: {count} notes (minimum {min})")]
    MocTooSmall {
        /// Source description
        source_name: String,
        /// Readable notes
        count: usize,
        /// Minimum
        min: usize,
    },

    /// Structured source above the maximum size
    #[error("Map of content '{source_name}' is too large: {count} notes (maximum {max})")]
    MocTooLarge {
        /// Source description
        source_name: String,
        /// Readable notes
        count: usize,
        /// Maximum
        max: usize,
    },

    /// Structured source links to no readable note
    #[error("Map of content '{source_name}' links to no readable notes")]
    MocNoValidNotes {
        /// Source description
        source_name: String,
    },

    /// Structured source unreadable
    #[error("Invalid map of content: {0}")]
    InvalidMoc(String),
}

impl AiError {
    /// The caller-facing code
    pub fn code(&self) -> ErrorCode {
        match self {
            AiError::InvalidRequest(_) => ErrorCode::InvalidRequest,
            AiError::RateLimitExceeded { .. } => ErrorCode::RateLimitExceeded,
            AiError::Network(_) => ErrorCode::NetworkError,
            AiError::Timeout(_) => ErrorCode::Timeout,
            AiError::Provider { .. } => ErrorCode::ProviderError,
            AiError::InvalidResponse { .. } => ErrorCode::InvalidResponse,
            AiError::QuotaExceeded(_) => ErrorCode::QuotaExceeded,
            AiError::InvalidApiKey(_) => ErrorCode::InvalidApiKey,
            AiError::InsufficientSeeds { .. } => ErrorCode::InsufficientSeeds,
            AiError::MocTooSmall { .. } => ErrorCode::MocTooSmall,
            AiError::MocTooLarge { .. } => ErrorCode::MocTooLarge,
            AiError::MocNoValidNotes { .. } => ErrorCode::MocNoValidNotes,
            AiError::InvalidMoc(_) => ErrorCode::InvalidMoc,
        }
    }

    /// Retry-after hint in milliseconds, where one applies
    pub fn retry_after_ms(&self) -> Option<u64> {
        match self {
            AiError::RateLimitExceeded { retry_after_ms, .. } => Some(*retry_after_ms),
            _ => None,
        }
    }

    /// Retry-after hint as a duration
    pub fn retry_after(&self) -> Option<std::time::Duration> {
        self.retry_after_ms().map(std::time::Duration::from_millis)
    }

    /// Whether the failure is transient (network, timeout, provider status)
    pub fn is_retryable(&self) -> bool {
        self.code().is_retryable()
    }

    /// Prefix provider errors with request context; other kinds pass through unchanged
    pub fn with_context(self, context: &str) -> Self {
        match self {
            AiError::Provider { status, message } => AiError::Provider {
                status,
                message: format!("{}: {}", context, message),
            },
            other => other,
        }
    }

    /// Build a rate-limit error for `operation`
    pub fn rate_limited(operation: impl Into<String>, retry_after_ms: u64) -> Self {
        AiError::RateLimitExceeded {
            operation: operation.into(),
            retry_after_ms,
        }
    }

    /// Build an invalid-response error with a preview of the raw text
    pub fn invalid_response(message: impl Into<String>, raw: &str) -> Self {
        AiError::InvalidResponse {
            message: message.into(),
            preview: preview(raw),
        }
    }
}

/// Characters of raw text kept in diagnostics
pub const PREVIEW_CHARS: usize = 200;

/// Leading part of `raw`, cut on a character boundary
pub fn preview(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.chars().count() <= PREVIEW_CHARS {
        return trimmed.to_string();
    }
    let mut cut: String = trimmed.chars().take(PREVIEW_CHARS).collect();
    cut.push_str("...");
    cut
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(
            AiError::rate_limited("find-centers", 5).code().as_str(),
            "RATE_LIMIT_EXCEEDED"
        );
        assert_eq!(
            AiError::MocNoValidNotes { source_name: "m".into() }.code().to_string(),
            "MOC_NO_VALID_NOTES"
        );
        assert!(ErrorCode::MocTooLarge.is_validation());
        assert!(!ErrorCode::Timeout.is_validation());
    }

    #[test]
    fn test_retry_after_hint() {
        assert_eq!(AiError::rate_limited("find-centers", 1200).retry_after_ms(), Some(1200));
        assert_eq!(AiError::Network("x".into()).retry_after_ms(), None);
    }

    #[test]
    fn test_rate_limit_message_names_operation() {
        let err = AiError::rate_limited("analyze-wholeness", 4000);
        assert_eq!(
            err.to_string(),
            "Rate limit exceeded for analyze-wholeness: retry after 4000ms"
        );
    }

    #[test]
    fn test_retryable_classification() {
        assert!(AiError::Timeout("t".into()).is_retryable());
        assert!(!AiError::rate_limited("find-centers", 1).is_retryable());
        assert!(!AiError::invalid_response("bad", "").is_retryable());
        assert!(!AiError::QuotaExceeded("q".into()).is_retryable());
    }

    #[test]
    fn test_with_context_only_wraps_provider_errors() {
        let wrapped = AiError::Provider {
            status: Some(503),
            message: "HTTP 503".into(),
        }
        .with_context("seed discovery (3 notes)");
        assert_eq!(
            wrapped,
            AiError::Provider {
                status: Some(503),
                message: "seed discovery (3 notes): HTTP 503".into()
            }
        );

        let validation = AiError::InsufficientSeeds { provided: 1, required: 2 };
        assert_eq!(validation.clone().with_context("ctx"), validation);
    }

    #[test]
    fn test_preview_truncates() {
        let long = "x".repeat(500);
        let p = preview(&long);
        assert_eq!(p.chars().count(), PREVIEW_CHARS + 3);
        assert_eq!(preview("  short "), "short");
    }
}
