//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Discovery engine error
    #[error("{code}: {0}", code = .0.code())]
    Ai(#[from] seedling_llm::AiError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use seedling_llm::AiError;

    #[test]
    fn test_ai_errors_show_their_code() {
        let err: CliError = AiError::InsufficientSeeds { provided: 1, required: 2 }.into();
        assert!(err.to_string().starts_with("INSUFFICIENT_SEEDS: "));
    }
}
