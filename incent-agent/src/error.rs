//! Error types for the review agent.

use thiserror::Error;

use crate::config::ConfigError;
use crate::tools::ToolError;

/// Errors that can occur while bootstrapping or running the agent.
#[derive(Debug, Error)]
pub enum AgentError {
    /// Missing or invalid configuration.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Wallet data could not be read, created or written.
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// Tool registration failure.
    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    /// Chat model request or response failure.
    #[error("LLM error: {0}")]
    Llm(String),

    /// Illegal session state transition.
    #[error("Session error: {0}")]
    Session(String),

    /// I/O error on the transcript streams.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization or deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for agent operations.
pub type Result<T> = std::result::Result<T, AgentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_conversion() {
        let err: AgentError =
            ConfigError::MissingVariables(vec!["XAI_API_KEY".to_string()]).into();
        assert!(err.to_string().contains("XAI_API_KEY"));
    }

    #[test]
    fn test_llm_error_display() {
        let err = AgentError::Llm("429 Too Many Requests".to_string());
        assert!(err.to_string().starts_with("LLM error"));
    }
}
