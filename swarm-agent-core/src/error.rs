//! Error types for Swarm agent operations

/// Result type for Swarm agent operations
pub type Result<T> = std::result::Result<T, AgentError>;

/// Error types for the Swarm agent core
///
/// Rejected tool calls are not errors: they are reported through
/// [`ValidationOutcome::Rejected`](crate::tools::ValidationOutcome).
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Tool name is not part of the catalog
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// Tool schema is inconsistent or could not be parsed
    #[error("Invalid tool schema for '{tool}': {message}")]
    InvalidSchema {
        /// Tool the schema belongs to
        tool: String,
        /// What is wrong with it
        message: String,
    },

    /// The external dispatch channel failed
    #[error("Dispatch error for '{tool}': {message}")]
    Dispatch {
        /// Tool being dispatched
        tool: String,
        /// Failure reported by the channel
        message: String,
    },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML serialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl AgentError {
    /// Create a schema error for a tool
    pub fn invalid_schema(tool: impl Into<String>, message: impl Into<String>) -> Self {
        AgentError::InvalidSchema {
            tool: tool.into(),
            message: message.into(),
        }
    }

    /// Create a dispatch error for a tool
    pub fn dispatch(tool: impl Into<String>, message: impl Into<String>) -> Self {
        AgentError::Dispatch {
            tool: tool.into(),
            message: message.into(),
        }
    }
}

impl From<String> for AgentError {
    fn from(s: String) -> Self {
        AgentError::Other(s)
    }
}

impl From<&str> for AgentError {
    fn from(s: &str) -> Self {
        AgentError::Other(s.to_string())
    }
}

impl From<anyhow::Error> for AgentError {
    fn from(err: anyhow::Error) -> Self {
        AgentError::Other(err.to_string())
    }
}
