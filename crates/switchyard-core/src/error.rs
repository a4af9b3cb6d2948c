//! Error types for switchyard-core
//!
//! Two layers live here. [`Error`] is what escapes the workflow to a
//! transport or the CLI: validation failures, conversation store failures
//! and startup configuration problems.
//! [`AgentError`] groups the recoverable per-agent failures that the
//! dispatcher contains and turns into the generic bilingual reply.

use crate::messages;
use thiserror::Error;

/// Core error type, visible to the transport layer
#[derive(Debug, Error)]
pub enum Error {
    /// Request failed validation (e.g. empty message)
    #[error("validation error: {0}")]
    Validation(String),

    /// Conversation store failure
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Invalid configuration
    #[error("configuration error: {0}")]
    Configuration(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Human-readable rendering of an error for API bodies and the CLI
pub trait UserFriendlyError {
    /// Short message safe to show an end user
    fn user_message(&self) -> String;

    /// How the caller might fix it
    fn suggestion(&self) -> Option<String>;

    /// Stable machine-readable code
    fn code(&self) -> &'static str;
}

impl UserFriendlyError for Error {
    fn user_message(&self) -> String {
        match self {
            Error::Validation(_) => messages::API_VALIDATION_ERROR.to_string(),
            Error::Store(_) => messages::REDIS_OPERATION_FAILED.to_string(),
            Error::Configuration(msg) => format!("Configuration error: {msg}"),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            Error::Validation(_) => Some("Send a non-empty `message` field.".to_string()),
            Error::Store(_) => Some("Retry in a few moments.".to_string()),
            Error::Configuration(_) => Some(
                "Check config/default.toml, SWITCHYARD_* variables and OPENAI_API_KEY."
                    .to_string(),
            ),
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Error::Validation(_) => "VALIDATION_ERROR",
            Error::Store(_) => "STORE_ERROR",
            Error::Configuration(_) => "CONFIGURATION_ERROR",
        }
    }
}

/// Format an error for the CLI
pub fn format_error_for_cli(error: &Error) -> String {
    let mut output = format!("[{}] {}", error.code(), error.user_message());
    if let Some(suggestion) = error.suggestion() {
        output.push_str("\n  hint: ");
        output.push_str(&suggestion);
    }
    output
}

// ============================================================================
// Conversation store
// ============================================================================

/// Conversation store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// Could not reach the backend
    #[error("connection failed: {0}")]
    Connection(String),

    /// A command was rejected
    #[error("command failed: {0}")]
    Command(String),

    /// A record could not be encoded
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialization(e.to_string())
    }
}

// ============================================================================
// Agent taxonomy
// ============================================================================

/// Router failures that escape `route` (only input validation)
#[derive(Debug, Error)]
pub enum RouterError {
    /// Empty or whitespace-only query
    #[error("query cannot be empty")]
    EmptyQuery,
}

/// Math solver failures
///
/// All variants collapse to one generic reply for the user but stay
/// distinct in logs.
#[derive(Debug, Error)]
pub enum MathError {
    /// The model returned nothing or the literal "error"
    #[error("{}", messages::MATH_VALIDATION_ERROR)]
    EmptyOrError,

    /// Nothing numeric survived cleaning
    #[error("result '{0}' contains no valid numeric data")]
    NoNumericData(String),

    /// The cleaned text did not parse as a float
    #[error("could not convert '{cleaned}' to a number: {reason}")]
    ConversionFailed {
        /// Text after stripping non-numeric characters
        cleaned: String,
        /// Parser message
        reason: String,
    },

    /// Parsed value is NaN
    #[error("result is Not a Number (NaN)")]
    NotANumber,

    /// Parsed value exceeds the magnitude ceiling
    #[error("result magnitude |{value}| exceeds the limit of {limit}")]
    OutOfBounds {
        /// Parsed value
        value: f64,
        /// Ceiling in force
        limit: f64,
    },

    /// Anything else, typically the LLM call itself
    #[error("math evaluation failed: {0}")]
    Evaluation(String),
}

/// Knowledge query failures
#[derive(Debug, Error)]
pub enum KnowledgeError {
    /// Empty or whitespace-only query
    #[error("query cannot be empty")]
    EmptyQuery,

    /// The engine raised
    #[error("knowledge query failed: {0}")]
    Query(String),

    /// No engine has been built yet
    #[error("{}", messages::KNOWLEDGE_BASE_UNAVAILABLE)]
    Unavailable,
}

/// Response conversion failures; the converter falls back on any of these
#[derive(Debug, Error)]
pub enum ConversionError {
    /// The model returned no content
    #[error("conversion returned no content")]
    EmptyResponse,

    /// The LLM call failed
    #[error("conversion call failed: {0}")]
    Llm(#[from] switchyard_llm::Error),
}

/// Recoverable agent failures contained by the dispatcher
#[derive(Debug, Error)]
pub enum AgentError {
    /// Router failure
    #[error(transparent)]
    Router(#[from] RouterError),

    /// Math failure
    #[error(transparent)]
    Math(#[from] MathError),

    /// Knowledge failure
    #[error(transparent)]
    Knowledge(#[from] KnowledgeError),

    /// Conversion failure
    #[error(transparent)]
    Conversion(#[from] ConversionError),
}

impl AgentError {
    /// Short kind label for logs
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            AgentError::Router(_) => "router",
            AgentError::Math(MathError::Evaluation(_)) => "math_evaluation",
            AgentError::Math(_) => "math_validation",
            AgentError::Knowledge(KnowledgeError::Unavailable) => "knowledge_unavailable",
            AgentError::Knowledge(_) => "knowledge_query",
            AgentError::Conversion(_) => "conversion",
        }
    }
}
