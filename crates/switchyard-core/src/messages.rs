//! Fixed user-facing and log messages.

/// Generic bilingual failure reply
pub const GENERIC_ERROR: &str =
    "Sorry, I could not process your request. / Desculpe, não consegui processar a sua pergunta.";

/// Bilingual rejection for queries outside English and Portuguese
pub const UNSUPPORTED_LANGUAGE: &str = "Unsupported language. Please ask in English or Portuguese. / Por favor, pergunte em inglês ou português.";

/// Body message for 422 responses
pub const API_VALIDATION_ERROR: &str = "Request validation failed.";

/// Body message for 500 responses
pub const API_INTERNAL_ERROR: &str = "An internal error occurred.";

/// Body message when the conversation store fails
pub const REDIS_OPERATION_FAILED: &str = "Redis operation failed.";

/// Logged when the dispatcher finds no knowledge engine
pub const KNOWLEDGE_BASE_UNAVAILABLE: &str =
    "The knowledge base is not available at the moment. It may be initializing.";

/// Substituted for empty, "none" or "null" knowledge answers
pub const KNOWLEDGE_NO_INFORMATION: &str =
    "I don't have information about that in the available documentation.";

/// Raised when the math model answers with nothing or "error"
pub const MATH_VALIDATION_ERROR: &str = "LLM returned an empty or explicit error message.";

/// Validation detail for empty chat messages
pub const MESSAGE_CANNOT_BE_EMPTY: &str = "Message cannot be empty.";
