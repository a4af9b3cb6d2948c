//! Switchyard Core - Routing and Dispatch Workflow
//!
//! This crate implements the chat workflow behind Switchyard:
//! - Router: LLM classifier with a suspicious-content pre-filter
//! - Agents: math solver, knowledge query, response converter
//! - Dispatcher: decision-to-handler table with uniform failure containment
//! - Orchestrator: route, process, convert, persist, respond
//! - Memory: conversation history (Redis or in-memory)
//! - Security: suspicious patterns and input sanitization

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod agents;
pub mod dispatcher;
pub mod error;
pub mod logging;
pub mod memory;
pub mod messages;
pub mod orchestrator;
pub mod prompts;
pub mod security;
pub mod types;

pub use agents::{
    KnowledgeAnswer, KnowledgeEngine, KnowledgeEngineProvider, MathSolver, RemoteEngineLoader,
    ResponseConverter, Router,
};
pub use dispatcher::{DispatchContext, Dispatcher};
pub use error::{
    format_error_for_cli, AgentError, Error, KnowledgeError, MathError, Result, StoreError,
    UserFriendlyError,
};
pub use memory::{ConversationStore, MemoryConversationStore, RedisConversationStore};
pub use orchestrator::ChatOrchestrator;
pub use security::{SuspiciousFilter, SuspiciousFilterConfig};
pub use types::{
    ChatRequest, ChatResponse, ConversationHistory, ConversationRecord, Decision,
    UserConversations, WorkflowStep,
};
