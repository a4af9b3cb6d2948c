//! Switchyard LLM - LLM Provider Abstraction
//!
//! This crate provides the language-model capability used by the agents:
//! - Provider: the `LlmProvider` trait every backend implements
//! - OpenAI: chat completions through async-openai (works with any
//!   OpenAI-compatible gateway via a custom base URL)
//! - Mock: a scripted provider for tests
//! - Client: `LlmClient::ask(message, system_prompt)`, the single call the
//!   routing workflow needs

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod client;
pub mod completion;
pub mod error;
pub mod message;
pub mod mock;
pub mod openai;
pub mod provider;
pub mod util;

pub use client::LlmClient;
pub use completion::{CompletionRequest, CompletionResponse, TokenUsage};
pub use error::{Error, Result};
pub use message::{Message, MessageRole};
pub use mock::{MockProvider, MockReply};
pub use openai::{OpenAiConfig, OpenAiProvider};
pub use provider::LlmProvider;
