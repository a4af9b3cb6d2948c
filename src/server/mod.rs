//! Server module for Switchyard
//!
//! Contains the main server initialization and runtime logic.
//!
//! # Module Structure
//!
//! - `config`: Configuration structures for all server components
//! - `loader`: Configuration loading from files and environment
//! - `validation`: Production configuration validation
//! - `init`: Service construction and the HTTP run loop

pub mod config;
mod init;
mod loader;
mod validation;

// Re-export public API
pub use init::{build_orchestrator, build_store, run};
pub use loader::{load_config, DEFAULT_CONFIG};
pub use validation::{production_warnings, validate_production_config};
