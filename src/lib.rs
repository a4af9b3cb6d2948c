//! Switchyard - chat routing service
//!
//! HTTP transport, configuration and CLI around `switchyard-core`.

#![forbid(unsafe_code)]

pub mod api;
pub mod cli;
pub mod server;

pub use api::api_router;
