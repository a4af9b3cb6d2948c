//! CLI module for Switchyard
//!
//! Provides commands:
//! - `serve`: Start the HTTP server (default)
//! - `chat`: Run one message through the workflow and print the response
//! - `history`: Print the stored turns of a conversation

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use switchyard_core::{
    format_error_for_cli, ChatRequest, ConversationHistory, ConversationStore, Error as CoreError,
};

use crate::server::config::AppConfig;

/// Switchyard routing assistant CLI
#[derive(Parser, Debug)]
#[command(name = "switchyard")]
#[command(about = "Routes chat messages to math and knowledge agents")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the server (default)
    Serve,
    /// Send one message and print the JSON response
    Chat {
        /// Message text
        #[arg(short, long)]
        message: String,
        /// Caller identity
        #[arg(long, default_value = "cli")]
        user_id: String,
        /// Conversation id (a new one is generated when omitted)
        #[arg(long)]
        conversation_id: Option<String>,
    },
    /// Print the stored history of a conversation
    History {
        /// Conversation id
        conversation_id: String,
    },
}

/// Run the CLI command
pub async fn run(cli: Cli, config: AppConfig) -> anyhow::Result<()> {
    match cli.command {
        None | Some(Commands::Serve) => crate::server::run(config).await,
        Some(Commands::Chat {
            message,
            user_id,
            conversation_id,
        }) => {
            let conversation_id =
                conversation_id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
            chat(&config, ChatRequest::new(message, user_id, conversation_id)).await
        }
        Some(Commands::History { conversation_id }) => history(&config, &conversation_id).await,
    }
}

async fn chat(config: &AppConfig, request: ChatRequest) -> anyhow::Result<()> {
    let orchestrator = crate::server::build_orchestrator(config).await?;
    match orchestrator.chat(request).await {
        Ok(response) => print_json(&response),
        Err(e) => fail(&e),
    }
}

async fn history(config: &AppConfig, conversation_id: &str) -> anyhow::Result<()> {
    let store = crate::server::build_store(&config.redis).await?;
    match store.history(conversation_id).await {
        Ok(history) => print_json(&ConversationHistory {
            conversation_id: conversation_id.to_string(),
            message_count: history.len(),
            history,
        }),
        Err(e) => fail(&CoreError::Store(e)),
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{json}");
    Ok(())
}

fn fail(error: &CoreError) -> anyhow::Result<()> {
    eprintln!("{}", format_error_for_cli(error));
    bail!("{error}")
}
