//! Bot layer - Discord-specific interface and event handlers.
//!
//! This module wires the poise framework: the `checkuser` slash command, the
//! raw event hook that routes button interactions and DM prompts, and the
//! shared context every handler receives.

/// Discord command implementations
pub mod commands;
/// Raw event handlers (button interactions, DM prompts)
pub mod handlers;

use crate::errors::{Error, Result};
use crate::tickets::TicketService;
use poise::serenity_prelude as serenity;
use std::sync::Arc;
use tracing::info;

/// Shared data available to all bot commands and event handlers.
pub struct BotData {
    /// The ticket workflow service; also holds the database and config
    pub service: Arc<TicketService>,
}

impl BotData {
    /// Creates a new `BotData` holding the shared service handle.
    #[must_use]
    pub const fn new(service: Arc<TicketService>) -> Self {
        Self { service }
    }
}

async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            panic!("Failed to start bot: {error:?}");
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            tracing::error!("Error in command `{}`: {error:?}", ctx.command().name);
            if let Err(e) = ctx.say(format!("An error occurred: {error}")).await {
                tracing::error!("Failed to send error message: {e}");
            }
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                tracing::error!("Error while handling error: {e}");
            }
        }
    }
}

/// Builds the poise framework and runs the gateway client until shutdown.
///
/// # Errors
/// Returns an error if the client cannot be created or the gateway
/// connection fails irrecoverably.
pub async fn run_bot(token: String, service: Arc<TicketService>) -> Result<()> {
    let guild_id = service.config().guild_id;

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![commands::checkuser()],
            event_handler: |ctx, event, framework, data| {
                Box::pin(handlers::handle_event(ctx, event, framework, data))
            },
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                info!("Monitoring guild: {guild_id}");
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                Ok(BotData::new(service))
            })
        })
        .build();

    let intents = serenity::GatewayIntents::GUILDS
        | serenity::GatewayIntents::GUILD_MEMBERS
        | serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::MESSAGE_CONTENT
        | serenity::GatewayIntents::DIRECT_MESSAGES;

    info!("Setting up Serenity client for Poise framework...");
    let mut client = serenity::Client::builder(&token, intents)
        .framework(framework)
        .await?;

    client.start().await?;
    Ok(())
}
