//! Button interactions and DM prompts.
//!
//! Every branch here is a request boundary: failures are logged and turned
//! into an ephemeral reply to the actor, never propagated to other in-flight
//! events.

use crate::bot::BotData;
use crate::errors::{Error, Result};
use crate::tickets::{COLOR_DANGER, COLOR_PROMPT, TicketAction};
use poise::serenity_prelude as serenity;
use tracing::{info, warn};

/// Routes raw gateway events the slash-command framework doesn't cover.
pub async fn handle_event(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, BotData, Error>,
    data: &BotData,
) -> Result<()> {
    match event {
        serenity::FullEvent::Ready { data_about_bot } => {
            info!("GC ticket bot is online as {}", data_about_bot.user.tag());
        }
        serenity::FullEvent::InteractionCreate {
            interaction: serenity::Interaction::Component(component),
        } => {
            handle_component(ctx, component, data).await;
        }
        serenity::FullEvent::Message { new_message } => {
            handle_direct_message(ctx, new_message, data).await;
        }
        _ => {}
    }
    Ok(())
}

/// Handles the Close/Confirm buttons on ticket summary messages.
async fn handle_component(
    ctx: &serenity::Context,
    component: &serenity::ComponentInteraction,
    data: &BotData,
) {
    // Ids that don't decode to one of our actions belong to someone else
    let Some(action) = TicketAction::parse(&component.data.custom_id) else {
        return;
    };

    let permitted = match component.member.as_ref() {
        Some(member) => data.service.has_staff_privilege(member).await,
        None => false,
    };
    if !permitted {
        let description = match action {
            TicketAction::Close { .. } => {
                "You do not have permission to close tickets. \
                 Only staff members with admin role can close tickets."
            }
            TicketAction::Confirm { .. } => {
                "You do not have permission to confirm transactions. \
                 Only staff members with admin role can process deposits and withdrawals."
            }
        };
        let embed = serenity::CreateEmbed::new()
            .colour(COLOR_DANGER)
            .title("Permission denied")
            .description(description)
            .timestamp(serenity::Timestamp::now());
        respond_embed(ctx, component, embed).await;
        return;
    }

    let outcome = match action {
        TicketAction::Close { channel_id } => data
            .service
            .close_ticket(channel_id)
            .await
            .map(|()| "Ticket closed successfully".to_string()),
        TicketAction::Confirm {
            ticket_type,
            channel_id,
            amount,
        } => data
            .service
            .confirm_ticket(channel_id, ticket_type, amount)
            .await
            .map(|confirmed| format!("{} confirmed successfully", confirmed.ticket_type)),
    };

    match outcome {
        Ok(content) => respond_text(ctx, component, content).await,
        Err(error) => {
            warn!(
                "Ticket action {:?} by {} failed: {error}",
                component.data.custom_id, component.user.id
            );
            respond_text(ctx, component, actor_facing_message(&error)).await;
        }
    }
}

/// What the acting staff member sees when an action fails. Domain errors
/// carry caller-safe display strings; collaborator failures collapse to a
/// generic notice.
fn actor_facing_message(error: &Error) -> String {
    match error {
        Error::Database(_)
        | Error::Discord(_)
        | Error::Io(_)
        | Error::EnvVar(_)
        | Error::Config { .. } => "An internal error occurred while processing this ticket.".to_string(),
        other => other.to_string(),
    }
}

async fn respond_text(
    ctx: &serenity::Context,
    component: &serenity::ComponentInteraction,
    content: String,
) {
    let response = serenity::CreateInteractionResponse::Message(
        serenity::CreateInteractionResponseMessage::new()
            .content(content)
            .ephemeral(true),
    );
    if let Err(e) = component.create_response(&ctx.http, response).await {
        warn!("Failed to respond to interaction: {e}");
    }
}

async fn respond_embed(
    ctx: &serenity::Context,
    component: &serenity::ComponentInteraction,
    embed: serenity::CreateEmbed,
) {
    let response = serenity::CreateInteractionResponse::Message(
        serenity::CreateInteractionResponseMessage::new()
            .embed(embed)
            .ephemeral(true),
    );
    if let Err(e) = component.create_response(&ctx.http, response).await {
        warn!("Failed to respond to interaction: {e}");
    }
}

/// Points DM users at the website; tickets are never opened from DMs.
async fn handle_direct_message(
    ctx: &serenity::Context,
    message: &serenity::Message,
    data: &BotData,
) {
    if message.author.bot || message.guild_id.is_some() {
        return;
    }

    let content = message.content.to_lowercase();
    let mentions_ticket = ["withdraw", "deposit", "support"]
        .iter()
        .any(|keyword| content.contains(keyword));
    if !mentions_ticket {
        return;
    }

    let mut embed = serenity::CreateEmbed::new()
        .colour(COLOR_PROMPT)
        .title("GC support")
        .description(
            "Please use the website to create support tickets. \
             This bot only handles automated ticket creation.",
        )
        .footer(serenity::CreateEmbedFooter::new("GC support system"));
    if let Some(url) = &data.service.config().website_url {
        embed = embed
            .field("Website", url.as_str(), true)
            .field("Support", "Use the website buttons to create tickets", true);
    }

    if let Err(e) = message
        .channel_id
        .send_message(&ctx.http, serenity::CreateMessage::new().embed(embed))
        .await
    {
        warn!("Failed to send DM prompt: {e}");
    }
}
