//! General Discord commands.
//!
//! Currently just `checkuser`, which the staff use to verify whether a
//! website-supplied Discord ID actually belongs to a member of the server.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        core::user::is_valid_discord_id,
        errors::{Error, Result},
        tickets::{COLOR_DANGER, COLOR_SUCCESS},
    };
    use poise::serenity_prelude as serenity;

    /// Checks whether a user ID belongs to a current member of the server.
    ///
    /// Replies privately with the membership status. Both an unknown ID and a
    /// platform failure report "not in server"; membership is fail-closed
    /// everywhere in this bot.
    #[poise::command(slash_command)]
    pub async fn checkuser(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "The Discord user ID to check"] userid: String,
    ) -> Result<()> {
        let userid = userid.trim();

        let Some(user_id) = parse_discord_id(userid) else {
            ctx.send(
                poise::CreateReply::default()
                    .content("❌ Invalid user ID format (expected 17-19 digits)")
                    .ephemeral(true),
            )
            .await?;
            return Ok(());
        };

        let in_server = ctx.data().service.is_member(user_id).await;

        let embed = serenity::CreateEmbed::new()
            .colour(if in_server { COLOR_SUCCESS } else { COLOR_DANGER })
            .title("User server status")
            .field("User ID", userid, true)
            .field("In server", if in_server { "Yes" } else { "No" }, true)
            .timestamp(serenity::Timestamp::now());

        ctx.send(poise::CreateReply::default().embed(embed).ephemeral(true))
            .await?;
        Ok(())
    }

    fn parse_discord_id(value: &str) -> Option<serenity::UserId> {
        if !is_valid_discord_id(value) {
            return None;
        }
        value.parse::<u64>().ok().map(serenity::UserId::new)
    }
}

// Re-export all commands
pub use inner::*;
