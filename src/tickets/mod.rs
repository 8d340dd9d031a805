//! Ticket orchestration - the workflow between Discord and the database.
//!
//! [`TicketService`] owns the injected collaborator handles (Discord HTTP
//! client, database connection, configuration) and implements the ticket
//! lifecycle on top of the `core` modules: opening a ticket provisions a
//! private channel and persists the row, confirming moves GC and appends to
//! the ledger, closing posts a notice and schedules channel deletion. Both
//! the bot event handlers and the HTTP façade drive this one service.

/// Typed button actions carried in component custom-ids
pub mod action;

pub use action::TicketAction;

use crate::config::AppConfig;
use crate::core::{
    balance::{self, TransactionKind},
    limits,
    ticket::{self, TicketStatus, TicketType},
    user,
};
use crate::errors::{Error, Result};
use poise::serenity_prelude as serenity;
use rand::Rng;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Embed colour for withdraw tickets, denials, and closing notices.
pub const COLOR_DANGER: u32 = 0x00FF_6B6B;
/// Embed colour for deposit tickets and confirmations.
pub const COLOR_SUCCESS: u32 = 0x004E_CDC4;
/// Embed colour for support tickets.
pub const COLOR_SUPPORT: u32 = 0x0045_B7D1;
/// Embed colour for the DM website prompt.
pub const COLOR_PROMPT: u32 = 0x00FF_D700;

/// How long the closing notice stays readable before the channel is deleted.
const CHANNEL_DELETE_DELAY: Duration = Duration::from_secs(10);

/// Result of successfully opening a ticket.
#[derive(Debug, Clone)]
pub struct OpenedTicket {
    /// The provisioned private channel
    pub channel_id: serenity::ChannelId,
    /// The channel's generated name, e.g. `deposit-x4k2p9`
    pub channel_name: String,
}

/// Result of successfully confirming a monetary ticket.
#[derive(Debug, Clone)]
pub struct ConfirmedTransaction {
    /// Discord ID of the ticket owner
    pub discord_id: String,
    /// The confirmed ticket type (`Deposit` or `Withdraw`)
    pub ticket_type: TicketType,
    /// Amount that was processed
    pub amount: f64,
    /// The owner's balance after the mutation
    pub new_balance: f64,
}

/// The ticket workflow service.
///
/// Constructed once at startup with explicit collaborator handles and shared
/// via `Arc` with the bot and the HTTP façade; there is no global client
/// state anywhere in the crate.
pub struct TicketService {
    http: Arc<serenity::Http>,
    db: DatabaseConnection,
    config: Arc<AppConfig>,
}

impl TicketService {
    /// Creates the service from its collaborator handles.
    #[must_use]
    pub const fn new(
        http: Arc<serenity::Http>,
        db: DatabaseConnection,
        config: Arc<AppConfig>,
    ) -> Self {
        Self { http, db, config }
    }

    /// The database handle, for callers that need read-only lookups.
    #[must_use]
    pub const fn database(&self) -> &DatabaseConnection {
        &self.db
    }

    /// The application configuration.
    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Whether the Discord identity is currently a member of the configured
    /// guild. Identity-not-found and platform-unreachable both resolve to
    /// `false`; membership is always fail-closed.
    pub async fn is_member(&self, user_id: serenity::UserId) -> bool {
        let guild = serenity::GuildId::new(self.config.guild_id);
        match guild.member(&self.http, user_id).await {
            Ok(_) => true,
            Err(e) => {
                debug!("Member lookup for {user_id} resolved to not-in-server: {e}");
                false
            }
        }
    }

    /// The dual staff gate: the member must carry the configured staff role
    /// (or the Administrator permission) on Discord AND have the staff role
    /// in the users table. Both halves must independently pass; a failed
    /// database lookup counts as not-staff.
    pub async fn has_staff_privilege(&self, member: &serenity::Member) -> bool {
        let staff_role = serenity::RoleId::new(self.config.admin_role_id);
        let discord_side = member.roles.contains(&staff_role)
            || member.permissions.is_some_and(|p| p.administrator());
        if !discord_side {
            return false;
        }

        match user::has_staff_role(&self.db, &member.user.id.to_string()).await {
            Ok(database_side) => database_side,
            Err(e) => {
                warn!("Staff role lookup failed for {}: {e}", member.user.id);
                false
            }
        }
    }

    /// Opens a ticket: validates the request, provisions a private channel
    /// with the summary embed and staff controls, and persists the row.
    ///
    /// Local checks (amount bounds, linked account, duplicate open ticket)
    /// run before the guild round-trip, so most rejections never touch
    /// Discord.
    ///
    /// # Errors
    /// * [`Error::Validation`] - monetary ticket without an amount
    /// * [`Error::AmountOutOfRange`] - amount outside the configured limits
    /// * [`Error::UserNotFound`] - Discord identity has no linked account
    /// * [`Error::DuplicateOpenTicket`] - open ticket of the same type exists
    /// * [`Error::NotAMember`] - identity is not in the guild
    #[instrument(skip(self, description))]
    pub async fn open_ticket(
        &self,
        user_id: serenity::UserId,
        ticket_type: TicketType,
        amount: Option<f64>,
        description: &str,
    ) -> Result<OpenedTicket> {
        let amount = if ticket_type.is_monetary() {
            let amount = amount.ok_or_else(|| Error::Validation {
                message: format!("An amount is required for {ticket_type} tickets"),
            })?;
            let limits = limits::load_limits(&self.db).await;
            if let Some(range) = limits.range_for(ticket_type) {
                if !range.contains(amount) {
                    return Err(Error::AmountOutOfRange {
                        amount,
                        min: range.min,
                        max: range.max,
                    });
                }
            }
            Some(amount)
        } else {
            None
        };

        let account = user::get_user_by_discord_id(&self.db, &user_id.to_string())
            .await?
            .ok_or_else(|| Error::UserNotFound {
                discord_id: user_id.to_string(),
            })?;

        if ticket::has_open_ticket(&self.db, account.id, ticket_type).await? {
            return Err(Error::DuplicateOpenTicket {
                ticket_type: ticket_type.as_str().to_string(),
            });
        }

        if !self.is_member(user_id).await {
            return Err(Error::NotAMember);
        }

        let channel_name = format!("{ticket_type}-{}", channel_suffix());
        let guild = serenity::GuildId::new(self.config.guild_id);

        let mut builder = serenity::CreateChannel::new(channel_name.as_str())
            .kind(serenity::ChannelType::Text)
            .permissions(self.channel_overwrites(guild, user_id));
        if let Some(category) = self.category_for(ticket_type) {
            builder = builder.category(category);
        }
        let channel = guild.create_channel(&self.http, builder).await?;

        let message = serenity::CreateMessage::new()
            .embed(ticket_embed(user_id, ticket_type, amount, description))
            .components(vec![serenity::CreateActionRow::Buttons(ticket_buttons(
                ticket_type,
                channel.id,
                amount,
            ))]);
        channel.id.send_message(&self.http, message).await?;

        ticket::create_ticket(
            &self.db,
            account.id,
            ticket_type,
            amount,
            description.to_string(),
            channel.id.to_string(),
        )
        .await?;

        info!("Created {ticket_type} ticket {channel_name} for user {user_id}");
        Ok(OpenedTicket {
            channel_id: channel.id,
            channel_name,
        })
    }

    /// Confirms the monetary ticket bound to a channel: mutates the owner's
    /// balance, appends the ledger entry, marks the ticket completed, and
    /// posts the confirmation embed.
    ///
    /// The persisted ticket row is the source of truth; the amount carried in
    /// the button payload is only cross-checked against it. The status guard
    /// runs before anything mutates, so a double-activated control reports
    /// [`Error::TicketAlreadyProcessed`] instead of processing twice.
    #[instrument(skip(self))]
    pub async fn confirm_ticket(
        &self,
        channel_id: serenity::ChannelId,
        ticket_type: TicketType,
        amount: f64,
    ) -> Result<ConfirmedTransaction> {
        let channel_key = channel_id.to_string();
        let ticket_row = ticket::get_ticket_by_channel(&self.db, &channel_key)
            .await?
            .ok_or_else(|| Error::TicketNotFound {
                channel_id: channel_key.clone(),
            })?;

        if !TicketStatus::parse(&ticket_row.status).is_some_and(TicketStatus::is_open) {
            return Err(Error::TicketAlreadyProcessed {
                status: ticket_row.status,
            });
        }

        if ticket_row.ticket_type != ticket_type.as_str() {
            return Err(Error::Validation {
                message: "Transaction type does not match the ticket".to_string(),
            });
        }

        let recorded = ticket_row.amount.ok_or_else(|| Error::Validation {
            message: "Ticket has no amount recorded".to_string(),
        })?;
        if (recorded - amount).abs() > f64::EPSILON {
            warn!(
                "Confirm control carried {amount} GC but ticket {} recorded {recorded} GC",
                ticket_row.id
            );
            return Err(Error::Validation {
                message: "Transaction amount does not match the ticket".to_string(),
            });
        }

        let account = user::get_user_by_id(&self.db, ticket_row.user_id)
            .await?
            .ok_or_else(|| Error::UserNotFound {
                discord_id: ticket_row.user_id.to_string(),
            })?;

        let (kind, ledger_description) = match ticket_type {
            TicketType::Deposit => (TransactionKind::Deposit, "Deposit via Discord ticket"),
            TicketType::Withdraw => (TransactionKind::Withdrawal, "Withdraw via Discord ticket"),
            TicketType::Support => {
                return Err(Error::Validation {
                    message: "Support tickets have no transaction to confirm".to_string(),
                });
            }
        };

        let entry = balance::record_transaction(
            &self.db,
            account.id,
            kind,
            recorded,
            ledger_description.to_string(),
        )
        .await?;
        ticket::complete_ticket(&self.db, &channel_key, recorded).await?;

        let confirmed = ConfirmedTransaction {
            discord_id: account.discord_id,
            ticket_type,
            amount: recorded,
            new_balance: entry.balance_after,
        };

        let embed = confirmation_embed(&confirmed);
        if let Err(e) = channel_id
            .send_message(&self.http, serenity::CreateMessage::new().embed(embed))
            .await
        {
            warn!("Failed to post confirmation to channel {channel_id}: {e}");
        }

        info!(
            "Confirmed {ticket_type} of {recorded} GC for user {} (new balance {})",
            confirmed.discord_id, confirmed.new_balance
        );
        Ok(confirmed)
    }

    /// Closes the ticket bound to a channel: marks the row closed, posts the
    /// closing notice, and schedules channel deletion after a short delay so
    /// participants can read it. Deletion failure is logged, not retried.
    #[instrument(skip(self))]
    pub async fn close_ticket(&self, channel_id: serenity::ChannelId) -> Result<()> {
        let closed = ticket::close_ticket(&self.db, &channel_id.to_string()).await?;
        info!("Closed {} ticket for channel {channel_id}", closed.ticket_type);

        let embed = serenity::CreateEmbed::new()
            .colour(COLOR_DANGER)
            .title("Ticket closed")
            .description("This ticket has been closed by staff.")
            .timestamp(serenity::Timestamp::now());
        if let Err(e) = channel_id
            .send_message(&self.http, serenity::CreateMessage::new().embed(embed))
            .await
        {
            warn!("Failed to post closing notice to channel {channel_id}: {e}");
        }

        // Fire-and-forget; nothing re-schedules this if the process restarts.
        let http = Arc::clone(&self.http);
        tokio::spawn(async move {
            tokio::time::sleep(CHANNEL_DELETE_DELAY).await;
            match channel_id.delete(&http).await {
                Ok(_) => info!("Deleted ticket channel {channel_id}"),
                Err(e) => warn!("Failed to delete ticket channel {channel_id}: {e}"),
            }
        });

        Ok(())
    }

    fn category_for(&self, ticket_type: TicketType) -> Option<serenity::ChannelId> {
        let id = match ticket_type {
            TicketType::Support => self.config.support_category_id,
            TicketType::Deposit | TicketType::Withdraw => {
                self.config.deposit_withdraw_category_id
            }
        };
        id.map(serenity::ChannelId::new)
    }

    /// Overwrites making the channel private: `@everyone` loses visibility,
    /// the requester can talk, the staff role can moderate.
    fn channel_overwrites(
        &self,
        guild: serenity::GuildId,
        user_id: serenity::UserId,
    ) -> Vec<serenity::PermissionOverwrite> {
        let participant = serenity::Permissions::VIEW_CHANNEL
            | serenity::Permissions::SEND_MESSAGES
            | serenity::Permissions::READ_MESSAGE_HISTORY;

        vec![
            serenity::PermissionOverwrite {
                allow: serenity::Permissions::empty(),
                deny: serenity::Permissions::VIEW_CHANNEL,
                kind: serenity::PermissionOverwriteType::Role(serenity::RoleId::new(guild.get())),
            },
            serenity::PermissionOverwrite {
                allow: participant,
                deny: serenity::Permissions::empty(),
                kind: serenity::PermissionOverwriteType::Member(user_id),
            },
            serenity::PermissionOverwrite {
                allow: participant | serenity::Permissions::MANAGE_MESSAGES,
                deny: serenity::Permissions::empty(),
                kind: serenity::PermissionOverwriteType::Role(serenity::RoleId::new(
                    self.config.admin_role_id,
                )),
            },
        ]
    }
}

/// Capitalized ticket type for embed titles.
const fn display_name(ticket_type: TicketType) -> &'static str {
    match ticket_type {
        TicketType::Support => "Support",
        TicketType::Deposit => "Deposit",
        TicketType::Withdraw => "Withdraw",
    }
}

const fn colour_for(ticket_type: TicketType) -> u32 {
    match ticket_type {
        TicketType::Withdraw => COLOR_DANGER,
        TicketType::Deposit => COLOR_SUCCESS,
        TicketType::Support => COLOR_SUPPORT,
    }
}

/// Six lowercase alphanumeric characters; collisions are not checked, the
/// suffix space makes them astronomically unlikely.
fn channel_suffix() -> String {
    const CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::thread_rng();
    (0..6)
        .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
        .collect()
}

fn ticket_embed(
    user_id: serenity::UserId,
    ticket_type: TicketType,
    amount: Option<f64>,
    description: &str,
) -> serenity::CreateEmbed {
    let mut embed = serenity::CreateEmbed::new()
        .colour(colour_for(ticket_type))
        .title(format!("{} request", display_name(ticket_type)))
        .description(format!("A new {ticket_type} request has been created"))
        .field("User", format!("<@{user_id}>"), true)
        .field(
            "Created",
            chrono::Utc::now().format("%Y-%m-%d %H:%M UTC").to_string(),
            true,
        );

    if let Some(amount) = amount {
        embed = embed.field("Amount", format!("{amount} GC"), true);
    }
    if !description.is_empty() {
        embed = embed.field("Description", description, false);
    }

    embed
        .footer(serenity::CreateEmbedFooter::new("GC support system"))
        .timestamp(serenity::Timestamp::now())
}

fn ticket_buttons(
    ticket_type: TicketType,
    channel_id: serenity::ChannelId,
    amount: Option<f64>,
) -> Vec<serenity::CreateButton> {
    let mut buttons = vec![
        serenity::CreateButton::new(TicketAction::Close { channel_id }.custom_id())
            .label("Close ticket")
            .style(serenity::ButtonStyle::Danger),
    ];

    if let Some(amount) = amount {
        let label = if ticket_type == TicketType::Deposit {
            "Confirm deposit"
        } else {
            "Confirm withdrawal"
        };
        buttons.push(
            serenity::CreateButton::new(
                TicketAction::Confirm {
                    ticket_type,
                    channel_id,
                    amount,
                }
                .custom_id(),
            )
            .label(label)
            .style(serenity::ButtonStyle::Success),
        );
    }

    buttons
}

fn confirmation_embed(confirmed: &ConfirmedTransaction) -> serenity::CreateEmbed {
    let verb = if confirmed.ticket_type == TicketType::Deposit {
        "Deposited"
    } else {
        "Withdrawn"
    };
    serenity::CreateEmbed::new()
        .colour(COLOR_SUCCESS)
        .title(format!("{} confirmed", display_name(confirmed.ticket_type)))
        .description(format!("{verb} {} GC", confirmed.amount))
        .field("User", format!("<@{}>", confirmed.discord_id), true)
        .field("Amount", format!("{} GC", confirmed.amount), true)
        .field("New balance", format!("{} GC", confirmed.new_balance), true)
        .timestamp(serenity::Timestamp::now())
}
