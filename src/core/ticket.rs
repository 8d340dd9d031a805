//! Ticket lifecycle logic - the persisted side of the ticket workflow.
//!
//! Tickets move `pending` -> `approved`/`completed` -> `closed`; support
//! tickets skip the confirm step and close directly. The `approved` status is
//! written by the website and only read here. State transitions check the
//! current status first, so a control activated twice reports
//! `TicketAlreadyProcessed` instead of mutating again.

use crate::{
    entities::{Ticket, ticket},
    errors::{Error, Result},
};
use sea_orm::{PaginatorTrait, QueryOrder, Set, prelude::*};

/// The closed set of ticket types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketType {
    /// Free-form support request; no money involved
    Support,
    /// Request to add GC to the user's balance
    Deposit,
    /// Request to pay GC out of the user's balance
    Withdraw,
}

impl TicketType {
    /// Parses a ticket type from its wire/database string.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "support" => Some(Self::Support),
            "deposit" => Some(Self::Deposit),
            "withdraw" => Some(Self::Withdraw),
            _ => None,
        }
    }

    /// The database/wire string for this type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Support => "support",
            Self::Deposit => "deposit",
            Self::Withdraw => "withdraw",
        }
    }

    /// Whether this ticket type carries a GC amount.
    #[must_use]
    pub const fn is_monetary(self) -> bool {
        matches!(self, Self::Deposit | Self::Withdraw)
    }
}

impl std::fmt::Display for TicketType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ticket lifecycle statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketStatus {
    /// Awaiting staff action
    Pending,
    /// Approved by the website, not yet processed
    Approved,
    /// Monetary ticket confirmed and balance adjusted
    Completed,
    /// Ticket closed; channel scheduled for deletion
    Closed,
}

impl TicketStatus {
    /// Parses a status from its database string.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "completed" => Some(Self::Completed),
            "closed" => Some(Self::Closed),
            _ => None,
        }
    }

    /// The database string for this status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Completed => "completed",
            Self::Closed => "closed",
        }
    }

    /// Whether a ticket in this status still counts against the
    /// one-open-ticket-per-type invariant.
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Pending | Self::Approved)
    }
}

/// Statuses that block a new ticket of the same type.
const OPEN_STATUSES: [&str; 2] = [
    TicketStatus::Pending.as_str(),
    TicketStatus::Approved.as_str(),
];

/// Checks whether the user already has an open ticket of the given type.
///
/// "Open" means `pending` or `approved`; completed and closed tickets never
/// block a new request.
pub async fn has_open_ticket(
    db: &DatabaseConnection,
    user_id: i64,
    ticket_type: TicketType,
) -> Result<bool> {
    let count = Ticket::find()
        .filter(ticket::Column::UserId.eq(user_id))
        .filter(ticket::Column::TicketType.eq(ticket_type.as_str()))
        .filter(ticket::Column::Status.is_in(OPEN_STATUSES))
        .count(db)
        .await?;
    Ok(count > 0)
}

/// Inserts a new ticket row with status `pending`.
///
/// The channel must already exist; its ID is stored so later button
/// interactions can find the ticket again.
pub async fn create_ticket(
    db: &DatabaseConnection,
    user_id: i64,
    ticket_type: TicketType,
    amount: Option<f64>,
    description: String,
    discord_channel_id: String,
) -> Result<ticket::Model> {
    let ticket = ticket::ActiveModel {
        user_id: Set(user_id),
        ticket_type: Set(ticket_type.as_str().to_string()),
        amount: Set(amount),
        description: Set(description),
        status: Set(TicketStatus::Pending.as_str().to_string()),
        discord_channel_id: Set(discord_channel_id),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    ticket.insert(db).await.map_err(Into::into)
}

/// Finds the most recent ticket bound to a Discord channel.
pub async fn get_ticket_by_channel(
    db: &DatabaseConnection,
    channel_id: &str,
) -> Result<Option<ticket::Model>> {
    Ticket::find()
        .filter(ticket::Column::DiscordChannelId.eq(channel_id))
        .order_by_desc(ticket::Column::CreatedAt)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Marks the ticket for a channel as `closed` and stamps `closed_at`.
///
/// Closing is guarded: a ticket already closed reports
/// [`Error::TicketAlreadyProcessed`] so the caller never posts a second
/// closing notice. The update itself is conditional on the status to keep a
/// concurrent double-activation from slipping through the read-check window.
pub async fn close_ticket(db: &DatabaseConnection, channel_id: &str) -> Result<ticket::Model> {
    use sea_orm::sea_query::Expr;

    let ticket = get_ticket_by_channel(db, channel_id)
        .await?
        .ok_or_else(|| Error::TicketNotFound {
            channel_id: channel_id.to_string(),
        })?;

    if ticket.status == TicketStatus::Closed.as_str() {
        return Err(Error::TicketAlreadyProcessed {
            status: ticket.status,
        });
    }

    let updated = Ticket::update_many()
        .col_expr(
            ticket::Column::Status,
            Expr::value(TicketStatus::Closed.as_str()),
        )
        .col_expr(ticket::Column::ClosedAt, Expr::value(chrono::Utc::now()))
        .filter(ticket::Column::Id.eq(ticket.id))
        .filter(ticket::Column::Status.ne(TicketStatus::Closed.as_str()))
        .exec(db)
        .await?;

    if updated.rows_affected == 0 {
        return Err(Error::TicketAlreadyProcessed {
            status: TicketStatus::Closed.as_str().to_string(),
        });
    }

    Ticket::find_by_id(ticket.id)
        .one(db)
        .await?
        .ok_or_else(|| Error::TicketNotFound {
            channel_id: channel_id.to_string(),
        })
}

/// Marks an open ticket as `completed`, recording the processed amount.
///
/// Only `pending`/`approved` tickets can complete; anything else reports
/// [`Error::TicketAlreadyProcessed`]. The conditional update doubles as a
/// guard against two staff members confirming in the same instant.
pub async fn complete_ticket(
    db: &DatabaseConnection,
    channel_id: &str,
    processed_amount: f64,
) -> Result<ticket::Model> {
    use sea_orm::sea_query::Expr;

    let ticket = get_ticket_by_channel(db, channel_id)
        .await?
        .ok_or_else(|| Error::TicketNotFound {
            channel_id: channel_id.to_string(),
        })?;

    let is_open = TicketStatus::parse(&ticket.status).is_some_and(TicketStatus::is_open);
    if !is_open {
        return Err(Error::TicketAlreadyProcessed {
            status: ticket.status,
        });
    }

    let updated = Ticket::update_many()
        .col_expr(
            ticket::Column::Status,
            Expr::value(TicketStatus::Completed.as_str()),
        )
        .col_expr(ticket::Column::CompletedAt, Expr::value(chrono::Utc::now()))
        .col_expr(ticket::Column::ProcessedAmount, Expr::value(processed_amount))
        .filter(ticket::Column::Id.eq(ticket.id))
        .filter(ticket::Column::Status.is_in(OPEN_STATUSES))
        .exec(db)
        .await?;

    if updated.rows_affected == 0 {
        return Err(Error::TicketAlreadyProcessed {
            status: TicketStatus::Completed.as_str().to_string(),
        });
    }

    Ticket::find_by_id(ticket.id)
        .one(db)
        .await?
        .ok_or_else(|| Error::TicketNotFound {
            channel_id: channel_id.to_string(),
        })
}
