//! Ticket entity - One row per support/deposit/withdraw workflow instance.
//!
//! Each ticket is tied to a private Discord channel and moves through the
//! lifecycle `pending` -> `approved`/`completed` -> `closed`. Tickets are
//! soft-closed, never deleted.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Support ticket database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "support_tickets")]
pub struct Model {
    /// Unique identifier for the ticket
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Internal ID of the owning user
    pub user_id: i64,
    /// Ticket type: `"support"`, `"deposit"`, or `"withdraw"`
    pub ticket_type: String,
    /// Requested GC amount; present only for deposit/withdraw tickets
    pub amount: Option<f64>,
    /// Free-text description provided by the requester
    pub description: String,
    /// Lifecycle status: `"pending"`, `"approved"`, `"completed"`, or `"closed"`
    pub status: String,
    /// Discord channel provisioned for this ticket
    pub discord_channel_id: String,
    /// When the ticket was opened
    pub created_at: DateTimeUtc,
    /// When the website approved the ticket (set externally, read here)
    pub approved_at: Option<DateTimeUtc>,
    /// When a staff member confirmed the transaction
    pub completed_at: Option<DateTimeUtc>,
    /// When the ticket was closed
    pub closed_at: Option<DateTimeUtc>,
    /// Amount actually processed on confirmation
    pub processed_amount: Option<f64>,
}

/// Defines relationships between Ticket and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each ticket belongs to one user
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
