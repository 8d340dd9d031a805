//! User entity - The community accounts this bot reads but never creates.
//!
//! Rows are inserted by the website's registration flow; the bot only resolves
//! a Discord identity to its internal account and reads `role_id` for the
//! database half of the staff-privilege gate.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Internal account identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Linked Discord user ID (snowflake, stored as text)
    #[sea_orm(unique)]
    pub discord_id: String,
    /// Role identifier; `3` is the staff sentinel
    pub role_id: i64,
}

/// Defines relationships between User and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One user has many support tickets
    #[sea_orm(has_many = "super::ticket::Entity")]
    Tickets,
    /// One user has at most one balance row
    #[sea_orm(has_one = "super::balance::Entity")]
    Balance,
    /// One user has many ledger entries
    #[sea_orm(has_many = "super::gc_transaction::Entity")]
    GcTransactions,
}

impl Related<super::ticket::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tickets.def()
    }
}

impl Related<super::balance::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Balance.def()
    }
}

impl Related<super::gc_transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GcTransactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
