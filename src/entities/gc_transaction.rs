//! Transaction ledger entity - Immutable record of every balance mutation.
//!
//! Append-only; exactly one row is written per confirmed deposit/withdraw
//! ticket, carrying the balance before and after the mutation.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// GC ledger entry database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "gc_transactions")]
pub struct Model {
    /// Unique identifier for the ledger entry
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Internal ID of the affected user
    pub user_id: i64,
    /// Direction of the mutation: `"deposit"` or `"withdrawal"`
    pub transaction_type: String,
    /// GC amount moved
    pub amount: f64,
    /// Balance before the mutation
    pub balance_before: f64,
    /// Balance after the mutation
    pub balance_after: f64,
    /// Human-readable description of the mutation
    pub description: String,
    /// When the mutation happened
    pub created_at: DateTimeUtc,
}

/// Defines relationships between ledger entries and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each ledger entry belongs to one user
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
