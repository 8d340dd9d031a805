//! Balance entity - Current GC balance, one row per user.
//!
//! A user with no row has an implicit balance of zero; the first confirmed
//! deposit creates the row. Mutated only by confirmed deposit/withdraw
//! tickets.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// GC balance database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "gc_balances")]
pub struct Model {
    /// Internal ID of the owning user
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: i64,
    /// Current GC balance
    pub balance: f64,
}

/// Defines relationships between Balance and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each balance row belongs to one user
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
