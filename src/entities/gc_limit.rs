//! Limit configuration entity - Per-type deposit/withdraw amount bounds.
//!
//! Edited by the website; this bot only reads it. When the table is empty or
//! unreadable the hardcoded 50-500 default range applies.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// GC limit database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "gc_limits")]
pub struct Model {
    /// Limit type this row configures: `"deposit"` or `"withdraw"`
    #[sea_orm(primary_key, auto_increment = false)]
    pub limit_type: String,
    /// Minimum allowed amount (inclusive)
    pub min_amount: f64,
    /// Maximum allowed amount (inclusive)
    pub max_amount: f64,
}

/// No relationships; limits are standalone configuration rows
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
