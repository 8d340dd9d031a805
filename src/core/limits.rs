//! Deposit/withdraw amount limits.
//!
//! The website edits the `gc_limits` table; the bot reads it on every ticket
//! request so changes apply without a restart. When the table is empty or the
//! read fails, the hardcoded 50-500 GC range applies - limit lookup is never
//! a reason to refuse service.

use crate::core::ticket::TicketType;
use crate::entities::GcLimit;
use sea_orm::{DatabaseConnection, EntityTrait};
use tracing::{debug, warn};

/// Default minimum amount when no row configures a type.
pub const DEFAULT_MIN_AMOUNT: f64 = 50.0;
/// Default maximum amount when no row configures a type.
pub const DEFAULT_MAX_AMOUNT: f64 = 500.0;

/// An inclusive amount range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmountRange {
    /// Minimum allowed amount (inclusive)
    pub min: f64,
    /// Maximum allowed amount (inclusive)
    pub max: f64,
}

impl AmountRange {
    /// Whether the amount lies within the range, bounds included.
    #[must_use]
    pub fn contains(&self, amount: f64) -> bool {
        amount >= self.min && amount <= self.max
    }
}

impl Default for AmountRange {
    fn default() -> Self {
        Self {
            min: DEFAULT_MIN_AMOUNT,
            max: DEFAULT_MAX_AMOUNT,
        }
    }
}

/// The per-type amount limits currently in effect.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GcLimits {
    /// Bounds for deposit tickets
    pub deposit: AmountRange,
    /// Bounds for withdraw tickets
    pub withdraw: AmountRange,
}

impl GcLimits {
    /// The range that applies to a ticket type; `None` for support tickets.
    #[must_use]
    pub fn range_for(&self, ticket_type: TicketType) -> Option<&AmountRange> {
        match ticket_type {
            TicketType::Deposit => Some(&self.deposit),
            TicketType::Withdraw => Some(&self.withdraw),
            TicketType::Support => None,
        }
    }
}

/// Loads the configured limits, falling back to the defaults on any failure.
pub async fn load_limits(db: &DatabaseConnection) -> GcLimits {
    let rows = match GcLimit::find().all(db).await {
        Ok(rows) => rows,
        Err(e) => {
            warn!("Failed to load GC limits, using defaults: {e}");
            return GcLimits::default();
        }
    };

    let mut limits = GcLimits::default();
    for row in rows {
        let range = AmountRange {
            min: row.min_amount,
            max: row.max_amount,
        };
        match row.limit_type.as_str() {
            "deposit" => limits.deposit = range,
            "withdraw" => limits.withdraw = range,
            other => debug!("Ignoring unknown limit type: {other}"),
        }
    }
    limits
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn test_range_bounds_are_inclusive() {
        let range = AmountRange::default();
        assert!(range.contains(50.0));
        assert!(range.contains(500.0));
        assert!(range.contains(250.0));
        assert!(!range.contains(49.99));
        assert!(!range.contains(500.01));
    }

    #[test]
    fn test_support_has_no_range() {
        let limits = GcLimits::default();
        assert!(limits.range_for(TicketType::Support).is_none());
        assert!(limits.range_for(TicketType::Deposit).is_some());
    }

    #[tokio::test]
    async fn test_empty_table_yields_defaults() -> crate::errors::Result<()> {
        let db = setup_test_db().await?;
        let limits = load_limits(&db).await;
        assert_eq!(limits, GcLimits::default());
        Ok(())
    }

    #[tokio::test]
    async fn test_row_overrides_only_its_type() -> crate::errors::Result<()> {
        let db = setup_test_db().await?;
        set_limit(&db, "deposit", 10.0, 1000.0).await?;

        let limits = load_limits(&db).await;
        assert_eq!(limits.deposit.min, 10.0);
        assert_eq!(limits.deposit.max, 1000.0);
        assert_eq!(limits.withdraw, AmountRange::default());
        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_limit_type_is_ignored() -> crate::errors::Result<()> {
        let db = setup_test_db().await?;
        set_limit(&db, "transfer", 1.0, 2.0).await?;

        let limits = load_limits(&db).await;
        assert_eq!(limits, GcLimits::default());
        Ok(())
    }
}
