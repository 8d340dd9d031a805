//! Balance ledger logic - the only code that mutates GC balances.
//!
//! Every mutation happens inside one database transaction together with its
//! ledger entry, so the balance and the `gc_transactions` history can never
//! disagree. Withdrawals use a guarded conditional decrement
//! (`balance = balance - ? WHERE balance >= ?`) instead of read-modify-write,
//! so a concurrent double-confirmation cannot drive a balance negative.

use crate::{
    entities::{Balance, balance, gc_transaction},
    errors::{Error, Result},
};
use sea_orm::{Set, TransactionTrait, prelude::*};

/// Direction of a balance mutation, as recorded in the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionKind {
    /// GC added to the balance
    Deposit,
    /// GC removed from the balance
    Withdrawal,
}

impl TransactionKind {
    /// The ledger string for this direction.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Deposit => "deposit",
            Self::Withdrawal => "withdrawal",
        }
    }
}

/// Returns the user's current balance, treating a missing row as zero.
pub async fn get_balance(db: &DatabaseConnection, user_id: i64) -> Result<f64> {
    Ok(Balance::find_by_id(user_id)
        .one(db)
        .await?
        .map_or(0.0, |row| row.balance))
}

/// Applies a confirmed transaction to the user's balance and appends exactly
/// one ledger entry, atomically.
///
/// For deposits the balance row is created on first use. For withdrawals the
/// decrement is conditional on sufficient balance; when the condition fails
/// nothing is mutated and [`Error::InsufficientBalance`] is returned.
///
/// # Errors
/// * [`Error::Validation`] for non-positive or non-finite amounts
/// * [`Error::InsufficientBalance`] when a withdrawal exceeds the balance
pub async fn record_transaction(
    db: &DatabaseConnection,
    user_id: i64,
    kind: TransactionKind,
    amount: f64,
    description: String,
) -> Result<gc_transaction::Model> {
    use sea_orm::sea_query::Expr;

    if !amount.is_finite() || amount <= 0.0 {
        return Err(Error::Validation {
            message: format!("Invalid transaction amount: {amount}"),
        });
    }

    // Transaction scope: balance mutation and ledger append commit together.
    let txn = db.begin().await?;

    let existing = Balance::find_by_id(user_id).one(&txn).await?;
    let balance_before = existing.as_ref().map_or(0.0, |row| row.balance);

    match kind {
        TransactionKind::Deposit => {
            if existing.is_some() {
                Balance::update_many()
                    .col_expr(
                        balance::Column::Balance,
                        Expr::col(balance::Column::Balance).add(amount),
                    )
                    .filter(balance::Column::UserId.eq(user_id))
                    .exec(&txn)
                    .await?;
            } else {
                balance::ActiveModel {
                    user_id: Set(user_id),
                    balance: Set(amount),
                }
                .insert(&txn)
                .await?;
            }
        }
        TransactionKind::Withdrawal => {
            let updated = Balance::update_many()
                .col_expr(
                    balance::Column::Balance,
                    Expr::col(balance::Column::Balance).sub(amount),
                )
                .filter(balance::Column::UserId.eq(user_id))
                .filter(balance::Column::Balance.gte(amount))
                .exec(&txn)
                .await?;

            if updated.rows_affected == 0 {
                return Err(Error::InsufficientBalance {
                    balance: balance_before,
                    requested: amount,
                });
            }
        }
    }

    let balance_after = Balance::find_by_id(user_id)
        .one(&txn)
        .await?
        .map_or(0.0, |row| row.balance);

    let entry = gc_transaction::ActiveModel {
        user_id: Set(user_id),
        transaction_type: Set(kind.as_str().to_string()),
        amount: Set(amount),
        balance_before: Set(balance_before),
        balance_after: Set(balance_after),
        description: Set(description),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    Ok(entry)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::entities::GcTransaction;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_first_deposit_creates_balance_row() -> Result<()> {
        let db = setup_test_db().await?;
        let user = create_test_user(&db, "200000000000000001", 1).await?;

        let entry = record_transaction(
            &db,
            user.id,
            TransactionKind::Deposit,
            150.0,
            "Deposit via Discord ticket".to_string(),
        )
        .await?;

        assert_eq!(entry.balance_before, 0.0);
        assert_eq!(entry.balance_after, 150.0);
        assert_eq!(entry.transaction_type, "deposit");
        assert_eq!(get_balance(&db, user.id).await?, 150.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_deposit_adds_to_existing_balance() -> Result<()> {
        let db = setup_test_db().await?;
        let user = create_test_user(&db, "200000000000000002", 1).await?;
        set_balance(&db, user.id, 100.0).await?;

        let entry =
            record_transaction(&db, user.id, TransactionKind::Deposit, 75.0, String::new())
                .await?;

        assert_eq!(entry.balance_before, 100.0);
        assert_eq!(entry.balance_after, 175.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_withdrawal_decrements_and_logs() -> Result<()> {
        let db = setup_test_db().await?;
        let user = create_test_user(&db, "200000000000000003", 1).await?;
        set_balance(&db, user.id, 300.0).await?;

        let entry = record_transaction(
            &db,
            user.id,
            TransactionKind::Withdrawal,
            120.0,
            "Withdraw via Discord ticket".to_string(),
        )
        .await?;

        assert_eq!(entry.transaction_type, "withdrawal");
        assert_eq!(entry.balance_before, 300.0);
        assert_eq!(entry.balance_after, 180.0);
        assert_eq!(get_balance(&db, user.id).await?, 180.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_insufficient_withdrawal_mutates_nothing() -> Result<()> {
        let db = setup_test_db().await?;
        let user = create_test_user(&db, "200000000000000004", 1).await?;
        set_balance(&db, user.id, 50.0).await?;

        let result =
            record_transaction(&db, user.id, TransactionKind::Withdrawal, 60.0, String::new())
                .await;

        assert!(matches!(
            result,
            Err(Error::InsufficientBalance {
                balance,
                requested,
            }) if balance == 50.0 && requested == 60.0
        ));

        // Balance untouched and nothing appended to the ledger
        assert_eq!(get_balance(&db, user.id).await?, 50.0);
        let entries = GcTransaction::find().all(&db).await?;
        assert!(entries.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_withdrawal_without_balance_row_is_insufficient() -> Result<()> {
        let db = setup_test_db().await?;
        let user = create_test_user(&db, "200000000000000005", 1).await?;

        let result =
            record_transaction(&db, user.id, TransactionKind::Withdrawal, 10.0, String::new())
                .await;
        assert!(matches!(result, Err(Error::InsufficientBalance { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_exact_balance_withdrawal_succeeds() -> Result<()> {
        let db = setup_test_db().await?;
        let user = create_test_user(&db, "200000000000000006", 1).await?;
        set_balance(&db, user.id, 80.0).await?;

        let entry =
            record_transaction(&db, user.id, TransactionKind::Withdrawal, 80.0, String::new())
                .await?;
        assert_eq!(entry.balance_after, 0.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_invalid_amounts_rejected() -> Result<()> {
        let db = setup_test_db().await?;
        let user = create_test_user(&db, "200000000000000007", 1).await?;

        for bad in [0.0, -25.0, f64::NAN, f64::INFINITY] {
            let result =
                record_transaction(&db, user.id, TransactionKind::Deposit, bad, String::new())
                    .await;
            assert!(matches!(result, Err(Error::Validation { .. })));
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_exactly_one_ledger_entry_per_confirmation() -> Result<()> {
        let db = setup_test_db().await?;
        let user = create_test_user(&db, "200000000000000008", 1).await?;

        record_transaction(&db, user.id, TransactionKind::Deposit, 60.0, String::new()).await?;

        let entries = GcTransaction::find().all(&db).await?;
        assert_eq!(entries.len(), 1);
        Ok(())
    }
}
