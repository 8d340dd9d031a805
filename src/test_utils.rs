//! Shared test utilities.
//!
//! Common helpers for setting up in-memory test databases and seeding the
//! rows the website's registration flow would normally create.

use crate::{
    core::ticket::TicketType,
    entities::{balance, gc_limit, ticket, user},
    errors::Result,
};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Inserts a user row the way the website's registration flow would.
pub async fn create_test_user(
    db: &DatabaseConnection,
    discord_id: &str,
    role_id: i64,
) -> Result<user::Model> {
    user::ActiveModel {
        discord_id: Set(discord_id.to_string()),
        role_id: Set(role_id),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Inserts a pending ticket bound to the given channel.
///
/// # Defaults
/// * `description`: `"Test ticket"`
/// * `status`: `"pending"`
pub async fn create_test_ticket(
    db: &DatabaseConnection,
    user_id: i64,
    ticket_type: TicketType,
    amount: Option<f64>,
    channel_id: &str,
) -> Result<ticket::Model> {
    crate::core::ticket::create_ticket(
        db,
        user_id,
        ticket_type,
        amount,
        "Test ticket".to_string(),
        channel_id.to_string(),
    )
    .await
}

/// Sets a user's balance row to an absolute value, creating it if needed.
pub async fn set_balance(db: &DatabaseConnection, user_id: i64, amount: f64) -> Result<()> {
    use sea_orm::EntityTrait;

    let existing = crate::entities::Balance::find_by_id(user_id).one(db).await?;
    if let Some(row) = existing {
        let mut active: balance::ActiveModel = row.into();
        active.balance = Set(amount);
        active.update(db).await?;
    } else {
        balance::ActiveModel {
            user_id: Set(user_id),
            balance: Set(amount),
        }
        .insert(db)
        .await?;
    }
    Ok(())
}

/// Inserts a limit configuration row for the given type.
pub async fn set_limit(
    db: &DatabaseConnection,
    limit_type: &str,
    min: f64,
    max: f64,
) -> Result<()> {
    gc_limit::ActiveModel {
        limit_type: Set(limit_type.to_string()),
        min_amount: Set(min),
        max_amount: Set(max),
    }
    .insert(db)
    .await?;
    Ok(())
}
