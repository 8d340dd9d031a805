//! Database configuration module.
//!
//! Handles `SQLite` connection setup and table creation using `SeaORM`. Table
//! creation uses `Schema::create_table_from_entity` so the schema always
//! matches the Rust entity definitions without hand-written SQL. The website
//! shares this database; table and column names are part of that contract.

use crate::entities::{Balance, GcLimit, GcTransaction, Ticket, User};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};

/// Gets the database URL from the environment or returns the default `SQLite` path.
///
/// Looks for `DATABASE_URL` and falls back to a local `SQLite` file
/// (created on first use) if not set.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "sqlite://data/gc_tickets.sqlite?mode=rwc".to_string())
}

/// Establishes a connection to the database using [`get_database_url`].
///
/// # Errors
/// Returns an error if the connection cannot be established.
pub async fn create_connection() -> Result<DatabaseConnection> {
    Database::connect(get_database_url()).await.map_err(Into::into)
}

/// Creates all necessary database tables from the entity definitions.
///
/// Safe to call on an existing database only when the tables are absent;
/// the website's migration tooling owns the production schema, so this is
/// primarily for first-run bootstrap and in-memory test databases.
///
/// # Errors
/// Returns an error if any table creation statement fails.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut user_table = schema.create_table_from_entity(User);
    let mut ticket_table = schema.create_table_from_entity(Ticket);
    let mut balance_table = schema.create_table_from_entity(Balance);
    let mut gc_transaction_table = schema.create_table_from_entity(GcTransaction);
    let mut gc_limit_table = schema.create_table_from_entity(GcLimit);

    db.execute(builder.build(user_table.if_not_exists())).await?;
    db.execute(builder.build(ticket_table.if_not_exists())).await?;
    db.execute(builder.build(balance_table.if_not_exists())).await?;
    db.execute(builder.build(gc_transaction_table.if_not_exists()))
        .await?;
    db.execute(builder.build(gc_limit_table.if_not_exists())).await?;

    Ok(())
}
