//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod balance;
pub mod gc_limit;
pub mod gc_transaction;
pub mod ticket;
pub mod user;

// Re-export specific types to avoid conflicts
pub use balance::{Column as BalanceColumn, Entity as Balance, Model as BalanceModel};
pub use gc_limit::{Column as GcLimitColumn, Entity as GcLimit, Model as GcLimitModel};
pub use gc_transaction::{
    Column as GcTransactionColumn, Entity as GcTransaction, Model as GcTransactionModel,
};
pub use ticket::{Column as TicketColumn, Entity as Ticket, Model as TicketModel};
pub use user::{Column as UserColumn, Entity as User, Model as UserModel};
