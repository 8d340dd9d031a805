//! Core business logic - framework-agnostic ticket, balance, and limit
//! operations. Nothing in here touches Discord; every function takes an
//! explicit database connection so tests run against in-memory SQLite.

/// Balance ledger operations
pub mod balance;

/// Deposit/withdraw amount limit configuration
pub mod limits;

/// Ticket lifecycle operations
pub mod ticket;

/// User account lookups and role checks
pub mod user;
