//! Unified error types for the GC ticket system.
//!
//! Every handler boundary (slash command, component interaction, HTTP route)
//! catches these and converts them into a user- or caller-visible message;
//! none of them terminate the process.

use thiserror::Error;

/// All errors the ticket system can produce.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration loading or validation failed
    #[error("Configuration error: {message}")]
    Config {
        /// Description of what went wrong
        message: String,
    },

    /// Underlying database operation failed
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Discord API call failed
    #[error("Discord API error: {0}")]
    Discord(Box<poise::serenity_prelude::Error>),

    /// Environment variable missing or malformed
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// I/O error (config file, network listener)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Request input failed shape validation
    #[error("{message}")]
    Validation {
        /// Caller-correctable description of the problem
        message: String,
    },

    /// Monetary amount outside the configured limits for its ticket type
    #[error("Amount must be between {min} and {max} GC")]
    AmountOutOfRange {
        /// The rejected amount
        amount: f64,
        /// Configured minimum (inclusive)
        min: f64,
        /// Configured maximum (inclusive)
        max: f64,
    },

    /// The Discord identity is not a member of the configured guild
    #[error("User not in server")]
    NotAMember,

    /// The Discord identity has no linked row in the users table
    #[error("User not found in database. Please ensure you have linked your Discord account.")]
    UserNotFound {
        /// The Discord ID that failed to resolve
        discord_id: String,
    },

    /// An open ticket of the same type already exists for this user
    #[error(
        "You already have an open {ticket_type} ticket. Please wait for it to be resolved before creating a new one."
    )]
    DuplicateOpenTicket {
        /// The requested ticket type
        ticket_type: String,
    },

    /// No ticket row matches the interaction's channel
    #[error("Ticket for channel {channel_id} not found")]
    TicketNotFound {
        /// Discord channel ID the interaction referenced
        channel_id: String,
    },

    /// The ticket has already left the open state
    #[error("This ticket has already been {status}")]
    TicketAlreadyProcessed {
        /// Status the ticket was found in
        status: String,
    },

    /// Withdrawal exceeds the user's current balance
    #[error("Insufficient balance for withdrawal")]
    InsufficientBalance {
        /// Balance at the time of the check
        balance: f64,
        /// Amount that was requested
        requested: f64,
    },

    /// Actor failed the dual staff-privilege gate
    #[error("Permission denied")]
    PermissionDenied,
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Error::Discord(Box::new(value))
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
