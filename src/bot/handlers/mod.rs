//! Raw serenity event handlers routed through the poise event hook.

/// Component interaction and DM message handling
pub mod events;

pub use events::handle_event;
