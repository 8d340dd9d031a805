//! Discord command implementations.

/// General utility commands
pub mod general;

// Export commands
pub use general::*;
