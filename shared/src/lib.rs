//! Accounts Shared Library
//!
//! Wire types and error types shared between the accounts backend and
//! any client talking to it.

pub mod errors;
pub mod types;

// Re-export commonly used items
pub use errors::*;
pub use types::*;
