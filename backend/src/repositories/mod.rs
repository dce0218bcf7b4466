//! Database repositories
//!
//! Provides data access layer for database operations.

pub mod profile;
pub mod user;

pub use profile::{ProfileRecord, ProfileRepository};
pub use user::{CreateOutcome, NewUser, UserRecord, UserRepository};
