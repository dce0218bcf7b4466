//! Business logic services
//!
//! Services encapsulate business logic and coordinate between
//! repositories and the auth primitives.

pub mod profile;
pub mod user;

pub use profile::ProfileService;
pub use user::UserService;
