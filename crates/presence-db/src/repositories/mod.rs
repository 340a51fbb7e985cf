//! Repository implementations
//!
//! SQLite implementations of the repository traits defined in presence-core.

mod error;
mod session;

pub use session::SqliteSessionRepository;
