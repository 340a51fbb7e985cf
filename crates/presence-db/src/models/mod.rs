//! Database models - SQLx-compatible structs for SQLite tables

mod session;

pub use session::SessionModel;
