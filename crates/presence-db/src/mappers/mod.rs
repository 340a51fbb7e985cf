//! Entity to model mappers
//!
//! - `From<SessionModel> for Session`: convert database rows to domain objects
//! - `SessionInsert`: prepare an open session for insertion

mod session;

pub use session::SessionInsert;
