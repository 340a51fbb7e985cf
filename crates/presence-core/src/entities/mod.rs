//! Domain entities - core business objects

mod session;

pub use session::{ActiveSession, Session, SessionId, SessionKey};
