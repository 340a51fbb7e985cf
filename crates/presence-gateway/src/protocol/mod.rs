//! Gateway protocol definitions
//!
//! Defines the dispatch envelope carried on the event feed.

mod messages;

pub use messages::DispatchMessage;
