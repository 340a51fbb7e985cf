//! Member status cache
//!
//! Remembers the last status seen for every member so presence updates that
//! arrive without a previous status can still be given one.

mod cache;

pub use cache::MemberStatusCache;
