//! Human-readable rendering of tracked time

mod duration;

pub use duration::format_duration;
