//! NDJSON event feed
//!
//! Reads one dispatch message per line and hands it to the dispatcher. Events are
//! processed strictly in arrival order; a bad line or a failed event is logged and
//! skipped, never fatal.

use super::GatewayState;
use crate::handlers::{Dispatched, EventDispatcher};
use crate::protocol::DispatchMessage;
use presence_common::AppError;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// Counters for one run of the feed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeedStats {
    /// Non-blank lines read
    pub events: u64,
    /// Events handled successfully
    pub applied: u64,
    /// Events of a type the tracker does not handle
    pub ignored: u64,
    /// Lines that failed to decode or events whose handling failed
    pub dropped: u64,
}

/// Consume the feed until end of input.
///
/// Only I/O errors on the reader end the loop early.
pub async fn run_feed<R>(state: &GatewayState, reader: R) -> Result<FeedStats, AppError>
where
    R: AsyncBufRead + Unpin,
{
    let mut stats = FeedStats::default();
    let mut lines = reader.lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        stats.events += 1;

        let message = match DispatchMessage::from_line(line) {
            Ok(message) => message,
            Err(e) => {
                stats.dropped += 1;
                tracing::warn!(error = %e, "Dropping undecodable feed line");
                continue;
            }
        };

        match EventDispatcher::dispatch(state, &message).await {
            Ok(Dispatched::Ignored) => stats.ignored += 1,
            Ok(_) => stats.applied += 1,
            Err(e) if e.is_store_unavailable() => {
                stats.dropped += 1;
                tracing::error!(
                    event = %message.t,
                    seq = ?message.s,
                    error = %e,
                    code = e.error_code(),
                    "Session store unavailable, event dropped"
                );
            }
            Err(e) => {
                stats.dropped += 1;
                tracing::warn!(
                    event = %message.t,
                    seq = ?message.s,
                    error = %e,
                    code = e.error_code(),
                    "Event dropped"
                );
            }
        }
    }

    Ok(stats)
}
