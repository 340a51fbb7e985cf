use chrono::TimeDelta;

/// Render a duration as `"{h}h {m}m {s}s"`, leaving out zero components.
///
/// Seconds are always shown when every component is zero, so the result is never
/// empty. Sub-second precision is truncated and negative durations render as `"0s"`.
pub fn format_duration(duration: TimeDelta) -> String {
    let total_seconds = duration.num_seconds().max(0);
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    let mut parts = Vec::with_capacity(3);
    if hours > 0 {
        parts.push(format!("{hours}h"));
    }
    if minutes > 0 {
        parts.push(format!("{minutes}m"));
    }
    if seconds > 0 || parts.is_empty() {
        parts.push(format!("{seconds}s"));
    }
    parts.join(" ")
}
