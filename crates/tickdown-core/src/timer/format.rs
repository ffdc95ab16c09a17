//! Countdown display helpers.

/// Render remaining seconds as `m:ss`.
pub fn format_mmss(secs: u64) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Elapsed progress across the current run, 0.0 .. 100.0.
pub fn progress_pct(remaining_secs: u64, length_secs: u64) -> f64 {
    if length_secs == 0 {
        return 0.0;
    }
    let elapsed = length_secs.saturating_sub(remaining_secs.min(length_secs));
    (elapsed as f64 / length_secs as f64 * 100.0).min(100.0)
}
