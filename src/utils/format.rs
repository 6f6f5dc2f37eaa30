//! Duration formatting for display

/// Render fractional seconds as `M:SS`, or `H:MM:SS` from one hour up.
///
/// Sub-second residuals are dropped, negative amounts show as zero and
/// non-finite amounts show as `--:--`.
pub fn format_duration(seconds: f64) -> String {
    if !seconds.is_finite() {
        return "--:--".to_string();
    }

    let total = seconds.max(0.0).trunc() as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}

/// Render a whole-second span the compact way used for uptime
pub fn format_uptime(total_secs: u64) -> String {
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}
