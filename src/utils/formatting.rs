pub fn format_duration(ms: u64) -> String {
    if ms < 1000 {
        format!("{}ms", ms)
    } else if ms < 60_000 {
        format!("{:.1}s", ms as f64 / 1000.0)
    } else if ms < 3_600_000 {
        let mins = ms / 60_000;
        let secs = (ms % 60_000) / 1000;
        format!("{}m {}s", mins, secs)
    } else {
        let hours = ms / 3_600_000;
        let mins = (ms % 3_600_000) / 60_000;
        format!("{}h {}m", hours, mins)
    }
}

/// Backend-measured step time: seconds under a minute, fractional minutes
/// above.
pub fn format_step_duration(seconds: f64) -> String {
    let seconds = seconds.max(0.0);
    if seconds < 60.0 {
        format!("{:.1}s", seconds)
    } else {
        format!("{:.1}m", seconds / 60.0)
    }
}

/// Wall-clock time since a run started, in whole seconds.
pub fn format_elapsed_secs(elapsed: std::time::Duration) -> String {
    format!("{}s", elapsed.as_secs())
}

pub fn format_percentage(pct: f64) -> String {
    format!("{:.0}%", pct.clamp(0.0, 100.0))
}
