//! Progress formatting helpers.

use std::time::Duration;

/// Human-readable duration: `500ms`, `5.3s`, `1.5m`.
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 1.0 {
        format!("{}ms", d.as_millis())
    } else if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        let mins = secs / 60.0;
        format!("{:.1}m", mins)
    }
}

/// One-based stage counter, e.g. `[2/4]`.
pub fn stage_counter(index: usize, total: usize) -> String {
    format!("[{}/{}]", index + 1, total)
}
