// crates/vidsqueeze-core/src/helpers/time.rs
//
// Human-readable durations and progress figures for the UI and log lines.

/// Format a duration in seconds as a compact human-readable string.
///
/// | Range         | Format       | Example   |
/// |---------------|--------------|-----------|
/// | ≥ 3600 s      | `H:MM:SS`    | `1:04:35` |
/// | ≥ 60 s        | `M:SS`       | `3:07`    |
/// | < 60 s        | `S.Xs`       | `4.2s`    |
///
/// ```
/// use vidsqueeze_core::helpers::time::format_duration;
/// assert_eq!(format_duration(4.2),    "4.2s");
/// assert_eq!(format_duration(187.0),  "3:07");
/// assert_eq!(format_duration(3875.0), "1:04:35");
/// ```
pub fn format_duration(secs: f64) -> String {
    let secs = if secs.is_finite() { secs.max(0.0) } else { 0.0 };
    if secs >= 3600.0 {
        format!(
            "{}:{:02}:{:02}",
            secs as u64 / 3600,
            (secs as u64 % 3600) / 60,
            secs as u64 % 60,
        )
    } else if secs >= 60.0 {
        format!("{}:{:02}", secs as u64 / 60, secs as u64 % 60)
    } else {
        format!("{secs:.1}s")
    }
}

/// Progress with two decimals, the way the progress label shows it.
///
/// ```
/// use vidsqueeze_core::helpers::time::format_percent;
/// assert_eq!(format_percent(0.0),        "0.00%");
/// assert_eq!(format_percent(33.333_33),  "33.33%");
/// assert_eq!(format_percent(100.0),      "100.00%");
/// ```
pub fn format_percent(p: f64) -> String {
    format!("{:.2}%", p.clamp(0.0, 100.0))
}

/// `elapsed / total` as `M:SS / M:SS`-style text.
///
/// ```
/// use vidsqueeze_core::helpers::time::format_position;
/// assert_eq!(format_position(75.0, 187.0), "1:15 / 3:07");
/// ```
pub fn format_position(elapsed: f64, total: f64) -> String {
    format!("{} / {}", format_duration(elapsed), format_duration(total))
}
