// crates/vidsqueeze-ui/src/helpers/format.rs
//
// UI-layer string utilities that don't belong in vidsqueeze-core.
//
// Durations and percentages live in vidsqueeze_core::helpers::time.

/// Clip `s` to at most `max` bytes without splitting a codepoint.
/// Appends "…" when anything was cut.
pub fn truncate_name(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let cut = s.char_indices()
        .map(|(i, _)| i)
        .take_while(|&i| i <= max)
        .last()
        .unwrap_or(0);
    format!("{}…", &s[..cut])
}

/// Byte count in binary units with one decimal, e.g. `1.5 MiB`.
pub fn format_bytes(n: usize) -> String {
    const UNITS: [&str; 4] = ["KiB", "MiB", "GiB", "TiB"];
    if n < 1024 {
        return format!("{n} B");
    }
    let mut value = n as f64 / 1024.0;
    let mut unit  = 0;
    while value >= 1024.0 && unit + 1 < UNITS.len() {
        value /= 1024.0;
        unit  += 1;
    }
    format!("{value:.1} {}", UNITS[unit])
}

/// `after` as a percentage of `before`, e.g. "38% of original".
pub fn size_ratio(before: usize, after: usize) -> Option<String> {
    if before == 0 {
        return None;
    }
    let pct = after as f64 / before as f64 * 100.0;
    Some(format!("{pct:.0}% of original"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_names_are_unchanged() {
        assert_eq!(truncate_name("clip.mp4", 20), "clip.mp4");
    }

    #[test]
    fn long_names_get_an_ellipsis() {
        assert_eq!(truncate_name("holiday_footage.mov", 7), "holiday…");
    }

    #[test]
    fn multibyte_is_not_split() {
        let t = truncate_name("éééé", 3);
        assert!(t.ends_with('…'));
        assert!(t.starts_with('é'));
    }

    #[test]
    fn bytes_pick_a_unit() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(1536), "1.5 KiB");
        assert_eq!(format_bytes(3 * 1024 * 1024), "3.0 MiB");
    }

    #[test]
    fn ratio_against_empty_source_is_none() {
        assert_eq!(size_ratio(0, 10), None);
        assert_eq!(size_ratio(200, 50).as_deref(), Some("25% of original"));
    }
}
