// src/format.rs
// Display helpers shared by the page and the renderer

const SIZE_UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
const SIZE_BASE: u64 = 1024;

/// Format seconds as `MM:SS`. Minutes never roll over into hours.
pub fn format_time(seconds: f64) -> String {
    let seconds = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };
    let minutes = (seconds / 60.0).floor() as u64;
    let remaining = (seconds % 60.0).floor() as u64;
    format!("{:02}:{:02}", minutes, remaining)
}

pub fn format_time_range(start: f64, end: f64) -> String {
    format!("{} → {}", format_time(start), format_time(end))
}

/// Human readable size, base 1024, at most two decimals with trailing zeros dropped.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut unit = 0usize;
    let mut divisor = 1u64;
    while unit + 1 < SIZE_UNITS.len() && bytes / divisor >= SIZE_BASE {
        divisor *= SIZE_BASE;
        unit += 1;
    }

    // ties round up, not to even
    let value = (bytes as f64 / divisor as f64 * 100.0).round() / 100.0;
    let fixed = format!("{:.2}", value);
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, SIZE_UNITS[unit])
}
