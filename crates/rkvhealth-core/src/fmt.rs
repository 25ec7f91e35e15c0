//! Shared formatting helpers for presenters.
//!
//! All pure formatting functions (no terminal control) live here.

use chrono::{DateTime, Local};

/// Format an integer with `,` thousands separators: `1234567` -> `"1,234,567"`.
pub fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Format duration in seconds as human-readable: `"3m 5s"`, `"2d 4h"`.
pub fn format_duration(secs: u64) -> String {
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else if secs < 86400 {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    } else {
        format!("{}d {}h", secs / 86400, (secs % 86400) / 3600)
    }
}

/// Format a float keeping at least one decimal: `2.0` -> `"2.0"`, `1.87` -> `"1.87"`.
pub fn format_decimal(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

/// Format milliseconds with 2 decimals: `12.345` -> `"12.35ms"`.
pub fn format_ms(ms: f64) -> String {
    format!("{:.2}ms", ms)
}

/// Format a configured memory limit; `None` means no limit.
pub fn format_max_memory(max_memory_mb: Option<f64>) -> String {
    match max_memory_mb {
        Some(mb) => format!("{} MB", format_decimal(mb)),
        None => "Not set".to_string(),
    }
}

/// Truncate to at most `max_chars` characters, respecting char boundaries.
pub fn truncate(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Format a unix timestamp in local time as `YYYY-MM-DD HH:MM:SS`.
/// Returns `"-"` for out-of-range values.
pub fn format_timestamp(ts: i64) -> String {
    DateTime::from_timestamp(ts, 0)
        .map(|dt| {
            dt.with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string()
        })
        .unwrap_or_else(|| "-".to_string())
}
