//! Parser for `INFO` replies and typed field lookups.
//!
//! These are pure functions over strings so they can be tested without a
//! server. Every lookup takes a default that is returned when the field is
//! missing or cannot be parsed.

use super::traits::RawFields;

/// Parses the body of an `INFO` reply into a field map.
///
/// The reply is a sequence of `field:value` lines grouped under `# Section`
/// headers. Headers, blank lines and lines without a colon are skipped.
/// Only the first colon separates field from value, so values such as
/// `executable:/usr/bin/redis-server` or keyspace lines keep their content.
pub fn parse_info(content: &str) -> RawFields {
    let mut fields = RawFields::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((key, value)) = line.split_once(':') {
            fields.insert(key.trim().to_string(), value.trim().to_string());
        }
    }
    fields
}

pub fn field_str(fields: &RawFields, key: &str, default: &str) -> String {
    fields
        .get(key)
        .map(|v| v.as_str())
        .filter(|v| !v.is_empty())
        .unwrap_or(default)
        .to_string()
}

/// Non-negative integer field. Fractional values are truncated, negative
/// values fall back to `default`.
pub fn field_u64(fields: &RawFields, key: &str, default: u64) -> u64 {
    let Some(raw) = fields.get(key) else {
        return default;
    };
    if let Ok(v) = raw.parse::<u64>() {
        return v;
    }
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => v as u64,
        _ => default,
    }
}

pub fn field_i64(fields: &RawFields, key: &str, default: i64) -> i64 {
    fields
        .get(key)
        .and_then(|v| v.parse::<i64>().ok())
        .unwrap_or(default)
}

pub fn field_f64(fields: &RawFields, key: &str, default: f64) -> f64 {
    fields
        .get(key)
        .and_then(|v| v.parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(default)
}

/// Returns true if the integer field equals `expected`. A missing field is
/// compared as `missing_as`.
pub fn field_flag(fields: &RawFields, key: &str, expected: i64, missing_as: i64) -> bool {
    field_i64(fields, key, missing_as) == expected
}

#[cfg(test)]
mod tests {
    use super::*;

    const INFO_MEMORY: &str = "\
# Memory\r
used_memory:1048576\r
used_memory_human:1.00M\r
maxmemory:0\r
mem_fragmentation_ratio:1.23\r
\r
";

    #[test]
    fn test_parse_info_skips_headers_and_blanks() {
        let fields = parse_info(INFO_MEMORY);
        assert_eq!(fields.len(), 4);
        assert_eq!(fields.get("used_memory").map(String::as_str), Some("1048576"));
        assert_eq!(fields.get("used_memory_human").map(String::as_str), Some("1.00M"));
    }

    #[test]
    fn test_parse_info_splits_on_first_colon() {
        let fields = parse_info("executable:/usr/bin/redis-server\ndb0:keys=10,expires=0\n");
        assert_eq!(
            fields.get("executable").map(String::as_str),
            Some("/usr/bin/redis-server")
        );
        assert_eq!(fields.get("db0").map(String::as_str), Some("keys=10,expires=0"));
    }

    #[test]
    fn test_parse_info_empty() {
        assert!(parse_info("").is_empty());
        assert!(parse_info("# Server\n").is_empty());
    }

    #[test]
    fn test_field_defaults() {
        let fields = parse_info(INFO_MEMORY);
        assert_eq!(field_u64(&fields, "evicted_keys", 0), 0);
        assert_eq!(field_str(&fields, "os", "Unknown"), "Unknown");
        assert_eq!(field_f64(&fields, "mem_fragmentation_ratio", 0.0), 1.23);
        assert_eq!(field_f64(&fields, "missing", 7.5), 7.5);
    }

    #[test]
    fn test_field_u64_garbage_and_negative() {
        let fields = parse_info("a:abc\nb:-5\nc:12.9\n");
        assert_eq!(field_u64(&fields, "a", 3), 3);
        assert_eq!(field_u64(&fields, "b", 3), 3);
        assert_eq!(field_u64(&fields, "c", 3), 12);
    }

    #[test]
    fn test_field_flag() {
        let fields = parse_info("rdb_bgsave_in_progress:0\naof_enabled:1\n");
        assert!(field_flag(&fields, "rdb_bgsave_in_progress", 0, 0));
        assert!(field_flag(&fields, "aof_enabled", 1, 0));
        assert!(!field_flag(&fields, "aof_rewrite_in_progress", 1, 0));
    }

    #[test]
    fn test_field_str_empty_value_uses_default() {
        let fields = parse_info("master_host:\n");
        assert_eq!(field_str(&fields, "master_host", "unknown"), "unknown");
    }
}
