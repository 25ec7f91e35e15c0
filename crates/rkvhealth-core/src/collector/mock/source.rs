//! In-memory `MetricsSource` with scripted failures.

use std::collections::{HashMap, HashSet};

use crate::collector::info::parse_info;
use crate::collector::traits::{InfoCategory, MetricsSource, RawFields, SourceError};
use crate::model::SlowEntry;

/// Metrics source that serves `INFO` sections from memory.
///
/// Sections are stored as raw reply text and parsed on every call, the same
/// way a live reply is. Categories without content return an empty map.
#[derive(Debug, Clone, Default)]
pub struct MockSource {
    sections: HashMap<InfoCategory, String>,
    slow_log: Vec<SlowEntry>,
    slow_log_error: Option<SourceError>,
    failing: HashSet<InfoCategory>,
    unreachable: bool,
    fail_next: usize,
    category_calls: usize,
    slow_log_calls: usize,
    last_slow_log_count: Option<usize>,
}

impl MockSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the raw `INFO` reply for a category.
    pub fn set_section(&mut self, category: InfoCategory, content: impl Into<String>) {
        self.sections.insert(category, content.into());
    }

    pub fn with_section(mut self, category: InfoCategory, content: impl Into<String>) -> Self {
        self.set_section(category, content);
        self
    }

    /// Raw reply text for a category, empty if unset.
    pub fn section(&self, category: InfoCategory) -> String {
        self.sections.get(&category).cloned().unwrap_or_default()
    }

    pub fn add_slow_entry(&mut self, duration_us: u64, command: &str) {
        self.slow_log.push(SlowEntry {
            duration_us,
            command: command.to_string(),
        });
    }

    /// Makes every `SLOWLOG GET` fail with `error`.
    pub fn fail_slow_log(&mut self, error: SourceError) {
        self.slow_log_error = Some(error);
    }

    /// Makes queries for `category` fail with a command error.
    pub fn fail_category(&mut self, category: InfoCategory) {
        self.failing.insert(category);
    }

    /// Makes every call fail as if the server were down.
    pub fn set_unreachable(&mut self, unreachable: bool) {
        self.unreachable = unreachable;
    }

    /// Makes the next `n` category queries fail as unreachable.
    pub fn fail_next(&mut self, n: usize) {
        self.fail_next = n;
    }

    /// Number of `category` calls received so far.
    pub fn category_calls(&self) -> usize {
        self.category_calls
    }

    pub fn slow_log_calls(&self) -> usize {
        self.slow_log_calls
    }

    /// `count` argument of the most recent slow log request.
    pub fn last_slow_log_count(&self) -> Option<usize> {
        self.last_slow_log_count
    }

    fn unreachable_error() -> SourceError {
        SourceError::Unreachable("Connection refused (os error 111)".to_string())
    }
}

impl MetricsSource for MockSource {
    fn ping(&mut self) -> Result<(), SourceError> {
        if self.unreachable {
            return Err(Self::unreachable_error());
        }
        Ok(())
    }

    fn category(&mut self, category: InfoCategory) -> Result<RawFields, SourceError> {
        self.category_calls += 1;
        if self.unreachable {
            return Err(Self::unreachable_error());
        }
        if self.fail_next > 0 {
            self.fail_next -= 1;
            return Err(Self::unreachable_error());
        }
        if self.failing.contains(&category) {
            return Err(SourceError::Command(format!(
                "ERR unsupported INFO section '{category}'"
            )));
        }
        Ok(self
            .sections
            .get(&category)
            .map(|content| parse_info(content))
            .unwrap_or_default())
    }

    fn slow_entries(&mut self, count: usize) -> Result<Vec<SlowEntry>, SourceError> {
        self.slow_log_calls += 1;
        self.last_slow_log_count = Some(count);
        if self.unreachable {
            return Err(Self::unreachable_error());
        }
        if let Some(err) = &self.slow_log_error {
            return Err(err.clone());
        }
        Ok(self.slow_log.iter().take(count).cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_source_serves_sections() {
        let mut source =
            MockSource::new().with_section(InfoCategory::Memory, "# Memory\nused_memory:1024\n");

        let fields = source.category(InfoCategory::Memory).unwrap();
        assert_eq!(fields.get("used_memory").map(String::as_str), Some("1024"));

        let empty = source.category(InfoCategory::Stats).unwrap();
        assert!(empty.is_empty());
        assert_eq!(source.category_calls(), 2);
    }

    #[test]
    fn test_mock_source_failures() {
        let mut source = MockSource::new();
        source.fail_category(InfoCategory::Persistence);
        let err = source.category(InfoCategory::Persistence).unwrap_err();
        assert!(!err.is_connectivity());

        source.fail_next(1);
        assert!(source.category(InfoCategory::Server).unwrap_err().is_connectivity());
        assert!(source.category(InfoCategory::Server).is_ok());

        source.set_unreachable(true);
        assert!(source.ping().unwrap_err().is_connectivity());
    }

    #[test]
    fn test_mock_source_slow_log_truncates() {
        let mut source = MockSource::new();
        for i in 0..8 {
            source.add_slow_entry(10_000 + i, "GET key");
        }
        assert_eq!(source.slow_entries(5).unwrap().len(), 5);
        assert_eq!(source.last_slow_log_count(), Some(5));

        source.fail_slow_log(SourceError::Command("ERR".into()));
        assert!(source.slow_entries(5).is_err());
        assert_eq!(source.slow_log_calls(), 2);
    }
}
