//! Execution settings shared by a connection and the builders that use it.

use crate::error::{QueryError, QueryResult};
use serde::{Deserialize, Serialize};
use tracing::Level;

/// Level at which executed statements are logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    #[default]
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_tracing(self) -> Level {
        match self {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

/// Logging and pagination settings.
///
/// Deserializes from any serde format; missing fields take their defaults:
///
/// ```ignore
/// let config = QueryConfig::from_json(r#"{ "log_level": "info", "max_per_page": 100 }"#)?;
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Level of the per-statement `querykit.sql` event.
    pub log_level: LogLevel,
    /// Maximum SQL length (bytes) in log events; `None` logs the full text.
    pub max_sql_log_length: Option<usize>,
    /// Page size used when pagination is asked for 0 items per page.
    pub default_per_page: u64,
    /// Upper bound on any requested page size.
    pub max_per_page: Option<u64>,
}

impl QueryConfig {
    pub const DEFAULT: QueryConfig = QueryConfig {
        log_level: LogLevel::Debug,
        max_sql_log_length: Some(200),
        default_per_page: 20,
        max_per_page: None,
    };

    pub fn new() -> Self {
        Self::DEFAULT
    }

    /// Parse a JSON document.
    pub fn from_json(json: &str) -> QueryResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| QueryError::validation(format!("invalid query config: {e}")))
    }

    /// Set the statement log level.
    pub fn log_level(mut self, level: LogLevel) -> Self {
        self.log_level = level;
        self
    }

    /// Set maximum SQL length in log events.
    pub fn max_sql_log_length(mut self, len: usize) -> Self {
        self.max_sql_log_length = Some(len);
        self
    }

    /// Log full SQL text.
    pub fn no_truncate(mut self) -> Self {
        self.max_sql_log_length = None;
        self
    }

    pub fn default_per_page(mut self, per_page: u64) -> Self {
        self.default_per_page = per_page;
        self
    }

    pub fn max_per_page(mut self, max: u64) -> Self {
        self.max_per_page = Some(max);
        self
    }

    /// Effective page size for a request: 0 means the default, and the
    /// result never exceeds `max_per_page` nor drops below 1.
    pub fn clamp_per_page(&self, requested: u64) -> u64 {
        let per_page = if requested == 0 {
            self.default_per_page
        } else {
            requested
        };
        let per_page = match self.max_per_page {
            Some(max) => per_page.min(max),
            None => per_page,
        };
        per_page.max(1)
    }

    /// SQL text as it should appear in a log event.
    pub(crate) fn loggable_sql(&self, sql: &str) -> String {
        match self.max_sql_log_length {
            Some(max) if sql.len() > max => format!("{}...", truncate_sql_bytes(sql, max)),
            _ => sql.to_string(),
        }
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Longest prefix of `sql` within `max_bytes` that ends on a char boundary.
pub(crate) fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let config = QueryConfig::from_json(r#"{ "log_level": "info", "max_per_page": 50 }"#)
            .unwrap();
        assert_eq!(config.log_level, LogLevel::Info);
        assert_eq!(config.max_per_page, Some(50));
        assert_eq!(config.default_per_page, 20);
        assert_eq!(config.max_sql_log_length, Some(200));
    }

    #[test]
    fn bad_json_is_a_validation_error() {
        let err = QueryConfig::from_json(r#"{ "log_level": "loud" }"#).unwrap_err();
        assert!(matches!(err, QueryError::Validation(_)));
    }

    #[test]
    fn per_page_clamping() {
        let config = QueryConfig::new().default_per_page(15).max_per_page(40);
        assert_eq!(config.clamp_per_page(0), 15);
        assert_eq!(config.clamp_per_page(10), 10);
        assert_eq!(config.clamp_per_page(500), 40);
        assert_eq!(QueryConfig::new().default_per_page(0).clamp_per_page(0), 1);
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        assert_eq!(truncate_sql_bytes("héllo", 2), "h");
        assert_eq!(truncate_sql_bytes("abc", 10), "abc");

        let config = QueryConfig::new().max_sql_log_length(6);
        assert_eq!(config.loggable_sql("SELECT * FROM t"), "SELECT...");
        assert_eq!(config.no_truncate().loggable_sql("SELECT 1"), "SELECT 1");
        assert_eq!(LogLevel::Warn.as_tracing(), Level::WARN);
    }
}
