//! Builder configuration.

use serde::Deserialize;

/// Configuration shared by a [`QueryBuilder`](crate::QueryBuilder) and the clause
/// builders it owns.
///
/// Deserializable so it can be embedded in an application config file; missing fields
/// fall back to [`QueryConfig::default`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Render operands as `?` placeholders (true) or inline literals (false).
    pub placeholders_enabled: bool,
    /// Emit a `tracing` debug event with the SQL whenever a query is built.
    pub log_sql: bool,
    /// Truncate logged SQL (in bytes, on a char boundary). `None` logs it whole.
    pub max_logged_sql_length: Option<usize>,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            placeholders_enabled: true,
            log_sql: false,
            max_logged_sql_length: Some(200),
        }
    }
}

impl QueryConfig {
    /// Create a new configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable placeholder rendering.
    pub fn placeholders(mut self, enabled: bool) -> Self {
        self.placeholders_enabled = enabled;
        self
    }

    /// Enable SQL debug logging.
    pub fn log_sql(mut self, enabled: bool) -> Self {
        self.log_sql = enabled;
        self
    }

    /// Set maximum SQL length to log.
    pub fn max_logged_sql_length(mut self, len: usize) -> Self {
        self.max_logged_sql_length = Some(len);
        self
    }

    /// Disable SQL truncation in logs.
    pub fn no_truncate(mut self) -> Self {
        self.max_logged_sql_length = None;
        self
    }

    pub(crate) fn truncate_sql<'a>(&self, sql: &'a str) -> std::borrow::Cow<'a, str> {
        match self.max_logged_sql_length {
            Some(max) if sql.len() > max => {
                let mut end = max;
                while !sql.is_char_boundary(end) {
                    end -= 1;
                }
                format!("{}...", &sql[..end]).into()
            }
            _ => sql.into(),
        }
    }
}
