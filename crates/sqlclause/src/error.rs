//! Error types for sqlclause

use thiserror::Error;

/// Result type alias for sqlclause operations
pub type QueryResult<T> = Result<T, QueryError>;

/// Error types for clause construction and execution
#[derive(Debug, Error)]
pub enum QueryError {
    /// An operator received the wrong number of operands
    #[error("{operator} expects {expected} value(s), got {got}")]
    Arity {
        operator: &'static str,
        expected: &'static str,
        got: usize,
    },

    /// SELECT statement has neither a FROM table nor CTE selects
    #[error("SELECT requires a FROM table or at least one WITH binding")]
    MissingTable,

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Query execution error
    #[error("Query error: {0}")]
    Query(#[from] tokio_postgres::Error),

    /// Row not found
    #[error("Not found: {0}")]
    NotFound(String),
}

impl QueryError {
    /// Create an arity error for an operator.
    pub fn arity(operator: &'static str, expected: &'static str, got: usize) -> Self {
        Self::Arity {
            operator,
            expected,
            got,
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Check if this is an arity error
    pub fn is_arity(&self) -> bool {
        matches!(self, Self::Arity { .. })
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arity_message_names_operator() {
        let err = QueryError::arity("IN", "at least 1", 0);
        assert!(err.is_arity());
        assert_eq!(err.to_string(), "IN expects at least 1 value(s), got 0");
    }

    #[test]
    fn missing_table_message() {
        assert_eq!(
            QueryError::MissingTable.to_string(),
            "SELECT requires a FROM table or at least one WITH binding"
        );
    }
}
