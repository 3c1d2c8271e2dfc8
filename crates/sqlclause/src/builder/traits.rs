use crate::built::BuiltQuery;
use crate::error::QueryResult;
use crate::value::ParamMap;

/// Base trait for anything that renders SQL text plus its bound values.
///
/// `build_sql` uses `?` markers. Statements run only through a sealed [`BuiltQuery`],
/// which rewrites them to `$n` for tokio-postgres.
pub trait SqlBuilder: Sync {
    /// Build the SQL string.
    fn build_sql(&self) -> String;

    /// Bound values keyed by 1-based placeholder position.
    fn values(&self) -> ParamMap;

    /// Debug helper.
    fn to_sql(&self) -> String {
        self.build_sql()
    }

    /// Validate builder state.
    fn validate(&self) -> QueryResult<()> {
        Ok(())
    }

    /// Seal the current text and values into an immutable snapshot.
    fn fragment(&self) -> BuiltQuery {
        BuiltQuery::new(self.build_sql(), self.values())
    }
}
