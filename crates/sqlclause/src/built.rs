//! Sealed query snapshots.

use crate::builder::SqlBuilder;
use crate::client::GenericClient;
use crate::error::QueryResult;
use crate::placeholder::{count_placeholders, to_numbered};
use crate::value::{ParamMap, Value};
use serde::Serialize;
use std::fmt;
use tokio_postgres::Row;
use tokio_postgres::types::ToSql;

/// A non-fatal problem found while building.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// A CTE declares a column list whose length differs from its inner SELECT list.
    ColumnCountMismatch {
        alias: String,
        declared: usize,
        selected: usize,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::ColumnCountMismatch {
                alias,
                declared,
                selected,
            } => write!(
                f,
                "CTE `{alias}` declares {declared} column(s) but its query selects {selected}"
            ),
        }
    }
}

/// Immutable SQL text plus its 1-based parameter map.
///
/// Produced by [`QueryBuilder::build`](crate::QueryBuilder::build) or
/// [`SqlBuilder::fragment`]. Nothing can append to it afterwards, so the number of
/// `?` markers always matches the number of values it was built with.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuiltQuery {
    sql: String,
    params: ParamMap,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    diagnostics: Vec<Diagnostic>,
}

impl BuiltQuery {
    pub(crate) fn new(sql: String, params: ParamMap) -> Self {
        Self {
            sql,
            params,
            diagnostics: Vec::new(),
        }
    }

    pub(crate) fn with_diagnostics(mut self, diagnostics: Vec<Diagnostic>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// SQL text with `?` markers.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// SQL text with markers rewritten to `$1, $2, ...`.
    pub fn to_numbered_sql(&self) -> String {
        to_numbered(&self.sql)
    }

    pub fn params(&self) -> &ParamMap {
        &self.params
    }

    /// Parameter references in binding order, for tokio-postgres.
    pub fn params_ref(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.params
            .values()
            .map(|v| v as &(dyn ToSql + Sync))
            .collect()
    }

    /// Warnings collected while building.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Number of `?` markers in the text, ignoring quoted literals.
    pub fn placeholder_count(&self) -> usize {
        count_placeholders(&self.sql)
    }

    pub fn into_parts(self) -> (String, Vec<Value>) {
        (self.sql, self.params.into_values().collect())
    }

    /// Execute the built SQL and return all rows.
    pub async fn fetch_all(&self, conn: &impl GenericClient) -> QueryResult<Vec<Row>> {
        let sql = self.to_numbered_sql();
        let params = self.params_ref();
        conn.query(&sql, &params).await
    }

    /// Execute the built SQL and return the first row, or [`QueryError::NotFound`].
    ///
    /// [`QueryError::NotFound`]: crate::QueryError::NotFound
    pub async fn fetch_one(&self, conn: &impl GenericClient) -> QueryResult<Row> {
        let sql = self.to_numbered_sql();
        let params = self.params_ref();
        conn.query_one(&sql, &params).await
    }

    /// Execute the built SQL and return at most one row.
    pub async fn fetch_opt(&self, conn: &impl GenericClient) -> QueryResult<Option<Row>> {
        let sql = self.to_numbered_sql();
        let params = self.params_ref();
        conn.query_opt(&sql, &params).await
    }

    /// Execute the built SQL and return the affected row count.
    pub async fn execute(&self, conn: &impl GenericClient) -> QueryResult<u64> {
        let sql = self.to_numbered_sql();
        let params = self.params_ref();
        conn.execute(&sql, &params).await
    }
}

impl fmt::Display for BuiltQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}

impl SqlBuilder for BuiltQuery {
    fn build_sql(&self) -> String {
        self.sql.clone()
    }

    fn values(&self) -> ParamMap {
        self.params.clone()
    }

    fn fragment(&self) -> BuiltQuery {
        self.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::params_from;

    #[test]
    fn numbered_and_counted() {
        let q = BuiltQuery::new(
            "SELECT * FROM t WHERE a = ? AND b IN (?, ?)".to_string(),
            params_from([Value::from(1), Value::from(2), Value::from(3)]),
        );
        assert_eq!(q.placeholder_count(), 3);
        assert_eq!(q.params().len(), 3);
        assert_eq!(
            q.to_numbered_sql(),
            "SELECT * FROM t WHERE a = $1 AND b IN ($2, $3)"
        );
        assert_eq!(q.params_ref().len(), 3);
    }

    #[test]
    fn serializes_params_by_position() {
        let q = BuiltQuery::new(
            "x = ?".to_string(),
            params_from([Value::from("a")]),
        );
        let json = serde_json::to_value(&q).unwrap();
        assert_eq!(json["sql"], "x = ?");
        assert_eq!(json["params"]["1"], "a");
        assert!(json.get("diagnostics").is_none());
    }

    #[test]
    fn diagnostic_message() {
        let d = Diagnostic::ColumnCountMismatch {
            alias: "totals".into(),
            declared: 2,
            selected: 3,
        };
        assert_eq!(
            d.to_string(),
            "CTE `totals` declares 2 column(s) but its query selects 3"
        );
    }
}
