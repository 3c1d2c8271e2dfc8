//! CTE (WITH clause) support.
//!
//! [`WithBuilder`] holds named bindings; each [`CteBinding`] pairs an alias with an
//! inner [`QueryBuilder`] and an optional list of renamed output columns.
//!
//! # Example
//! ```ignore
//! use sqlclause::{QueryBuilder, WithBuilder};
//!
//! let mut inner = QueryBuilder::new();
//! inner.select(["user_id", "SUM(amount)"]).from("orders").group_by(["user_id"]);
//!
//! let mut with = WithBuilder::new();
//! with.cte("totals").columns(["user_id", "total"]).query(inner);
//! assert_eq!(
//!     with.build(),
//!     "WITH totals (user_id, total) AS (SELECT user_id, SUM(amount) FROM orders GROUP BY user_id)"
//! );
//! ```

use crate::builder::{QueryBuilder, SqlBuilder};
use crate::built::Diagnostic;
use crate::column::Column;
use crate::error::QueryResult;
use crate::placeholder::strip_terminators;
use crate::value::{ParamMap, concat_params};

/// Explicit output column names of a CTE.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WithColumnBuilder {
    columns: Vec<String>,
}

impl WithColumnBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, name: impl Into<String>) -> &mut Self {
        self.columns.push(name.into());
        self
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Comma-separated names, e.g. `a, b`.
    pub fn build(&self) -> String {
        self.columns.join(", ")
    }
}

#[derive(Debug, Clone)]
struct RecursivePart {
    query: QueryBuilder,
    union_all: bool,
}

/// One `alias [(cols)] AS (query)` binding, usable as a virtual table.
#[derive(Debug, Clone)]
pub struct CteBinding {
    alias: String,
    columns: WithColumnBuilder,
    query: QueryBuilder,
    recursive: Option<RecursivePart>,
    outer: Vec<Column>,
    /// Placeholder flag of the owning query, applied to every attached query.
    placeholders: Option<bool>,
}

impl CteBinding {
    pub fn new(alias: impl Into<String>) -> Self {
        Self {
            alias: alias.into(),
            columns: WithColumnBuilder::new(),
            query: QueryBuilder::new(),
            recursive: None,
            outer: Vec::new(),
            placeholders: None,
        }
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// Declare the output column names.
    pub fn columns<I, S>(&mut self, names: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            self.columns.add(name);
        }
        self
    }

    pub fn column_builder_mut(&mut self) -> &mut WithColumnBuilder {
        &mut self.columns
    }

    /// Set the inner query.
    ///
    /// Inside a [`QueryBuilder`], the query takes the owner's placeholder setting.
    pub fn query(&mut self, mut query: QueryBuilder) -> &mut Self {
        if let Some(enabled) = self.placeholders {
            query.set_placeholders_enabled(enabled);
        }
        self.query = query;
        self
    }

    pub fn inner(&self) -> &QueryBuilder {
        &self.query
    }

    pub(crate) fn set_placeholders_enabled(&mut self, enabled: bool) {
        self.placeholders = Some(enabled);
        self.query.set_placeholders_enabled(enabled);
        if let Some(part) = &mut self.recursive {
            part.query.set_placeholders_enabled(enabled);
        }
    }

    /// Append the recursive term: `base UNION [ALL] recursive`.
    ///
    /// Only meaningful together with [`WithBuilder::recursive`].
    pub fn union_recursive(&mut self, mut query: QueryBuilder, union_all: bool) -> &mut Self {
        if let Some(enabled) = self.placeholders {
            query.set_placeholders_enabled(enabled);
        }
        self.recursive = Some(RecursivePart { query, union_all });
        self
    }

    /// Columns selected by [`from`](Self::from); `*` when none are given.
    pub fn select<I, C>(&mut self, columns: I) -> &mut Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Column>,
    {
        self.outer = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Compare the declared column count with the inner SELECT list.
    ///
    /// Returns `None` when nothing is declared or the inner query selects `*`.
    pub fn check_columns(&self) -> Option<Diagnostic> {
        if self.columns.is_empty() {
            return None;
        }
        let selected = self.query.selected_column_count()?;
        (selected != self.columns.len()).then(|| Diagnostic::ColumnCountMismatch {
            alias: self.alias.clone(),
            declared: self.columns.len(),
            selected,
        })
    }

    /// Render `alias [(c1, c2)] AS (inner)`.
    ///
    /// A column-count mismatch is logged and the declared names are still rendered.
    pub fn build(&self) -> String {
        if let Some(Diagnostic::ColumnCountMismatch {
            alias,
            declared,
            selected,
        }) = self.check_columns()
        {
            tracing::warn!(
                alias = %alias,
                declared,
                selected,
                "CTE column list does not match its query"
            );
        }

        let mut inner = strip_terminators(&self.query.build_sql());
        if let Some(part) = &self.recursive {
            inner.push_str(if part.union_all { " UNION ALL " } else { " UNION " });
            inner.push_str(&strip_terminators(&part.query.build_sql()));
        }

        if self.columns.is_empty() {
            format!("{} AS ({})", self.alias, inner)
        } else {
            format!("{} ({}) AS ({})", self.alias, self.columns.build(), inner)
        }
    }

    /// Render the outer `SELECT <cols|*> FROM alias`.
    pub fn from(&self) -> String {
        let columns = if self.outer.is_empty() {
            "*".to_string()
        } else {
            self.outer
                .iter()
                .map(Column::select_sql)
                .collect::<Vec<_>>()
                .join(", ")
        };
        format!("SELECT {} FROM {}", columns, self.alias)
    }

    /// Inner query values, then the recursive term's.
    pub fn values(&self) -> ParamMap {
        let mut maps = vec![self.query.values()];
        if let Some(part) = &self.recursive {
            maps.push(part.query.values());
        }
        concat_params(maps)
    }

    pub fn validate(&self) -> QueryResult<()> {
        self.query.validate()?;
        if let Some(part) = &self.recursive {
            part.query.validate()?;
        }
        Ok(())
    }
}

/// Ordered CTE bindings rendered as one `WITH` prefix.
#[derive(Debug, Clone, Default)]
pub struct WithBuilder {
    ctes: Vec<CteBinding>,
    recursive: bool,
    union_all: bool,
    placeholders: Option<bool>,
}

impl WithBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bindings owned by a query; every attached query follows its placeholder flag.
    pub(crate) fn owned(placeholders_enabled: bool) -> Self {
        Self {
            placeholders: Some(placeholders_enabled),
            ..Self::default()
        }
    }

    /// Add a binding named `alias` and return it for configuration.
    pub fn cte(&mut self, alias: impl Into<String>) -> &mut CteBinding {
        let mut binding = CteBinding::new(alias);
        if let Some(enabled) = self.placeholders {
            binding.set_placeholders_enabled(enabled);
        }
        self.ctes.push(binding);
        let last = self.ctes.len() - 1;
        &mut self.ctes[last]
    }

    /// Emit `WITH RECURSIVE`.
    pub fn recursive(&mut self, recursive: bool) -> &mut Self {
        self.recursive = recursive;
        self
    }

    /// Join the per-binding `SELECT ... FROM alias` statements with `UNION ALL`.
    pub fn union_all(&mut self, union_all: bool) -> &mut Self {
        self.union_all = union_all;
        self
    }

    pub fn bindings(&self) -> &[CteBinding] {
        &self.ctes
    }

    pub fn is_empty(&self) -> bool {
        self.ctes.is_empty()
    }

    pub(crate) fn set_placeholders_enabled(&mut self, enabled: bool) {
        self.placeholders = Some(enabled);
        for cte in &mut self.ctes {
            cte.set_placeholders_enabled(enabled);
        }
    }

    /// `WITH a AS (...), b AS (...)`, or `""` without bindings.
    pub fn build(&self) -> String {
        if self.ctes.is_empty() {
            return String::new();
        }
        let keyword = if self.recursive { "WITH RECURSIVE" } else { "WITH" };
        let defs: Vec<String> = self.ctes.iter().map(CteBinding::build).collect();
        format!("{} {}", keyword, defs.join(", "))
    }

    /// The outer selects of every binding.
    pub fn build_selects(&self) -> String {
        let separator = if self.union_all { " UNION ALL " } else { " " };
        self.ctes
            .iter()
            .map(CteBinding::from)
            .collect::<Vec<_>>()
            .join(separator)
    }

    pub fn values(&self) -> ParamMap {
        concat_params(self.ctes.iter().map(CteBinding::values))
    }

    /// Column-count problems of every binding, nested ones included.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.ctes
            .iter()
            .flat_map(|cte| {
                cte.inner()
                    .diagnostics()
                    .into_iter()
                    .chain(cte.check_columns())
            })
            .collect()
    }

    pub fn validate(&self) -> QueryResult<()> {
        self.ctes.iter().try_for_each(CteBinding::validate)
    }
}

impl SqlBuilder for WithBuilder {
    fn build_sql(&self) -> String {
        self.build()
    }

    fn values(&self) -> ParamMap {
        WithBuilder::values(self)
    }

    fn validate(&self) -> QueryResult<()> {
        WithBuilder::validate(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    fn orders_by_user() -> QueryBuilder {
        let mut q = QueryBuilder::new();
        q.select(["user_id", "SUM(amount)", "COUNT(*)"])
            .from("orders")
            .group_by(["user_id"]);
        q
    }

    #[test]
    fn binding_without_columns() {
        let mut q = QueryBuilder::new();
        q.from("users");
        let mut with = WithBuilder::new();
        with.cte("u").query(q);
        assert_eq!(with.build(), "WITH u AS (SELECT * FROM users)");
        assert!(with.diagnostics().is_empty());
    }

    #[test]
    fn declared_columns_render() {
        let mut with = WithBuilder::new();
        with.cte("totals")
            .columns(["user_id", "total", "n"])
            .query(orders_by_user());
        assert_eq!(
            with.build(),
            "WITH totals (user_id, total, n) AS (SELECT user_id, SUM(amount), COUNT(*) FROM orders GROUP BY user_id)"
        );
        assert!(with.diagnostics().is_empty());
    }

    #[test]
    fn column_count_mismatch_is_a_diagnostic() {
        let mut cte = CteBinding::new("totals");
        cte.columns(["user_id", "total"]).query(orders_by_user());

        assert_eq!(
            cte.check_columns(),
            Some(Diagnostic::ColumnCountMismatch {
                alias: "totals".into(),
                declared: 2,
                selected: 3,
            })
        );
        assert!(cte.build().starts_with("totals (user_id, total) AS (SELECT"));
    }

    #[test]
    fn star_select_skips_column_check() {
        let mut q = QueryBuilder::new();
        q.from("users");
        let mut cte = CteBinding::new("u");
        cte.columns(["a", "b"]).query(q);
        assert_eq!(cte.check_columns(), None);
    }

    #[test]
    fn from_uses_outer_columns() {
        let mut cte = CteBinding::new("totals");
        assert_eq!(cte.from(), "SELECT * FROM totals");
        cte.select(["user_id", "total"]);
        assert_eq!(cte.from(), "SELECT user_id, total FROM totals");
    }

    #[test]
    fn inner_values_are_collected() {
        let mut q = QueryBuilder::new();
        q.from("orders");
        q.where_mut().where_("amount").greater_than(100).end();
        let mut with = WithBuilder::new();
        with.cte("big").query(q);
        assert_eq!(
            with.build(),
            "WITH big AS (SELECT * FROM orders WHERE amount > ?)"
        );
        assert_eq!(with.values(), crate::value::params_from([Value::Int(100)]));
    }

    #[test]
    fn recursive_binding() {
        let mut base = QueryBuilder::new();
        base.select(["id", "parent_id"]).from("employees");
        base.where_mut().where_("parent_id").is_null().end();

        let mut step = QueryBuilder::new();
        step.select(["e.id", "e.parent_id"])
            .from_as("employees", "e")
            .inner_join("tree", Some("t"), "e.parent_id = t.id");

        let mut with = WithBuilder::new();
        with.recursive(true)
            .cte("tree")
            .columns(["id", "parent_id"])
            .query(base)
            .union_recursive(step, true);
        assert_eq!(
            with.build(),
            "WITH RECURSIVE tree (id, parent_id) AS (SELECT id, parent_id FROM employees WHERE parent_id IS NULL UNION ALL SELECT e.id, e.parent_id FROM employees AS e INNER JOIN tree AS t ON e.parent_id = t.id)"
        );
    }

    #[test]
    fn selects_joined_with_union_all() {
        let mut with = WithBuilder::new();
        with.union_all(true);
        with.cte("a");
        with.cte("b");
        assert_eq!(with.build_selects(), "SELECT * FROM a UNION ALL SELECT * FROM b");
    }
}
