use super::having::HavingBuilder;
use super::join::{JoinBuilder, JoinCondition, JoinType};
use super::traits::SqlBuilder;
use super::where_builder::WhereBuilder;
use crate::built::{BuiltQuery, Diagnostic};
use crate::column::Column;
use crate::config::QueryConfig;
use crate::cte::WithBuilder;
use crate::error::{QueryError, QueryResult};
use crate::marker::Marker;
use crate::value::{ParamMap, concat_params};

/// Sort direction for ORDER BY.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Order {
    #[default]
    Asc,
    Desc,
}

impl Order {
    pub fn keyword(self) -> &'static str {
        match self {
            Order::Asc => "ASC",
            Order::Desc => "DESC",
        }
    }
}

/// One ORDER BY item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    column: String,
    order: Order,
}

impl OrderBy {
    pub fn new(column: impl Into<String>, order: Order) -> Self {
        Self {
            column: column.into(),
            order,
        }
    }

    pub fn to_sql(&self) -> String {
        format!("{} {}", self.column, self.order.keyword())
    }
}

/// Structured SELECT query builder.
///
/// Fragments render in a fixed order: WITH, SELECT, FROM, JOIN, WHERE, GROUP BY,
/// HAVING, ORDER BY, LIMIT/OFFSET. Parameters follow the same order: WITH values,
/// then WHERE, then HAVING, renumbered from 1.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    config: QueryConfig,
    /// WITH bindings
    with: WithBuilder,
    /// SELECT columns (empty means `*`)
    select_cols: Vec<Column>,
    /// Main table
    table: Option<String>,
    table_alias: Option<String>,
    joins: JoinBuilder,
    where_builder: WhereBuilder,
    group_by: Vec<String>,
    having_builder: HavingBuilder,
    order_by: Vec<OrderBy>,
    limit: Option<u64>,
    offset: Option<u64>,
}

impl Default for QueryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryBuilder {
    /// Create a builder with the default configuration (placeholders enabled).
    pub fn new() -> Self {
        Self::with_config(QueryConfig::default())
    }

    pub fn with_config(config: QueryConfig) -> Self {
        let enabled = config.placeholders_enabled;
        let marker = Marker::from_placeholders(enabled);
        Self {
            config,
            with: WithBuilder::owned(enabled),
            select_cols: Vec::new(),
            table: None,
            table_alias: None,
            joins: JoinBuilder::new(),
            where_builder: WhereBuilder::with_marker(marker),
            group_by: Vec::new(),
            having_builder: HavingBuilder::with_marker(marker),
            order_by: Vec::new(),
            limit: None,
            offset: None,
        }
    }

    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    pub fn placeholders_enabled(&self) -> bool {
        self.config.placeholders_enabled
    }

    /// Toggle the default rendering mode for every clause this query owns.
    ///
    /// Conditions with their own [`Marker`] override keep it.
    pub fn set_placeholders_enabled(&mut self, enabled: bool) -> &mut Self {
        self.config.placeholders_enabled = enabled;
        let marker = Marker::from_placeholders(enabled);
        self.where_builder.set_default_marker(marker);
        self.having_builder.set_default_marker(marker);
        self.with.set_placeholders_enabled(enabled);
        self
    }

    // ==================== SELECT / FROM ====================

    /// Replace the SELECT list.
    pub fn select<I, C>(&mut self, cols: I) -> &mut Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Column>,
    {
        self.select_cols = cols.into_iter().map(Into::into).collect();
        self
    }

    /// Append one SELECT column.
    pub fn select_column(&mut self, col: impl Into<Column>) -> &mut Self {
        self.select_cols.push(col.into());
        self
    }

    /// Number of selected columns, or `None` for `SELECT *`.
    pub fn selected_column_count(&self) -> Option<usize> {
        (!self.select_cols.is_empty()).then_some(self.select_cols.len())
    }

    pub fn from(&mut self, table: impl Into<String>) -> &mut Self {
        self.table = Some(table.into());
        self.table_alias = None;
        self
    }

    pub fn from_as(&mut self, table: impl Into<String>, alias: impl Into<String>) -> &mut Self {
        self.table = Some(table.into());
        self.table_alias = Some(alias.into());
        self
    }

    // ==================== Joins ====================

    pub fn join(
        &mut self,
        kind: JoinType,
        table: impl Into<String>,
        alias: Option<&str>,
        on: impl Into<String>,
    ) -> &mut Self {
        self.joins.push(JoinCondition::Keyword {
            kind,
            table: table.into(),
            alias: alias.map(str::to_string),
            on: on.into(),
        });
        self
    }

    /// Add INNER JOIN.
    pub fn inner_join(
        &mut self,
        table: impl Into<String>,
        alias: Option<&str>,
        on: impl Into<String>,
    ) -> &mut Self {
        self.join(JoinType::Inner, table, alias, on)
    }

    /// Add LEFT JOIN.
    pub fn left_join(
        &mut self,
        table: impl Into<String>,
        alias: Option<&str>,
        on: impl Into<String>,
    ) -> &mut Self {
        self.join(JoinType::Left, table, alias, on)
    }

    /// Add CROSS JOIN (no predicate).
    pub fn cross_join(&mut self, table: impl Into<String>, alias: Option<&str>) -> &mut Self {
        self.joins.push(JoinCondition::Keyword {
            kind: JoinType::Cross,
            table: table.into(),
            alias: alias.map(str::to_string),
            on: String::new(),
        });
        self
    }

    /// Add a comma join: `, table [AS alias]`.
    pub fn legacy_join(&mut self, table: impl Into<String>, alias: Option<&str>) -> &mut Self {
        self.joins.push(JoinCondition::Legacy {
            table: table.into(),
            alias: alias.map(str::to_string),
        });
        self
    }

    // ==================== WHERE / GROUP BY / HAVING ====================

    pub fn where_mut(&mut self) -> &mut WhereBuilder {
        &mut self.where_builder
    }

    pub fn where_builder(&self) -> &WhereBuilder {
        &self.where_builder
    }

    /// Configure the WHERE clause in a closure; errors from fallible comparisons
    /// propagate.
    ///
    /// ```ignore
    /// qb.filter(|w| {
    ///     w.where_("status").equals("active").and()
    ///         .where_("role").in_list(["admin", "owner"])?.end();
    ///     Ok(())
    /// })?;
    /// ```
    pub fn filter<F>(&mut self, configure: F) -> QueryResult<&mut Self>
    where
        F: FnOnce(&mut WhereBuilder) -> QueryResult<()>,
    {
        configure(&mut self.where_builder)?;
        Ok(self)
    }

    pub fn group_by<I, S>(&mut self, cols: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.group_by.extend(cols.into_iter().map(Into::into));
        self
    }

    pub fn having_mut(&mut self) -> &mut HavingBuilder {
        &mut self.having_builder
    }

    pub fn having<F>(&mut self, configure: F) -> QueryResult<&mut Self>
    where
        F: FnOnce(&mut HavingBuilder) -> QueryResult<()>,
    {
        configure(&mut self.having_builder)?;
        Ok(self)
    }

    // ==================== WITH ====================

    pub fn with_mut(&mut self) -> &mut WithBuilder {
        &mut self.with
    }

    pub fn with<F>(&mut self, configure: F) -> &mut Self
    where
        F: FnOnce(&mut WithBuilder),
    {
        configure(&mut self.with);
        self
    }

    // ==================== Ordering & pagination ====================

    pub fn order_by(&mut self, column: impl Into<String>, order: Order) -> &mut Self {
        self.order_by.push(OrderBy::new(column, order));
        self
    }

    pub fn limit(&mut self, limit: u64) -> &mut Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(&mut self, offset: u64) -> &mut Self {
        self.offset = Some(offset);
        self
    }

    // ==================== SQL build ====================

    fn build_select(&self, table: &str) -> String {
        let cols = if self.select_cols.is_empty() {
            "*".to_string()
        } else {
            self.select_cols
                .iter()
                .map(Column::select_sql)
                .collect::<Vec<_>>()
                .join(", ")
        };

        let mut sql = format!("SELECT {} FROM {}", cols, table);
        if let Some(alias) = &self.table_alias {
            sql.push_str(" AS ");
            sql.push_str(alias);
        }

        sql.push_str(&self.joins.build());
        sql.push_str(&self.where_builder.build());

        if !self.group_by.is_empty() {
            sql.push_str(" GROUP BY ");
            sql.push_str(&self.group_by.join(", "));
        }

        sql.push_str(&self.having_builder.build());

        if !self.order_by.is_empty() {
            let items: Vec<String> = self.order_by.iter().map(OrderBy::to_sql).collect();
            sql.push_str(" ORDER BY ");
            sql.push_str(&items.join(", "));
        }

        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {}", limit));
        }

        if let Some(offset) = self.offset {
            sql.push_str(&format!(" OFFSET {}", offset));
        }

        sql
    }

    /// Render the statement text.
    ///
    /// Without a table, a query made of CTE bindings renders their outer selects.
    pub fn build_sql(&self) -> String {
        let with = self.with.build();
        let body = match &self.table {
            Some(table) => self.build_select(table),
            None => self.with.build_selects(),
        };
        if with.is_empty() {
            body
        } else {
            format!("{} {}", with, body)
        }
    }

    /// Bound values in fragment order: WITH, WHERE, HAVING.
    pub fn values(&self) -> ParamMap {
        if self.table.is_none() {
            return self.with.values();
        }
        concat_params([
            self.with.values(),
            self.where_builder.values(),
            self.having_builder.values(),
        ])
    }

    /// Warnings from CTE bindings.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.with.diagnostics()
    }

    /// Clauses that only render after a FROM table.
    fn table_clauses(&self) -> Vec<&'static str> {
        let mut clauses = Vec::new();
        if !self.joins.is_empty() {
            clauses.push("JOIN");
        }
        if !self.where_builder.is_empty() {
            clauses.push("WHERE");
        }
        if !self.group_by.is_empty() {
            clauses.push("GROUP BY");
        }
        if !self.having_builder.is_empty() {
            clauses.push("HAVING");
        }
        if !self.order_by.is_empty() {
            clauses.push("ORDER BY");
        }
        if self.limit.is_some() {
            clauses.push("LIMIT");
        }
        if self.offset.is_some() {
            clauses.push("OFFSET");
        }
        clauses
    }

    /// Check that the query has a source and every CTE query is valid.
    ///
    /// A query without a FROM table renders only its CTE selects, so any clause that
    /// needs a table is rejected instead of being dropped.
    pub fn validate(&self) -> QueryResult<()> {
        if self.table.is_none() {
            if self.with.is_empty() {
                return Err(QueryError::MissingTable);
            }
            let orphaned = self.table_clauses();
            if !orphaned.is_empty() {
                return Err(QueryError::validation(format!(
                    "{} requires a FROM table",
                    orphaned.join(", ")
                )));
            }
        }
        self.with.validate()
    }

    /// Seal the query into an immutable [`BuiltQuery`].
    pub fn build(&self) -> QueryResult<BuiltQuery> {
        self.validate()?;
        let sql = self.build_sql();
        let params = self.values();

        if self.config.log_sql {
            tracing::debug!(
                sql = %self.config.truncate_sql(&sql),
                params = params.len(),
                "built query"
            );
        }

        Ok(BuiltQuery::new(sql, params).with_diagnostics(self.diagnostics()))
    }
}

impl SqlBuilder for QueryBuilder {
    fn build_sql(&self) -> String {
        QueryBuilder::build_sql(self)
    }

    fn values(&self) -> ParamMap {
        QueryBuilder::values(self)
    }

    fn validate(&self) -> QueryResult<()> {
        QueryBuilder::validate(self)
    }

    fn fragment(&self) -> BuiltQuery {
        BuiltQuery::new(self.build_sql(), self.values()).with_diagnostics(self.diagnostics())
    }
}
