//! Fluent comparison step for WHERE and HAVING clauses.

use super::select::QueryBuilder;
use crate::column::Column;
use crate::condition::{Comparison, Condition, Logical, SubqueryOp};
use crate::error::{QueryError, QueryResult};
use crate::marker::Marker;
use crate::value::Value;

/// A clause that owns an ordered list of conditions.
pub trait ConditionClause {
    fn conditions_mut(&mut self) -> &mut Vec<Condition>;
}

/// Pending comparison on one column, returned by `where_(...)` or `having(...)`.
///
/// Each comparison method records the condition in the parent clause and returns the
/// handler again. Calling a second comparison on the same handler replaces the first,
/// so the last call wins. Finish with [`and`](Self::and), [`or`](Self::or) or
/// [`end`](Self::end) to get the parent builder back.
///
/// ```ignore
/// let mut w = WhereBuilder::new();
/// w.where_("age").greater_than(18).and()
///     .where_("role").in_list(["admin", "owner"])?.end();
/// assert_eq!(w.build(), " WHERE age > ? AND role IN (?, ?)");
/// ```
#[must_use = "a comparison handler records nothing until a comparison method is called"]
pub struct ComparisonHandler<'a, T: ConditionClause> {
    parent: &'a mut T,
    column: Column,
    marker: Option<Marker>,
    slot: Option<usize>,
}

impl<'a, T: ConditionClause> ComparisonHandler<'a, T> {
    pub(crate) fn new(parent: &'a mut T, column: Column) -> Self {
        Self {
            parent,
            column,
            marker: None,
            slot: None,
        }
    }

    fn set(mut self, comparison: Comparison) -> Self {
        let mut condition = Condition::new(self.column.clone(), comparison);
        if let Some(marker) = self.marker {
            condition.set_marker(marker);
        }
        let conditions = self.parent.conditions_mut();
        match self.slot {
            Some(i) => conditions[i] = condition,
            None => {
                conditions.push(condition);
                self.slot = Some(conditions.len() - 1);
            }
        }
        self
    }

    /// Render this condition with `marker` instead of the clause default.
    pub fn marker(mut self, marker: Marker) -> Self {
        self.marker = Some(marker);
        if let Some(i) = self.slot {
            self.parent.conditions_mut()[i].set_marker(marker);
        }
        self
    }

    pub fn equals(self, value: impl Into<Value>) -> Self {
        self.set(Comparison::Equals(value.into()))
    }

    pub fn not_equals(self, value: impl Into<Value>) -> Self {
        self.set(Comparison::NotEquals(value.into()))
    }

    pub fn greater_than(self, value: impl Into<Value>) -> Self {
        self.set(Comparison::GreaterThan(value.into()))
    }

    pub fn less_than(self, value: impl Into<Value>) -> Self {
        self.set(Comparison::LessThan(value.into()))
    }

    pub fn greater_or_equal(self, value: impl Into<Value>) -> Self {
        self.set(Comparison::GreaterOrEqual(value.into()))
    }

    pub fn less_or_equal(self, value: impl Into<Value>) -> Self {
        self.set(Comparison::LessOrEqual(value.into()))
    }

    pub fn like(self, pattern: impl Into<Value>) -> Self {
        self.set(Comparison::Like(pattern.into()))
    }

    pub fn not_like(self, pattern: impl Into<Value>) -> Self {
        self.set(Comparison::NotLike(pattern.into()))
    }

    /// `column IN (...)`. Fails with [`QueryError::Arity`] on an empty list.
    pub fn in_list<I, V>(self, values: I) -> QueryResult<Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values = collect_non_empty("IN", values)?;
        Ok(self.set(Comparison::In(values)))
    }

    /// `column NOT IN (...)`. Fails with [`QueryError::Arity`] on an empty list.
    pub fn not_in<I, V>(self, values: I) -> QueryResult<Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values = collect_non_empty("NOT IN", values)?;
        Ok(self.set(Comparison::NotIn(values)))
    }

    pub fn between(self, low: impl Into<Value>, high: impl Into<Value>) -> Self {
        self.set(Comparison::Between(low.into(), high.into()))
    }

    pub fn not_between(self, low: impl Into<Value>, high: impl Into<Value>) -> Self {
        self.set(Comparison::NotBetween(low.into(), high.into()))
    }

    pub fn is_null(self) -> Self {
        self.set(Comparison::IsNull)
    }

    pub fn is_not_null(self) -> Self {
        self.set(Comparison::IsNotNull)
    }

    // ==================== Subqueries ====================

    fn subquery(self, op: SubqueryOp, query: QueryBuilder) -> QueryResult<Self> {
        query.validate()?;
        Ok(self.set(Comparison::Subquery(op, Box::new(query))))
    }

    /// `column IN (SELECT ...)`.
    pub fn in_subquery(self, query: QueryBuilder) -> QueryResult<Self> {
        self.subquery(SubqueryOp::In, query)
    }

    /// `column NOT IN (SELECT ...)`.
    pub fn not_in_subquery(self, query: QueryBuilder) -> QueryResult<Self> {
        self.subquery(SubqueryOp::NotIn, query)
    }

    /// `EXISTS (SELECT ...)`. The handler's column is not rendered.
    pub fn exists_subquery(self, query: QueryBuilder) -> QueryResult<Self> {
        self.subquery(SubqueryOp::Exists, query)
    }

    /// `NOT EXISTS (SELECT ...)`.
    pub fn not_exists_subquery(self, query: QueryBuilder) -> QueryResult<Self> {
        self.subquery(SubqueryOp::NotExists, query)
    }

    /// `column = (SELECT ...)` against a scalar subquery.
    pub fn equals_subquery(self, query: QueryBuilder) -> QueryResult<Self> {
        self.subquery(SubqueryOp::Equals, query)
    }

    pub fn greater_than_subquery(self, query: QueryBuilder) -> QueryResult<Self> {
        self.subquery(SubqueryOp::GreaterThan, query)
    }

    pub fn less_than_subquery(self, query: QueryBuilder) -> QueryResult<Self> {
        self.subquery(SubqueryOp::LessThan, query)
    }

    /// `column LIKE (SELECT ...)`, matching against a pattern the subquery yields.
    pub fn like_subquery(self, query: QueryBuilder) -> QueryResult<Self> {
        self.subquery(SubqueryOp::Like, query)
    }

    // ==================== Combinators ====================

    fn link(self, link: Logical) -> &'a mut T {
        if let Some(i) = self.slot {
            self.parent.conditions_mut()[i].set_link(link);
        }
        self.parent
    }

    /// Join this condition to the next one with `AND`.
    pub fn and(self) -> &'a mut T {
        self.link(Logical::And)
    }

    /// Join this condition to the next one with `OR`.
    pub fn or(self) -> &'a mut T {
        self.link(Logical::Or)
    }

    /// Return to the parent builder, keeping the default `AND` link.
    pub fn end(self) -> &'a mut T {
        self.parent
    }
}

fn collect_non_empty<I, V>(operator: &'static str, values: I) -> QueryResult<Vec<Value>>
where
    I: IntoIterator<Item = V>,
    V: Into<Value>,
{
    let values: Vec<Value> = values.into_iter().map(Into::into).collect();
    if values.is_empty() {
        return Err(QueryError::arity(operator, "at least 1", 0));
    }
    Ok(values)
}
