//! Comparison operators and condition rendering.
//!
//! A [`Condition`] binds one [`Column`] to one [`Comparison`]. Rendering dispatches on
//! the operator shape:
//!
//! | shape | placeholder mode | literal mode |
//! |---|---|---|
//! | subquery | `IN (SELECT ...)` | same |
//! | list | `IN (?, ?, ?)` | `IN (1, 2, 3)` |
//! | range | `BETWEEN ? AND ?` | `BETWEEN 1 AND 10` |
//! | scalar | `= ?` | `= 5` |
//! | none | `IS NULL` | `IS NULL` |
//!
//! Conditions in one clause are joined by their [`Logical`] link; see
//! [`ConditionList::build_conditions`] for how OR runs are grouped.

use crate::builder::QueryBuilder;
use crate::column::Column;
use crate::marker::Marker;
use crate::placeholder::{repeat_marker, strip_terminators};
use crate::value::{ParamMap, Value, params_from};

/// Operator used against a nested query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubqueryOp {
    In,
    NotIn,
    Exists,
    NotExists,
    Equals,
    GreaterThan,
    LessThan,
    Like,
}

impl SubqueryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            SubqueryOp::In => "IN",
            SubqueryOp::NotIn => "NOT IN",
            SubqueryOp::Exists => "EXISTS",
            SubqueryOp::NotExists => "NOT EXISTS",
            SubqueryOp::Equals => "=",
            SubqueryOp::GreaterThan => ">",
            SubqueryOp::LessThan => "<",
            SubqueryOp::Like => "LIKE",
        }
    }

    /// `EXISTS` predicates stand alone and take no column on the left.
    fn takes_column(self) -> bool {
        !matches!(self, SubqueryOp::Exists | SubqueryOp::NotExists)
    }
}

/// The closed set of comparisons a condition can hold.
///
/// Operand arity is encoded in each variant, so a `BETWEEN` without two bounds cannot
/// be constructed. The only arity checked at runtime is the non-empty `IN` list, which
/// [`ComparisonHandler`](crate::ComparisonHandler) rejects when the condition is set.
#[derive(Debug, Clone)]
pub enum Comparison {
    Equals(Value),
    NotEquals(Value),
    GreaterThan(Value),
    LessThan(Value),
    GreaterOrEqual(Value),
    LessOrEqual(Value),
    Like(Value),
    NotLike(Value),
    In(Vec<Value>),
    NotIn(Vec<Value>),
    Between(Value, Value),
    NotBetween(Value, Value),
    IsNull,
    IsNotNull,
    Subquery(SubqueryOp, Box<QueryBuilder>),
}

impl Comparison {
    /// SQL operator symbol.
    pub fn symbol(&self) -> &'static str {
        match self {
            Comparison::Equals(_) => "=",
            Comparison::NotEquals(_) => "!=",
            Comparison::GreaterThan(_) => ">",
            Comparison::LessThan(_) => "<",
            Comparison::GreaterOrEqual(_) => ">=",
            Comparison::LessOrEqual(_) => "<=",
            Comparison::Like(_) => "LIKE",
            Comparison::NotLike(_) => "NOT LIKE",
            Comparison::In(_) => "IN",
            Comparison::NotIn(_) => "NOT IN",
            Comparison::Between(..) => "BETWEEN",
            Comparison::NotBetween(..) => "NOT BETWEEN",
            Comparison::IsNull => "IS NULL",
            Comparison::IsNotNull => "IS NOT NULL",
            Comparison::Subquery(op, _) => op.symbol(),
        }
    }

    /// Direct operand values, in textual order. Subqueries have none.
    pub fn operands(&self) -> Vec<&Value> {
        match self {
            Comparison::Equals(v)
            | Comparison::NotEquals(v)
            | Comparison::GreaterThan(v)
            | Comparison::LessThan(v)
            | Comparison::GreaterOrEqual(v)
            | Comparison::LessOrEqual(v)
            | Comparison::Like(v)
            | Comparison::NotLike(v) => vec![v],
            Comparison::In(vals) | Comparison::NotIn(vals) => vals.iter().collect(),
            Comparison::Between(lo, hi) | Comparison::NotBetween(lo, hi) => vec![lo, hi],
            Comparison::IsNull | Comparison::IsNotNull | Comparison::Subquery(..) => Vec::new(),
        }
    }

    /// Render the operator and its operands, with a leading space: ` = ?`, ` IN (?, ?)`.
    pub fn render(&self, marker: Marker) -> String {
        let symbol = self.symbol();
        match self {
            Comparison::Subquery(_, query) => {
                format!(" {symbol} ({})", strip_terminators(&query.build_sql()))
            }
            Comparison::In(vals) | Comparison::NotIn(vals) => match marker {
                Marker::Placeholder => {
                    format!(" {symbol} ({})", repeat_marker(marker.symbol(), vals.len()))
                }
                Marker::UseValue => {
                    let literals: Vec<String> = vals.iter().map(Value::to_string).collect();
                    format!(" {symbol} ({})", literals.join(", "))
                }
            },
            Comparison::Between(lo, hi) | Comparison::NotBetween(lo, hi) => match marker {
                Marker::Placeholder => {
                    let m = marker.symbol();
                    format!(" {symbol} {m} AND {m}")
                }
                Marker::UseValue => format!(" {symbol} {lo} AND {hi}"),
            },
            Comparison::IsNull | Comparison::IsNotNull => format!(" {symbol}"),
            scalar => match (marker, scalar.operands().first()) {
                (Marker::UseValue, Some(v)) => format!(" {symbol} {v}"),
                _ => format!(" {symbol} {}", marker.symbol()),
            },
        }
    }

    /// Values bound by the rendered text, in placeholder order.
    ///
    /// Literal mode binds nothing; a subquery contributes its own query's values.
    fn bound_values(&self, marker: Marker) -> Vec<Value> {
        match self {
            Comparison::Subquery(_, query) => query.values().into_values().collect(),
            _ if marker == Marker::UseValue => Vec::new(),
            _ => self.operands().into_iter().cloned().collect(),
        }
    }
}

/// Combinator joining a condition to the one after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Logical {
    #[default]
    And,
    Or,
}

impl Logical {
    pub fn keyword(self) -> &'static str {
        match self {
            Logical::And => "AND",
            Logical::Or => "OR",
        }
    }
}

/// One column comparison inside a WHERE or HAVING clause.
#[derive(Debug, Clone)]
pub struct Condition {
    column: Column,
    comparison: Comparison,
    marker: Option<Marker>,
    link: Logical,
}

impl Condition {
    pub fn new(column: impl Into<Column>, comparison: Comparison) -> Self {
        Self {
            column: column.into(),
            comparison,
            marker: None,
            link: Logical::And,
        }
    }

    /// Override the clause's default rendering mode for this condition.
    pub fn with_marker(mut self, marker: Marker) -> Self {
        self.marker = Some(marker);
        self
    }

    /// Set the combinator joining this condition to the next.
    pub fn with_link(mut self, link: Logical) -> Self {
        self.link = link;
        self
    }

    pub fn column(&self) -> &Column {
        &self.column
    }

    pub fn comparison(&self) -> &Comparison {
        &self.comparison
    }

    pub fn link(&self) -> Logical {
        self.link
    }

    pub(crate) fn set_marker(&mut self, marker: Marker) {
        self.marker = Some(marker);
    }

    pub(crate) fn set_link(&mut self, link: Logical) {
        self.link = link;
    }

    /// The mode this condition renders with under a clause default.
    pub fn effective_marker(&self, default: Marker) -> Marker {
        self.marker.unwrap_or(default)
    }

    /// Render `column OP operands` (no leading space).
    pub fn render(&self, default: Marker) -> String {
        let fragment = self.comparison.render(self.effective_marker(default));
        match &self.comparison {
            Comparison::Subquery(op, _) if !op.takes_column() => fragment.trim_start().to_string(),
            _ => format!("{}{}", self.column, fragment),
        }
    }

    /// Values this condition binds, in the order its placeholders appear.
    pub fn values(&self, default: Marker) -> Vec<Value> {
        self.comparison.bound_values(self.effective_marker(default))
    }
}

/// Ordered conditions of one clause plus the clause's default rendering mode.
///
/// Shared by [`WhereBuilder`](crate::WhereBuilder) and
/// [`HavingBuilder`](crate::HavingBuilder).
#[derive(Debug, Clone, Default)]
pub(crate) struct ConditionList {
    conditions: Vec<Condition>,
    default_marker: Marker,
}

impl ConditionList {
    pub(crate) fn new(default_marker: Marker) -> Self {
        Self {
            conditions: Vec::new(),
            default_marker,
        }
    }

    pub(crate) fn default_marker(&self) -> Marker {
        self.default_marker
    }

    pub(crate) fn set_default_marker(&mut self, marker: Marker) {
        self.default_marker = marker;
    }

    pub(crate) fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub(crate) fn conditions_mut(&mut self) -> &mut Vec<Condition> {
        &mut self.conditions
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Join rendered conditions with their links.
    ///
    /// Conditions split into AND-separated runs of OR-joined conditions. When there is
    /// more than one run, runs of two or more are parenthesized:
    /// `a AND b OR c AND d` renders as `a AND (b OR c) AND d`. The last condition's
    /// link is ignored.
    pub(crate) fn build_conditions(&self) -> String {
        let mut runs: Vec<Vec<String>> = vec![Vec::new()];
        let last = self.conditions.len().saturating_sub(1);

        for (i, condition) in self.conditions.iter().enumerate() {
            if let Some(run) = runs.last_mut() {
                run.push(condition.render(self.default_marker));
            }
            if i < last && condition.link == Logical::And {
                runs.push(Vec::new());
            }
        }

        if runs.len() == 1 {
            return runs.remove(0).join(" OR ");
        }

        runs.into_iter()
            .map(|run| {
                if run.len() > 1 {
                    format!("({})", run.join(" OR "))
                } else {
                    run.concat()
                }
            })
            .collect::<Vec<_>>()
            .join(" AND ")
    }

    /// Render the clause with its keyword, or an empty string when there are no
    /// conditions.
    pub(crate) fn build(&self, keyword: &str) -> String {
        if self.conditions.is_empty() {
            return String::new();
        }
        strip_terminators(&format!(" {keyword} {}", self.build_conditions()))
    }

    /// Flatten bound values in insertion order into a 1-based map.
    pub(crate) fn values(&self) -> ParamMap {
        params_from(
            self.conditions
                .iter()
                .flat_map(|c| c.values(self.default_marker)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(conditions: Vec<Condition>) -> ConditionList {
        let mut list = ConditionList::new(Marker::Placeholder);
        list.conditions_mut().extend(conditions);
        list
    }

    #[test]
    fn scalar_render() {
        let c = Condition::new("age", Comparison::GreaterThan(18.into()));
        assert_eq!(c.render(Marker::Placeholder), "age > ?");
        assert_eq!(c.render(Marker::UseValue), "age > 18");
        assert_eq!(c.values(Marker::Placeholder), vec![Value::Int(18)]);
        assert!(c.values(Marker::UseValue).is_empty());
    }

    #[test]
    fn in_list_render() {
        let c = Condition::new("x", Comparison::In(vec![1.into(), 2.into(), 3.into()]));
        assert_eq!(c.render(Marker::Placeholder), "x IN (?, ?, ?)");
        assert_eq!(c.render(Marker::UseValue), "x IN (1, 2, 3)");
    }

    #[test]
    fn between_render() {
        let c = Condition::new("n", Comparison::NotBetween(1.into(), 10.into()));
        assert_eq!(c.render(Marker::Placeholder), "n NOT BETWEEN ? AND ?");
        assert_eq!(c.render(Marker::UseValue), "n NOT BETWEEN 1 AND 10");
        assert_eq!(c.values(Marker::Placeholder), vec![Value::Int(1), Value::Int(10)]);
    }

    #[test]
    fn null_checks_have_no_operand() {
        let c = Condition::new("deleted_at", Comparison::IsNull);
        assert_eq!(c.render(Marker::Placeholder), "deleted_at IS NULL");
        assert_eq!(c.render(Marker::UseValue), "deleted_at IS NULL");
        assert!(c.values(Marker::Placeholder).is_empty());
    }

    #[test]
    fn literal_null_renders_empty() {
        let c = Condition::new("x", Comparison::Equals(Value::Null));
        assert_eq!(c.render(Marker::UseValue), "x = ");
        assert_eq!(c.values(Marker::Placeholder), vec![Value::Null]);
    }

    #[test]
    fn condition_marker_overrides_default() {
        let c = Condition::new("a", Comparison::Equals(1.into())).with_marker(Marker::UseValue);
        assert_eq!(c.render(Marker::Placeholder), "a = 1");
        assert!(c.values(Marker::Placeholder).is_empty());
    }

    #[test]
    fn and_is_default_link() {
        let l = list(vec![
            Condition::new("a", Comparison::Equals(1.into())),
            Condition::new("b", Comparison::Equals(2.into())),
        ]);
        assert_eq!(l.build("WHERE"), " WHERE a = ? AND b = ?");
    }

    #[test]
    fn or_alone_is_not_grouped() {
        let l = list(vec![
            Condition::new("a", Comparison::Equals(1.into())).with_link(Logical::Or),
            Condition::new("b", Comparison::Equals(2.into())).with_link(Logical::Or),
        ]);
        assert_eq!(l.build("WHERE"), " WHERE a = ? OR b = ?");
    }

    #[test]
    fn or_run_is_grouped_between_ands() {
        let l = list(vec![
            Condition::new("a", Comparison::Equals(1.into())),
            Condition::new("b", Comparison::Equals(2.into())).with_link(Logical::Or),
            Condition::new("c", Comparison::Equals(3.into())),
            Condition::new("d", Comparison::Equals(4.into())),
        ]);
        assert_eq!(l.build("WHERE"), " WHERE a = ? AND (b = ? OR c = ?) AND d = ?");
        let values: Vec<_> = l.values().into_values().collect();
        assert_eq!(
            values,
            vec![Value::Int(1), Value::Int(2), Value::Int(3), Value::Int(4)]
        );
    }

    #[test]
    fn empty_list_builds_nothing() {
        let l = ConditionList::new(Marker::Placeholder);
        assert_eq!(l.build("HAVING"), "");
        assert!(l.values().is_empty());
    }
}
