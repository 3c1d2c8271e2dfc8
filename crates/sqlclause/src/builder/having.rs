//! HAVING clause builder.

use super::comparison::{ComparisonHandler, ConditionClause};
use super::traits::SqlBuilder;
use crate::column::{Aggregation, Column};
use crate::condition::{Condition, ConditionList};
use crate::marker::Marker;
use crate::value::ParamMap;

/// HAVING clause builder. Same rules as [`WhereBuilder`](super::WhereBuilder), with
/// the `HAVING` keyword and aggregate-friendly entry points.
#[derive(Debug, Clone, Default)]
pub struct HavingBuilder {
    list: ConditionList,
}

impl HavingBuilder {
    pub fn new() -> Self {
        Self::with_marker(Marker::Placeholder)
    }

    pub fn with_marker(marker: Marker) -> Self {
        Self {
            list: ConditionList::new(marker),
        }
    }

    pub fn default_marker(&self) -> Marker {
        self.list.default_marker()
    }

    pub fn set_default_marker(&mut self, marker: Marker) {
        self.list.set_default_marker(marker);
    }

    /// Start a comparison on `column`, usually an aggregated [`Column`].
    pub fn having(&mut self, column: impl Into<Column>) -> ComparisonHandler<'_, Self> {
        ComparisonHandler::new(self, column.into())
    }

    /// Start a comparison on `column` wrapped in the configured aggregation.
    ///
    /// ```ignore
    /// h.having_with("amount", |agg| { agg.function(AggregateFn::Sum); })
    ///     .greater_than(100)
    ///     .end();
    /// assert_eq!(h.build(), " HAVING SUM(amount) > ?");
    /// ```
    pub fn having_with(
        &mut self,
        column: impl Into<String>,
        configure: impl FnOnce(&mut Aggregation),
    ) -> ComparisonHandler<'_, Self> {
        let mut aggregation = Aggregation::default();
        configure(&mut aggregation);
        let column = Column::new(column).aggregate(aggregation);
        ComparisonHandler::new(self, column)
    }

    pub fn push(&mut self, condition: Condition) -> &mut Self {
        self.list.conditions_mut().push(condition);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn len(&self) -> usize {
        self.list.conditions().len()
    }

    pub fn conditions(&self) -> &[Condition] {
        self.list.conditions()
    }

    /// Build the clause: `" HAVING ..."`, or `""` when empty.
    pub fn build(&self) -> String {
        self.list.build("HAVING")
    }

    pub fn values(&self) -> ParamMap {
        self.list.values()
    }
}

impl ConditionClause for HavingBuilder {
    fn conditions_mut(&mut self) -> &mut Vec<Condition> {
        self.list.conditions_mut()
    }
}

impl SqlBuilder for HavingBuilder {
    fn build_sql(&self) -> String {
        self.build()
    }

    fn values(&self) -> ParamMap {
        HavingBuilder::values(self)
    }
}
