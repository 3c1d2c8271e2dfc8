//! WHERE clause builder.

use super::comparison::{ComparisonHandler, ConditionClause};
use super::traits::SqlBuilder;
use crate::column::{Aggregation, Column};
use crate::condition::{Condition, ConditionList};
use crate::marker::Marker;
use crate::value::ParamMap;

/// Reusable WHERE clause builder.
///
/// Holds an ordered list of conditions and the default [`Marker`] new conditions
/// render with. [`build`](Self::build) and [`values`](Self::values) can be called any
/// number of times and always agree: `values().len()` equals the number of `?` in
/// `build()`.
#[derive(Debug, Clone, Default)]
pub struct WhereBuilder {
    list: ConditionList,
}

impl WhereBuilder {
    /// Create a builder that renders `?` placeholders.
    pub fn new() -> Self {
        Self::with_marker(Marker::Placeholder)
    }

    /// Create a builder with an explicit default rendering mode.
    pub fn with_marker(marker: Marker) -> Self {
        Self {
            list: ConditionList::new(marker),
        }
    }

    pub fn default_marker(&self) -> Marker {
        self.list.default_marker()
    }

    /// Change the default mode. Applies to every condition without its own override,
    /// including ones already added.
    pub fn set_default_marker(&mut self, marker: Marker) {
        self.list.set_default_marker(marker);
    }

    /// Start a comparison on `column`.
    pub fn where_(&mut self, column: impl Into<Column>) -> ComparisonHandler<'_, Self> {
        ComparisonHandler::new(self, column.into())
    }

    /// Start a comparison on an aggregated `column`.
    pub fn where_with(
        &mut self,
        column: impl Into<String>,
        configure: impl FnOnce(&mut Aggregation),
    ) -> ComparisonHandler<'_, Self> {
        let mut aggregation = Aggregation::default();
        configure(&mut aggregation);
        let column = Column::new(column).aggregate(aggregation);
        ComparisonHandler::new(self, column)
    }

    /// Append a prebuilt condition.
    pub fn push(&mut self, condition: Condition) -> &mut Self {
        self.list.conditions_mut().push(condition);
        self
    }

    /// Check if any conditions have been added.
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn len(&self) -> usize {
        self.list.conditions().len()
    }

    pub fn conditions(&self) -> &[Condition] {
        self.list.conditions()
    }

    /// Build the clause: `" WHERE ..."`, or `""` when there are no conditions.
    ///
    /// Statement terminators are stripped so the fragment is safe to embed.
    pub fn build(&self) -> String {
        self.list.build("WHERE")
    }

    /// Condition text without the `WHERE` keyword.
    pub fn build_clause(&self) -> String {
        self.list.build_conditions()
    }

    /// Bound values keyed by 1-based placeholder position.
    pub fn values(&self) -> ParamMap {
        self.list.values()
    }
}

impl ConditionClause for WhereBuilder {
    fn conditions_mut(&mut self) -> &mut Vec<Condition> {
        self.list.conditions_mut()
    }
}

impl SqlBuilder for WhereBuilder {
    fn build_sql(&self) -> String {
        self.build()
    }

    fn values(&self) -> ParamMap {
        WhereBuilder::values(self)
    }
}
