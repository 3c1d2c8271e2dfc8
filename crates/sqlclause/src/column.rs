//! Column expressions with optional aggregation.
//!
//! # Example
//! ```ignore
//! use sqlclause::{AggregateFn, Aggregation, Column};
//!
//! let mut sum = Aggregation::new(AggregateFn::Sum);
//! sum.round(2);
//! let total = Column::new("amount").aggregate(sum).alias("total");
//! assert_eq!(total.select_sql(), "ROUND(SUM(amount), 2) AS total");
//! ```

use std::fmt;

/// An aggregate function applied to a column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AggregateFn {
    Count,
    Sum,
    Avg,
    Min,
    Max,
    /// Any other single-argument SQL function, e.g. `UPPER`.
    Custom(String),
}

impl AggregateFn {
    pub fn name(&self) -> &str {
        match self {
            AggregateFn::Count => "COUNT",
            AggregateFn::Sum => "SUM",
            AggregateFn::Avg => "AVG",
            AggregateFn::Min => "MIN",
            AggregateFn::Max => "MAX",
            AggregateFn::Custom(name) => name,
        }
    }
}

/// Arithmetic operator joining several aggregate functions over the same column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MathOperation {
    #[default]
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl MathOperation {
    pub fn symbol(self) -> &'static str {
        match self {
            MathOperation::Add => "+",
            MathOperation::Subtract => "-",
            MathOperation::Multiply => "*",
            MathOperation::Divide => "/",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Round {
    places: u32,
    mode: Option<String>,
}

/// Aggregation applied to a [`Column`].
///
/// One function renders `FUNC(col)`; several are joined with the configured
/// [`MathOperation`], e.g. `SUM(col) - MIN(col)`. [`Aggregation::round`] wraps the
/// whole expression in `ROUND(expr, places)`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Aggregation {
    functions: Vec<AggregateFn>,
    operation: MathOperation,
    round: Option<Round>,
}

impl Aggregation {
    /// Create an aggregation with a single function.
    pub fn new(function: AggregateFn) -> Self {
        Self {
            functions: vec![function],
            ..Self::default()
        }
    }

    /// Add another function to the expression.
    pub fn function(&mut self, function: AggregateFn) -> &mut Self {
        self.functions.push(function);
        self
    }

    /// Set the operator joining multiple functions.
    pub fn operation(&mut self, operation: MathOperation) -> &mut Self {
        self.operation = operation;
        self
    }

    /// Round the result to `places` decimal places.
    pub fn round(&mut self, places: u32) -> &mut Self {
        self.round = Some(Round { places, mode: None });
        self
    }

    /// Round the result with a dialect-specific rounding mode argument.
    pub fn round_with_mode(&mut self, places: u32, mode: impl Into<String>) -> &mut Self {
        self.round = Some(Round {
            places,
            mode: Some(mode.into()),
        });
        self
    }

    /// Whether no function has been configured.
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty() && self.round.is_none()
    }

    fn apply(&self, column: &str) -> String {
        let expr = if self.functions.is_empty() {
            column.to_string()
        } else {
            self.functions
                .iter()
                .map(|func| format!("{}({})", func.name(), column))
                .collect::<Vec<_>>()
                .join(&format!(" {} ", self.operation.symbol()))
        };

        match &self.round {
            Some(Round {
                places,
                mode: Some(mode),
            }) => format!("ROUND({expr}, {places}, {mode})"),
            Some(Round { places, mode: None }) => format!("ROUND({expr}, {places})"),
            None => expr,
        }
    }
}

/// A column reference, optionally aggregated and aliased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    name: String,
    alias: Option<String>,
    aggregation: Option<Aggregation>,
}

impl Column {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: None,
            aggregation: None,
        }
    }

    /// Set the alias used in a SELECT list.
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        let alias = alias.into();
        self.alias = (!alias.is_empty()).then_some(alias);
        self
    }

    /// Wrap the column in an aggregation.
    pub fn aggregate(mut self, aggregation: Aggregation) -> Self {
        self.aggregation = (!aggregation.is_empty()).then_some(aggregation);
        self
    }

    /// The raw column name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Expression text without the alias: `name` or `FUNC(name)`.
    pub fn expr_sql(&self) -> String {
        match &self.aggregation {
            Some(agg) => agg.apply(&self.name),
            None => self.name.clone(),
        }
    }

    /// SELECT-list text: the expression followed by ` AS alias` when aliased.
    pub fn select_sql(&self) -> String {
        match &self.alias {
            Some(alias) => format!("{} AS {}", self.expr_sql(), alias),
            None => self.expr_sql(),
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.expr_sql())
    }
}

impl From<&str> for Column {
    fn from(name: &str) -> Self {
        Column::new(name)
    }
}

impl From<String> for Column {
    fn from(name: String) -> Self {
        Column::new(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_column() {
        assert_eq!(Column::new("age").to_string(), "age");
        assert_eq!(Column::new("age").alias("a").select_sql(), "age AS a");
    }

    #[test]
    fn single_function() {
        let col = Column::new("id").aggregate(Aggregation::new(AggregateFn::Count));
        assert_eq!(col.to_string(), "COUNT(id)");
    }

    #[test]
    fn multiple_functions_with_operation() {
        let mut agg = Aggregation::new(AggregateFn::Max);
        agg.function(AggregateFn::Min)
            .operation(MathOperation::Subtract);
        let col = Column::new("price").aggregate(agg);
        assert_eq!(col.to_string(), "MAX(price) - MIN(price)");
    }

    #[test]
    fn rounding_wraps_expression() {
        let mut avg = Aggregation::new(AggregateFn::Avg);
        avg.round(2);
        let col = Column::new("amount").aggregate(avg).alias("avg_amount");
        assert_eq!(col.select_sql(), "ROUND(AVG(amount), 2) AS avg_amount");

        let mut agg = Aggregation::default();
        agg.round_with_mode(1, "HALF_UP");
        assert_eq!(Column::new("x").aggregate(agg).to_string(), "ROUND(x, 1, HALF_UP)");
    }

    #[test]
    fn empty_aggregation_is_ignored() {
        let col = Column::new("x").aggregate(Aggregation::default());
        assert_eq!(col.to_string(), "x");
    }

    #[test]
    fn custom_function() {
        let col = Column::new("name").aggregate(Aggregation::new(AggregateFn::Custom("UPPER".into())));
        assert_eq!(col.to_string(), "UPPER(name)");
    }
}
