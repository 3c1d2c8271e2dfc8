//! # sqlclause
//!
//! Fluent clause builders that render parameterized SQL for Postgres.
//!
//! ## Features
//!
//! - **Structured conditions**: WHERE/HAVING conditions are values, rendered on `build()`
//! - **Two rendering modes**: `?` placeholders with a 1-based parameter map, or inline literals
//! - **Consistent params**: the `?` count of a clause always equals its number of values
//! - **Joins and CTEs**: keyword and comma joins, `WITH` bindings with column checks
//! - **Sealed output**: `QueryBuilder::build()` returns an immutable [`BuiltQuery`]
//! - **Transaction-friendly**: execute against anything implementing [`GenericClient`]
//!
//! ## Example
//!
//! ```ignore
//! use sqlclause::{Order, QueryBuilder};
//!
//! let mut qb = QueryBuilder::new();
//! qb.select(["id", "name"]).from("users");
//! qb.filter(|w| {
//!     w.where_("age").greater_than(18).and()
//!         .where_("status").in_list(["active", "trial"])?.end();
//!     Ok(())
//! })?;
//! qb.order_by("name", Order::Asc).limit(10);
//!
//! let query = qb.build()?;
//! assert_eq!(
//!     query.sql(),
//!     "SELECT id, name FROM users WHERE age > ? AND status IN (?, ?) ORDER BY name ASC LIMIT 10"
//! );
//! let rows = query.fetch_all(&client).await?;
//! ```

pub mod builder;
pub mod built;
pub mod client;
pub mod column;
pub mod condition;
pub mod config;
pub mod cte;
pub mod error;
pub mod marker;
pub mod placeholder;
pub mod value;

pub use builder::{
    ComparisonHandler, ConditionClause, HavingBuilder, JoinBuilder, JoinCondition, JoinType,
    Order, OrderBy, QueryBuilder, SqlBuilder, WhereBuilder,
};
pub use built::{BuiltQuery, Diagnostic};
pub use client::GenericClient;
pub use column::{AggregateFn, Aggregation, Column, MathOperation};
pub use condition::{Comparison, Condition, Logical, SubqueryOp};
pub use config::QueryConfig;
pub use cte::{CteBinding, WithBuilder, WithColumnBuilder};
pub use error::{QueryError, QueryResult};
pub use marker::Marker;
pub use value::{ParamMap, Value, concat_params, params_from};
