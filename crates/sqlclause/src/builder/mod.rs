//! Clause builders and the SELECT orchestrator.
//!
//! ## Design
//!
//! - Conditions are structured values, rendered only when a clause is built.
//! - `build()` and `values()` are pure reads and always agree on placeholder count.
//! - Placeholders are `?`; [`BuiltQuery`](crate::BuiltQuery) rewrites them to
//!   `$1, $2, ...` for execution.

pub mod comparison;
pub mod having;
pub mod join;
pub mod select;
pub mod traits;
pub mod where_builder;

pub use comparison::{ComparisonHandler, ConditionClause};
pub use having::HavingBuilder;
pub use join::{JoinBuilder, JoinCondition, JoinType};
pub use select::{Order, OrderBy, QueryBuilder};
pub use traits::SqlBuilder;
pub use where_builder::WhereBuilder;
