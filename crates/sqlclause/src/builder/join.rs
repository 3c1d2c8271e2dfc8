//! JOIN fragments.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    Inner,
    Left,
    Right,
    Full,
    Cross,
}

impl JoinType {
    pub fn keyword(self) -> &'static str {
        match self {
            JoinType::Inner => "INNER JOIN",
            JoinType::Left => "LEFT JOIN",
            JoinType::Right => "RIGHT JOIN",
            JoinType::Full => "FULL JOIN",
            JoinType::Cross => "CROSS JOIN",
        }
    }
}

/// One joined table.
///
/// The legacy comma form (`, table AS alias`) has no predicate; the join condition
/// then belongs in the WHERE clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinCondition {
    Keyword {
        kind: JoinType,
        table: String,
        alias: Option<String>,
        on: String,
    },
    Legacy {
        table: String,
        alias: Option<String>,
    },
}

impl JoinCondition {
    pub fn is_legacy(&self) -> bool {
        matches!(self, JoinCondition::Legacy { .. })
    }
}

fn write_table(f: &mut fmt::Formatter<'_>, table: &str, alias: Option<&str>) -> fmt::Result {
    match alias {
        Some(alias) => write!(f, "{table} AS {alias}"),
        None => f.write_str(table),
    }
}

impl fmt::Display for JoinCondition {
    /// Renders with a leading separator: ` INNER JOIN t AS a ON ...` or `, t AS a`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JoinCondition::Keyword {
                kind,
                table,
                alias,
                on,
            } => {
                write!(f, " {} ", kind.keyword())?;
                write_table(f, table, alias.as_deref())?;
                if *kind != JoinType::Cross {
                    write!(f, " ON {on}")?;
                }
                Ok(())
            }
            JoinCondition::Legacy { table, alias } => {
                f.write_str(", ")?;
                write_table(f, table, alias.as_deref())
            }
        }
    }
}

/// Ordered JOIN fragments of one query.
#[derive(Debug, Clone, Default)]
pub struct JoinBuilder {
    joins: Vec<JoinCondition>,
}

impl JoinBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, join: JoinCondition) -> &mut Self {
        self.joins.push(join);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.joins.is_empty()
    }

    pub fn joins(&self) -> &[JoinCondition] {
        &self.joins
    }

    pub fn has_legacy_joins(&self) -> bool {
        self.joins.iter().any(JoinCondition::is_legacy)
    }

    /// Concatenate fragments in insertion order.
    pub fn build(&self) -> String {
        self.joins.iter().map(ToString::to_string).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keyword(kind: JoinType, alias: Option<&str>) -> JoinCondition {
        JoinCondition::Keyword {
            kind,
            table: "orders".into(),
            alias: alias.map(Into::into),
            on: "o.user_id = u.id".into(),
        }
    }

    #[test]
    fn keyword_join() {
        assert_eq!(
            keyword(JoinType::Inner, Some("o")).to_string(),
            " INNER JOIN orders AS o ON o.user_id = u.id"
        );
        assert_eq!(
            keyword(JoinType::Left, None).to_string(),
            " LEFT JOIN orders ON o.user_id = u.id"
        );
    }

    #[test]
    fn cross_join_has_no_predicate() {
        assert_eq!(keyword(JoinType::Cross, Some("o")).to_string(), " CROSS JOIN orders AS o");
    }

    #[test]
    fn legacy_join() {
        let j = JoinCondition::Legacy {
            table: "roles".into(),
            alias: Some("r".into()),
        };
        assert_eq!(j.to_string(), ", roles AS r");
    }

    #[test]
    fn builder_keeps_insertion_order() {
        let mut b = JoinBuilder::new();
        b.push(keyword(JoinType::Inner, Some("o"))).push(JoinCondition::Legacy {
            table: "roles".into(),
            alias: None,
        });
        assert_eq!(b.build(), " INNER JOIN orders AS o ON o.user_id = u.id, roles");
        assert!(b.has_legacy_joins());
    }
}
