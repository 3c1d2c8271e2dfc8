//! End-to-end checks of the public builder API.
//!
//! These tests do NOT need a database; execution helpers are only type-checked.

#![allow(dead_code)]

use sqlclause::{
    AggregateFn, Aggregation, BuiltQuery, Column, Diagnostic, GenericClient, Marker, Order,
    QueryBuilder, QueryConfig, QueryError, QueryResult, SqlBuilder, Value, WhereBuilder,
    params_from,
};

fn report_query() -> QueryResult<QueryBuilder> {
    let mut paid = QueryBuilder::new();
    paid.select(["user_id", "amount"]).from("orders");
    paid.where_mut().where_("status").equals("paid").end();

    let mut qb = QueryBuilder::new();
    qb.with(|w| {
        w.cte("paid").columns(["user_id", "amount"]).query(paid);
    });
    qb.select([
        Column::new("u.name"),
        Column::new("p.amount")
            .aggregate(Aggregation::new(AggregateFn::Sum))
            .alias("total"),
    ])
    .from_as("paid", "p")
    .inner_join("users", Some("u"), "u.id = p.user_id")
    .group_by(["u.name"])
    .order_by("total", Order::Desc)
    .limit(5);
    qb.filter(|w| {
        w.where_("u.country").in_list(["DE", "FR"])?.and()
            .where_("u.age").between(18, 65).end();
        Ok(())
    })?;
    qb.having(|h| {
        h.having_with("p.amount", |agg| {
            agg.function(AggregateFn::Sum);
        })
        .greater_than(500)
        .end();
        Ok(())
    })?;
    Ok(qb)
}

#[test]
fn end_to_end_age_filter() {
    let mut w = WhereBuilder::new();
    w.where_("age").greater_than(18).end();
    assert_eq!(w.build(), " WHERE age > ?");
    assert_eq!(w.values(), params_from([Value::Int(18)]));
}

#[test]
fn report_query_renders_in_fragment_order() {
    let built = report_query().unwrap().build().unwrap();
    assert_eq!(
        built.sql(),
        "WITH paid (user_id, amount) AS (SELECT user_id, amount FROM orders WHERE status = ?) \
         SELECT u.name, SUM(p.amount) AS total FROM paid AS p \
         INNER JOIN users AS u ON u.id = p.user_id \
         WHERE u.country IN (?, ?) AND u.age BETWEEN ? AND ? \
         GROUP BY u.name HAVING SUM(p.amount) > ? ORDER BY total DESC LIMIT 5"
    );
    assert_eq!(
        built.params(),
        &params_from([
            Value::from("paid"),
            Value::from("DE"),
            Value::from("FR"),
            Value::Int(18),
            Value::Int(65),
            Value::Int(500),
        ])
    );
    assert_eq!(built.placeholder_count(), 6);
    assert!(built.diagnostics().is_empty());
}

#[test]
fn report_query_numbered() {
    let built = report_query().unwrap().build().unwrap();
    let numbered = built.to_numbered_sql();
    assert!(numbered.contains("WHERE status = $1)"));
    assert!(numbered.contains("u.country IN ($2, $3) AND u.age BETWEEN $4 AND $5"));
    assert!(numbered.contains("HAVING SUM(p.amount) > $6"));
    assert!(!numbered.contains('?'));
}

#[test]
fn build_is_repeatable() {
    let qb = report_query().unwrap();
    let first = qb.build().unwrap();
    let second = qb.build().unwrap();
    assert_eq!(first, second);
}

#[test]
fn literal_mode_report() {
    let mut qb = report_query().unwrap();
    qb.set_placeholders_enabled(false);
    let built = qb.build().unwrap();
    assert!(built.sql().contains("WITH paid (user_id, amount) AS (SELECT user_id, amount FROM orders WHERE status = 'paid')"));
    assert!(built.sql().contains("u.country IN ('DE', 'FR') AND u.age BETWEEN 18 AND 65"));
    assert!(built.sql().contains("HAVING SUM(p.amount) > 500"));
    assert!(built.params().is_empty());
    assert_eq!(built.placeholder_count(), 0);
}

#[test]
fn config_from_json() {
    let config: QueryConfig = serde_json::from_str(r#"{"placeholders_enabled": false}"#).unwrap();
    let mut qb = QueryBuilder::with_config(config);
    qb.from("t");
    qb.where_mut().where_("flag").equals(true).end();
    assert_eq!(qb.build().unwrap().sql(), "SELECT * FROM t WHERE flag = TRUE");
}

#[test]
fn per_condition_marker_survives_literal_query() {
    let mut qb = QueryBuilder::with_config(QueryConfig::new().placeholders(false));
    qb.from("users");
    qb.where_mut()
        .where_("name").equals("bob").and()
        .where_("token").marker(Marker::Placeholder).equals("secret").end();
    let built = qb.build().unwrap();
    assert_eq!(built.sql(), "SELECT * FROM users WHERE name = 'bob' AND token = ?");
    assert_eq!(built.params(), &params_from([Value::from("secret")]));
}

#[test]
fn cte_mismatch_still_builds() {
    let mut inner = QueryBuilder::new();
    inner.select(["a", "b", "c"]).from("t");

    let mut qb = QueryBuilder::new();
    qb.with(|w| {
        w.cte("x").columns(["a", "b"]).query(inner);
    });
    qb.from("x");

    let built = qb.build().unwrap();
    assert!(built.sql().starts_with("WITH x (a, b) AS (SELECT a, b, c FROM t)"));
    assert_eq!(
        built.diagnostics(),
        &[Diagnostic::ColumnCountMismatch {
            alias: "x".into(),
            declared: 2,
            selected: 3,
        }]
    );
}

#[test]
fn arity_errors_are_immediate() {
    let mut w = WhereBuilder::new();
    let err = w.where_("id").in_list(Vec::<i64>::new()).err().unwrap();
    assert!(matches!(err, QueryError::Arity { got: 0, .. }));
    assert!(w.is_empty());
}

#[test]
fn missing_table_is_an_error() {
    let mut qb = QueryBuilder::new();
    qb.select(["1"]);
    let err = qb.build().unwrap_err();
    assert!(matches!(err, QueryError::MissingTable));
}

#[test]
fn built_query_serializes() {
    let built = report_query().unwrap().build().unwrap();
    let json = serde_json::to_value(&built).unwrap();
    assert_eq!(json["params"]["1"], "paid");
    assert_eq!(json["params"]["6"], 500);
}

#[test]
fn literal_config_applies_to_every_cte() {
    let mut inner = QueryBuilder::new();
    inner.select(["id"]).from("orders");
    inner.where_mut().where_("amount").greater_than(100).end();

    let mut qb = QueryBuilder::with_config(QueryConfig::new().placeholders(false));
    qb.with(|w| {
        w.cte("big").query(inner);
    });
    qb.from("big");

    let built = qb.build().unwrap();
    assert_eq!(built.placeholder_count(), 0);
    assert!(built.params().is_empty());
}

#[test]
fn cte_only_query_with_filter_fails() {
    let mut inner = QueryBuilder::new();
    inner.select(["id"]).from("orders");

    let mut qb = QueryBuilder::new();
    qb.with(|w| {
        w.cte("big").query(inner);
    });
    qb.where_mut().where_("id").equals(7).end();
    assert!(matches!(qb.build(), Err(QueryError::Validation(_))));
}

#[test]
fn clause_fragment_is_a_snapshot() {
    let mut w = WhereBuilder::new();
    w.where_("a").equals(1).end();
    let fragment = w.fragment();
    w.where_("b").equals(2).end();
    assert_eq!(fragment.sql(), " WHERE a = ?");
    assert_eq!(fragment.params(), &params_from([Value::Int(1)]));
}

// ── Compile checks ──────────────────────────────────────────────────────────

async fn run_on(client: &impl GenericClient, built: &BuiltQuery) -> QueryResult<usize> {
    let rows = built.fetch_all(client).await?;
    let _ = built.fetch_opt(client).await?;
    let _ = built.fetch_one(client).await?;
    let _ = built.execute(client).await?;
    Ok(rows.len())
}

#[test]
fn compile_execution_helpers() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<BuiltQuery>();
    assert_send_sync::<QueryBuilder>();
}
