//! Example demonstrating WHERE / HAVING / JOIN clause building.
//!
//! Run with:
//!   cargo run --example clause_builder -p sqlclause

use sqlclause::{
    AggregateFn, Column, HavingBuilder, Marker, Order, QueryBuilder, QueryConfig, QueryResult,
    SqlBuilder, WhereBuilder,
};

fn demo_where() -> QueryResult<()> {
    let mut w = WhereBuilder::new();
    w.where_("age").greater_than(18).and()
        .where_("role").in_list(["admin", "owner"])?.or()
        .where_("invited").equals(true).and()
        .where_("created_at").is_not_null().end();

    println!("[WHERE]");
    println!("  SQL:    {}", w.build());
    println!("  params: {:?}", w.values());
    println!();
    Ok(())
}

fn demo_literal_mode() {
    let mut w = WhereBuilder::with_marker(Marker::UseValue);
    w.where_("name").equals("O'Brien").and()
        .where_("score").between(10, 20).and()
        .where_("tag").marker(Marker::Placeholder).like("%vip%").end();

    println!("[literal mode with one bound condition]");
    println!("  SQL:    {}", w.build());
    println!("  params: {:?}", w.values());
    println!();
}

fn demo_having() {
    let mut h = HavingBuilder::new();
    h.having_with("amount", |agg| {
        agg.function(AggregateFn::Sum).round(2);
    })
    .greater_than(1000)
    .end();

    let built = h.fragment();
    println!("[HAVING]");
    println!("  SQL:    {}", built.sql());
    println!("  params: {:?}", built.params());
    println!();
}

fn demo_full_select() -> QueryResult<()> {
    let mut recent = QueryBuilder::new();
    recent.select(["user_id"]).from("logins");
    recent.where_mut().where_("at").greater_than("2024-01-01").end();

    let mut qb = QueryBuilder::with_config(QueryConfig::new().log_sql(true));
    qb.select([
        Column::new("u.id"),
        Column::new("u.name"),
        Column::new("o.amount")
            .aggregate(sqlclause::Aggregation::new(AggregateFn::Sum))
            .alias("total"),
    ])
    .from_as("users", "u")
    .left_join("orders", Some("o"), "o.user_id = u.id")
    .group_by(["u.id", "u.name"])
    .order_by("total", Order::Desc)
    .limit(10);

    qb.filter(|w| {
        w.where_("u.status").equals("active").and()
            .where_("u.id").in_subquery(recent)?.end();
        Ok(())
    })?;
    qb.having(|h| {
        h.having_with("o.amount", |agg| {
            agg.function(AggregateFn::Sum);
        })
        .greater_than(100)
        .end();
        Ok(())
    })?;

    let built = qb.build()?;
    println!("[full SELECT]");
    println!("  SQL:      {}", built.sql());
    println!("  numbered: {}", built.to_numbered_sql());
    println!("  params:   {:?}", built.params());
    println!();
    Ok(())
}

fn main() -> QueryResult<()> {
    println!("=== Clause Builder Examples ===\n");

    demo_where()?;
    demo_literal_mode();
    demo_having();
    demo_full_select()?;

    Ok(())
}
