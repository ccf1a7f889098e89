use super::*;
use crate::condition::{ConditionBuilder, Params};
use crate::error::QueryError;
use crate::format::{GenericFormatter, MySqlFormatter, PostgresFormatter};
use crate::types::Range;
use crate::value::Value;

fn sql(query: &SelectBuilder) -> String {
    query.inspect(&GenericFormatter).unwrap().sql
}

fn values(query: &SelectBuilder) -> Vec<Value> {
    query
        .inspect(&GenericFormatter)
        .unwrap()
        .bindings
        .into_values()
}

#[test]
fn test_simple_select() {
    assert_eq!(sql(&select("users")), "SELECT * FROM users");
}

#[test]
fn test_select_columns_distinct_alias() {
    let q = select("users")
        .from("users", "u")
        .columns(["u.id", "u.name"])
        .distinct();
    assert_eq!(sql(&q), "SELECT DISTINCT u.id, u.name FROM users AS u");
}

#[test]
fn test_where_op_order_limit() {
    let q = select("users")
        .where_op("status", "IN", vec!["a", "b"])
        .unwrap()
        .where_op("age", ">", 18)
        .unwrap()
        .order_by("id", "DESC")
        .unwrap()
        .limit(10);
    assert_eq!(
        sql(&q),
        "SELECT * FROM users WHERE status IN (?, ?) AND age > ? ORDER BY id DESC LIMIT 10"
    );
    assert_eq!(
        values(&q),
        vec![Value::from("a"), Value::from("b"), Value::Int(18)]
    );
}

#[test]
fn test_where_in_dedupes_and_drops_nulls() {
    let q = select("t").where_in("id", [Value::Int(1), Value::Int(1), Value::Null, Value::Int(2)]);
    assert_eq!(sql(&q), "SELECT * FROM t WHERE id IN (?, ?)");
    assert_eq!(values(&q), vec![Value::Int(1), Value::Int(2)]);
}

#[test]
fn test_where_in_empty_is_always_false() {
    let q = select("t").where_in("id", Vec::<i64>::new());
    assert_eq!(sql(&q), "SELECT * FROM t WHERE 1 = 0");
    assert!(values(&q).is_empty());
}

#[test]
fn test_where_not_shorthand() {
    let q = select("t")
        .where_not("status", vec!["x", "y"])
        .where_not("kind", "a")
        .where_not("deleted_at", Value::Null);
    assert_eq!(
        sql(&q),
        "SELECT * FROM t WHERE status NOT IN (?, ?) AND kind != ? AND deleted_at IS NOT NULL"
    );
}

#[test]
fn test_where_eq_null_has_no_binding() {
    let q = select("t").where_eq("deleted_at", Value::Null);
    assert_eq!(sql(&q), "SELECT * FROM t WHERE deleted_at IS NULL");
    assert!(values(&q).is_empty());
}

#[test]
fn test_where_range_and_not_in_range() {
    let q = select("t")
        .where_range("age", Range::inclusive(18, 65))
        .where_not_in_range("score", Range::at_least(90));
    assert_eq!(
        sql(&q),
        "SELECT * FROM t WHERE (age >= ? AND age <= ?) AND NOT (score >= ?)"
    );
    assert_eq!(
        values(&q),
        vec![Value::Int(18), Value::Int(65), Value::Int(90)]
    );
}

#[test]
fn test_where_fn_builds_parenthesized_chain() {
    let q = select("users")
        .where_fn("age", |c| c.greater_than(18)?.or_same()?.is_null())
        .unwrap()
        .where_eq("active", true);
    assert_eq!(
        sql(&q),
        "SELECT * FROM users WHERE (age > ? OR age IS NULL) AND active = ?"
    );
}

#[test]
fn test_where_raw_with_params() {
    let q = select("t")
        .where_raw_with(
            "a = ? OR b = ?",
            Params::Positional(vec![Value::Int(1), Value::Int(2)]),
        )
        .unwrap();
    assert_eq!(sql(&q), "SELECT * FROM t WHERE a = ? OR b = ?");
    assert_eq!(values(&q), vec![Value::Int(1), Value::Int(2)]);
}

#[test]
fn test_where_raw_param_count_mismatch() {
    let err = select("t")
        .where_raw_with("a = ? OR b = ?", Params::Positional(vec![Value::Int(1)]))
        .unwrap_err();
    assert!(matches!(err, QueryError::Validation(_)));
}

#[test]
fn test_filter_rejects_undefined_chain() {
    let err = select("t")
        .where_cond(ConditionBuilder::column("age"))
        .unwrap_err();
    assert!(matches!(err, QueryError::Validation(_)));
}

#[test]
fn test_invalid_sort_direction() {
    let err = select("t").order_by("id", "sideways").unwrap_err();
    assert!(matches!(err, QueryError::InvalidSortDirection(ref d) if d == "sideways"));

    let q = select("t").order_by("id", "desc").unwrap();
    assert_eq!(sql(&q), "SELECT * FROM t ORDER BY id DESC");
}

#[test]
fn test_order_by_same_column_replaces_direction() {
    let q = select("t")
        .order_by_asc("a")
        .order_by_asc("b")
        .order_by_desc("a");
    assert_eq!(sql(&q), "SELECT * FROM t ORDER BY a DESC, b ASC");
}

#[test]
fn test_copy_is_isolated() {
    let base = select("users").where_eq("status", "active");
    let before = base.inspect(&GenericFormatter).unwrap();

    let derived = base
        .copy()
        .where_op("age", ">", 18)
        .unwrap()
        .order_by_desc("id")
        .limit(1);

    assert_eq!(base.inspect(&GenericFormatter).unwrap(), before);
    assert_eq!(
        sql(&derived),
        "SELECT * FROM users WHERE status = ? AND age > ? ORDER BY id DESC LIMIT 1"
    );
}

#[test]
fn test_group_by_having() {
    let q = select("orders")
        .columns(["user_id", "COUNT(*) AS n"])
        .where_eq("status", "paid")
        .group_by(["user_id"])
        .having_op("COUNT(*)", ">", 5)
        .unwrap();
    assert_eq!(
        sql(&q),
        "SELECT user_id, COUNT(*) AS n FROM orders WHERE status = ? GROUP BY user_id HAVING COUNT(*) > ?"
    );
    assert_eq!(values(&q), vec![Value::from("paid"), Value::Int(5)]);
}

#[test]
fn test_postgres_numbers_where_then_having() {
    let q = select("orders")
        .where_eq("status", "paid")
        .group_by(["user_id"])
        .having_op("SUM(total)", ">=", 100)
        .unwrap()
        .offset(20)
        .limit(10);
    let rendered = q.inspect(&PostgresFormatter).unwrap();
    assert_eq!(
        rendered.sql,
        r#"SELECT * FROM "orders" WHERE "status" = $1 GROUP BY "user_id" HAVING SUM(total) >= $2 LIMIT 10 OFFSET 20"#
    );
    assert_eq!(rendered.bindings.len(), 2);
}

#[test]
fn test_lock_clause() {
    let q = select("jobs").where_eq("id", 1).lock();
    assert_eq!(sql(&q), "SELECT * FROM jobs WHERE id = ? FOR UPDATE");
}

#[test]
fn test_joins() {
    let q = select("users")
        .from("users", "u")
        .left_join("orders", |j| {
            j.alias("o")
                .on_columns("o.user_id", "=", "u.id")?
                .and(Predicate::eq("o.status", "paid"))
        })
        .unwrap()
        .where_op("u.age", ">=", 21)
        .unwrap();
    assert_eq!(
        sql(&q),
        "SELECT * FROM users AS u LEFT JOIN orders AS o ON o.user_id = u.id AND o.status = ? WHERE u.age >= ?"
    );
    assert_eq!(values(&q), vec![Value::from("paid"), Value::Int(21)]);
}

#[test]
fn test_join_or_and_cross() {
    let q = select("a")
        .join(
            JoinBuilder::inner("b")
                .on_columns("b.a_id", "=", "a.id")
                .unwrap()
                .or(Predicate::raw("b.shared = TRUE"))
                .unwrap(),
        )
        .join(JoinBuilder::cross("c"));
    assert_eq!(
        sql(&q),
        "SELECT * FROM a INNER JOIN b ON b.a_id = a.id OR b.shared = TRUE CROSS JOIN c"
    );
}

#[test]
fn test_join_without_on_is_rejected() {
    let q = select("a").join(JoinBuilder::left("b"));
    let err = q.inspect(&GenericFormatter).unwrap_err();
    assert!(matches!(err, QueryError::Validation(_)));
}

#[test]
fn test_on_columns_rejects_injection_and_like() {
    let err = JoinBuilder::inner("b")
        .on_columns("b.id; DROP TABLE x", "=", "a.id")
        .unwrap_err();
    assert!(matches!(err, QueryError::Validation(_)));

    let err = JoinBuilder::inner("b")
        .on_columns("b.name", "LIKE", "a.name")
        .unwrap_err();
    assert!(matches!(err, QueryError::Validation(_)));
}

#[test]
fn test_predicate_from_parts_arity() {
    let err = Predicate::from_parts(vec![]).unwrap_err();
    assert!(matches!(err, QueryError::InvalidArgumentCount(0)));

    let four = vec![
        Value::from("a"),
        Value::from("="),
        Value::Int(1),
        Value::Int(2),
    ];
    let err = Predicate::from_parts(four).unwrap_err();
    assert!(matches!(err, QueryError::InvalidArgumentCount(4)));

    let err = Predicate::from_parts(vec![Value::from("a = 1")]).unwrap_err();
    assert!(matches!(err, QueryError::Validation(_)));

    let p = Predicate::from_parts(vec![Value::from("id"), Value::from(vec![1, 2])]).unwrap();
    assert!(matches!(p, Predicate::In { .. }));

    let p = Predicate::from_parts(vec![Value::from("id"), Value::Int(7)]).unwrap();
    assert_eq!(p, Predicate::eq("id", 7));
}

#[test]
fn test_predicate_from_json() {
    let p = Predicate::from_json(&serde_json::json!(["age", ">=", 18])).unwrap();
    let q = select("users").filter(p).unwrap();
    assert_eq!(sql(&q), "SELECT * FROM users WHERE age >= ?");

    let err = Predicate::from_json(&serde_json::json!({"age": 18})).unwrap_err();
    assert!(matches!(err, QueryError::Validation(_)));

    let err = Predicate::from_json(&serde_json::json!(["age", "~~", 18])).unwrap_err();
    assert!(matches!(err, QueryError::UnknownOperator(_)));
}

#[test]
fn test_dynamic_predicate_cannot_inject_sql() {
    let err = Predicate::from_json(&serde_json::json!(["1 = 1) OR (1 = 1"])).unwrap_err();
    assert!(matches!(err, QueryError::Validation(_)));

    let err = Predicate::from_json(&serde_json::json!(["id = 1 OR 1", 7])).unwrap_err();
    assert!(matches!(err, QueryError::Validation(_)));

    let p = Predicate::from_json(&serde_json::json!(["o.tenant_id", "=", 7])).unwrap();
    let q = select("orders").from("orders", "o").filter(p).unwrap();
    assert_eq!(sql(&q), "SELECT * FROM orders AS o WHERE o.tenant_id = ?");
}

#[test]
fn test_list_values_are_never_bound_whole() {
    let q = select("t").where_eq("id", vec![1, 2]);
    assert_eq!(sql(&q), "SELECT * FROM t WHERE id IN (?, ?)");
    assert_eq!(values(&q), vec![Value::Int(1), Value::Int(2)]);

    let q = select("t").filter(Predicate::eq("id", vec![3, 3, 4])).unwrap();
    assert_eq!(sql(&q), "SELECT * FROM t WHERE id IN (?, ?)");
    assert_eq!(values(&q), vec![Value::Int(3), Value::Int(4)]);

    let err = select("t").where_op("age", ">", vec![1, 2]).unwrap_err();
    assert!(matches!(err, QueryError::Validation(_)));

    let err = select("t").where_op("id", "=", vec![1, 2]).unwrap_err();
    assert!(matches!(err, QueryError::Validation(_)));
}

#[test]
fn test_on_columns_quotes_both_sides() {
    let q = select("users")
        .from("users", "u")
        .inner_join("orders", |j| j.alias("o").on_columns("o.UserId", "!=", "u.Id"))
        .unwrap();
    assert_eq!(
        q.inspect(&PostgresFormatter).unwrap().sql,
        r#"SELECT * FROM "users" AS "u" INNER JOIN "orders" AS "o" ON "o"."UserId" != "u"."Id""#
    );
    assert_eq!(
        q.inspect(&MySqlFormatter).unwrap().sql,
        "SELECT * FROM `users` AS `u` INNER JOIN `orders` AS `o` ON `o`.`UserId` != `u`.`Id`"
    );
    assert!(q.inspect(&PostgresFormatter).unwrap().bindings.is_empty());
}

#[test]
fn test_negated_raw_predicate_is_rejected() {
    let err = Predicate::raw("a = b").into_condition(true).unwrap_err();
    assert!(matches!(err, QueryError::NegationUnsupported { .. }));
}

#[test]
fn test_to_sql_inlines_values() {
    let q = select("users")
        .where_eq("name", "O'Brien")
        .where_op("age", ">", 30)
        .unwrap();
    assert_eq!(
        q.to_sql().unwrap(),
        "SELECT * FROM users WHERE name = 'O''Brien' AND age > 30"
    );
}

// ==================== INSERT ====================

#[test]
fn test_insert_multiple_rows() {
    let q = insert("users")
        .values([
            vec![("name", Value::from("a")), ("age", Value::Int(1))],
            vec![("name", Value::from("b")), ("age", Value::Int(2))],
        ])
        .returning(["id"]);
    let rendered = q.inspect(&PostgresFormatter).unwrap();
    assert_eq!(
        rendered.sql,
        r#"INSERT INTO "users" ("name", "age") VALUES ($1, $2), ($3, $4) RETURNING "id""#
    );
    assert_eq!(
        rendered.bindings.into_values(),
        vec![
            Value::from("a"),
            Value::Int(1),
            Value::from("b"),
            Value::Int(2)
        ]
    );
}

#[test]
fn test_insert_rejects_inconsistent_rows() {
    let q = insert("users")
        .value([("name", Value::from("a"))])
        .value([("email", Value::from("b"))]);
    let err = q.inspect(&GenericFormatter).unwrap_err();
    assert!(matches!(err, QueryError::Validation(_)));
}

#[test]
fn test_insert_into_replaces_table() {
    let q = insert("draft").into("users").value([("id", 1)]);
    assert_eq!(
        q.inspect(&GenericFormatter).unwrap().sql,
        "INSERT INTO users (id) VALUES (?)"
    );
}

// ==================== UPDATE ====================

#[test]
fn test_update_binds_set_before_where() {
    let q = update("users")
        .set("name", "ann")
        .set("age", 31)
        .where_eq("id", 7);
    let rendered = q.inspect(&PostgresFormatter).unwrap();
    assert_eq!(
        rendered.sql,
        r#"UPDATE "users" SET "name" = $1, "age" = $2 WHERE "id" = $3"#
    );
    assert_eq!(
        rendered.bindings.into_values(),
        vec![Value::from("ann"), Value::Int(31), Value::Int(7)]
    );
    assert_eq!(q.statement().bindings(), q.inspect(&GenericFormatter).unwrap().bindings);
}

#[test]
fn test_update_set_twice_keeps_position() {
    let q = update("t").set_many([("a", 1), ("b", 2), ("a", 3)]);
    let rendered = q.inspect(&GenericFormatter).unwrap();
    assert_eq!(rendered.sql, "UPDATE t SET a = ?, b = ?");
    assert_eq!(
        rendered.bindings.into_values(),
        vec![Value::Int(3), Value::Int(2)]
    );
}

#[test]
fn test_update_without_set_is_rejected() {
    let err = update("t")
        .where_eq("id", 1)
        .inspect(&GenericFormatter)
        .unwrap_err();
    assert!(matches!(err, QueryError::Validation(_)));
}

#[test]
fn test_update_limit_per_dialect() {
    let q = update("t").set("a", 1).order_by_asc("id").limit(5);
    assert_eq!(
        q.inspect(&MySqlFormatter).unwrap().sql,
        "UPDATE `t` SET `a` = ? ORDER BY `id` ASC LIMIT 5"
    );
    let err = q.inspect(&PostgresFormatter).unwrap_err();
    assert!(matches!(
        err,
        QueryError::UnsupportedStatementOperation { ref operation, .. } if operation == "ORDER BY"
    ));
}

// ==================== DELETE ====================

#[test]
fn test_delete_with_returning() {
    let q = delete("sessions")
        .where_op("expires_at", "<", 100)
        .unwrap()
        .returning(["id"]);
    assert_eq!(
        q.inspect(&PostgresFormatter).unwrap().sql,
        r#"DELETE FROM "sessions" WHERE "expires_at" < $1 RETURNING "id""#
    );
    let err = q.inspect(&MySqlFormatter).unwrap_err();
    assert!(matches!(
        err,
        QueryError::UnsupportedStatementOperation { ref operation, .. } if operation == "RETURNING"
    ));
}

#[test]
fn test_delete_table_replaces_target() {
    let q = delete("a").table("b").where_eq("id", 1);
    assert_eq!(
        q.inspect(&GenericFormatter).unwrap().sql,
        "DELETE FROM b WHERE id = ?"
    );
}

// ==================== Pagination pages ====================

#[test]
fn test_offset_page_last_page() {
    let page: OffsetPage<i32> = OffsetPage {
        items: vec![1, 2],
        total: 5,
        per_page: 2,
        page: 1,
    };
    assert_eq!(page.last_page(), 2);
    assert!(page.has_next());

    let empty: OffsetPage<i32> = OffsetPage {
        items: vec![],
        total: 0,
        per_page: 2,
        page: 0,
    };
    assert_eq!(empty.last_page(), 0);
    assert!(!empty.has_next());
}

#[test]
fn test_count_total_sums_groups() {
    let count = Count::Grouped(vec![(Value::Int(1), 2), (Value::Int(2), 1)]);
    assert_eq!(count.total(), 3);
    assert_eq!(Count::Total(4).groups(), None);
}
