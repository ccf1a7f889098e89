mod common;

use common::{MockConnection, row};
use querykit::prelude::*;
use querykit::MySqlFormatter;

#[test]
fn insert_executes_and_reports_count() {
    let conn = MockConnection::returning(vec![]).with_affected(2);
    let n = insert("users")
        .values([
            [("name", Value::from("a")), ("age", Value::Int(1))],
            [("name", Value::from("b")), ("age", Value::Int(2))],
        ])
        .execute(&conn)
        .unwrap();
    assert_eq!(n, 2);
    assert_eq!(
        conn.last().unwrap().0,
        "INSERT INTO users (name, age) VALUES (?, ?), (?, ?)"
    );
}

#[test]
fn empty_insert_is_a_no_op() {
    let conn = MockConnection::returning(vec![]).with_affected(9);
    assert_eq!(insert("users").execute(&conn).unwrap(), 0);
    assert!(insert("users").execute_returning(&conn).unwrap().is_empty());
    assert!(conn.statements().is_empty());
}

#[test]
fn insert_returning_rows() {
    let conn = MockConnection::returning(vec![row(&[("id", Value::Int(10))])]);
    let rows = insert("users")
        .value([("name", "a")])
        .returning(["id"])
        .execute_returning(&conn)
        .unwrap();
    assert_eq!(rows[0].try_get::<i64>("id").unwrap(), 10);
    assert_eq!(
        conn.last().unwrap().0,
        "INSERT INTO users (name) VALUES (?) RETURNING id"
    );
}

#[test]
fn update_returns_affected_rows() {
    let conn = MockConnection::returning(vec![]).with_affected(1);
    let n = update("users")
        .set("status", "inactive")
        .where_eq("id", 7)
        .execute(&conn)
        .unwrap();
    assert_eq!(n, 1);
    assert_eq!(
        conn.last().unwrap(),
        (
            "UPDATE users SET status = ? WHERE id = ?".to_string(),
            vec![Value::from("inactive"), Value::Int(7)]
        )
    );
}

#[test]
fn delete_with_order_and_limit_on_mysql() {
    let conn = MockConnection::returning(vec![])
        .with_formatter(MySqlFormatter)
        .with_affected(3);
    let n = delete("logs")
        .where_op("created_at", "<", 1000)
        .unwrap()
        .order_by_asc("created_at")
        .limit(3)
        .execute(&conn)
        .unwrap();
    assert_eq!(n, 3);
    assert_eq!(
        conn.last().unwrap().0,
        "DELETE FROM `logs` WHERE `created_at` < ? ORDER BY `created_at` ASC LIMIT 3"
    );
}

#[test]
fn delete_returning_rejected_before_execution_on_mysql() {
    let conn = MockConnection::returning(vec![]).with_formatter(MySqlFormatter);
    let err = delete("logs")
        .where_eq("id", 1)
        .returning(["id"])
        .execute_returning(&conn)
        .unwrap_err();
    assert!(matches!(err, QueryError::UnsupportedStatementOperation { .. }));
    assert!(conn.statements().is_empty());
}
