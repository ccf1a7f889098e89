mod common;

use common::{MockConnection, row};
use querykit::prelude::*;
use querykit::{PostgresFormatter, QueryConfig};

#[derive(Debug, PartialEq)]
struct User {
    id: i64,
    name: String,
}

impl FromRow for User {
    fn from_row(row: &Row) -> QueryResult<Self> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
        })
    }
}

fn users() -> Vec<Row> {
    vec![
        row(&[("id", Value::Int(1)), ("name", Value::from("ann"))]),
        row(&[("id", Value::Int(2)), ("name", Value::from("bob"))]),
    ]
}

#[test]
fn all_as_maps_rows() {
    let conn = MockConnection::returning(users());
    let got = select("users")
        .where_eq("active", true)
        .all_as::<User>(&conn)
        .unwrap();
    assert_eq!(
        got,
        vec![
            User { id: 1, name: "ann".into() },
            User { id: 2, name: "bob".into() },
        ]
    );
    assert_eq!(
        conn.last().unwrap(),
        ("SELECT * FROM users WHERE active = ?".to_string(), vec![Value::Bool(true)])
    );
}

#[test]
fn one_forces_limit_without_touching_builder() {
    let conn = MockConnection::returning(users());
    let query = select("users").order_by_asc("id");
    let before = query.to_sql().unwrap();

    let first = query.one_as::<User>(&conn).unwrap();
    assert_eq!(first.map(|u| u.id), Some(1));
    assert_eq!(conn.statements(), vec!["SELECT * FROM users ORDER BY id ASC LIMIT 1"]);
    assert_eq!(query.to_sql().unwrap(), before);
}

#[test]
fn first_as_reports_not_found() {
    let conn = MockConnection::returning(vec![]);
    let err = select("users").first_as::<User>(&conn).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn exists_selects_constant() {
    let conn = MockConnection::returning(vec![row(&[("1", Value::Int(1))])]);
    let query = select("users").columns(["id", "name"]).where_eq("name", "ann");
    assert!(query.exists(&conn).unwrap());
    assert_eq!(
        conn.statements(),
        vec!["SELECT 1 FROM users WHERE name = ? LIMIT 1"]
    );
    assert_eq!(query.statement().columns.as_ref().map(Vec::len), Some(2));

    let empty = MockConnection::returning(vec![]);
    assert!(!query.exists(&empty).unwrap());
}

#[test]
fn exists_keeps_offset_and_its_ordering() {
    let conn = MockConnection::returning(vec![]);
    let query = select("users").order_by_asc("id").limit(5).offset(100);
    assert!(!query.exists(&conn).unwrap());
    assert_eq!(
        conn.statements(),
        vec!["SELECT 1 FROM users ORDER BY id ASC LIMIT 1 OFFSET 100"]
    );

    let conn = MockConnection::returning(vec![row(&[("1", Value::Int(1))])]);
    select("users").order_by_asc("id").exists(&conn).unwrap();
    assert_eq!(conn.statements(), vec!["SELECT 1 FROM users LIMIT 1"]);
}

#[test]
fn count_without_group_by() {
    let conn = MockConnection::returning(vec![row(&[("total", Value::Int(3))])]);
    let query = select("t").where_eq("kind", "a").order_by_desc("id").limit(2).offset(4);
    assert_eq!(query.count(&conn).unwrap(), Count::Total(3));
    assert_eq!(
        conn.statements(),
        vec!["SELECT COUNT(*) AS total FROM t WHERE kind = ?"]
    );
}

#[test]
fn count_with_group_by_keys_by_first_group_column() {
    let conn = MockConnection::returning(vec![
        row(&[("g", Value::Int(1)), ("total", Value::Int(2))]),
        row(&[("g", Value::Int(2)), ("total", Value::Int(1))]),
    ]);
    let count = select("t").group_by(["g"]).count(&conn).unwrap();
    assert_eq!(
        count,
        Count::Grouped(vec![(Value::Int(1), 2), (Value::Int(2), 1)])
    );
    assert_eq!(count.total(), 3);
    assert_eq!(
        conn.statements(),
        vec!["SELECT g, COUNT(*) AS total FROM t GROUP BY g"]
    );
}

#[test]
fn aggregates_render_and_default() {
    let conn = MockConnection::returning(vec![row(&[("aggregate", Value::Null)])]);
    let query = select("orders").where_eq("status", "paid");
    assert_eq!(query.sum(&conn, "total").unwrap(), Value::Int(0));
    assert_eq!(query.max(&conn, "total").unwrap(), Value::Null);
    assert_eq!(
        conn.statements(),
        vec![
            "SELECT SUM(total) AS aggregate FROM orders WHERE status = ?",
            "SELECT MAX(total) AS aggregate FROM orders WHERE status = ?",
        ]
    );

    let conn = MockConnection::returning(vec![row(&[("aggregate", Value::Float(2.5))])])
        .with_formatter(PostgresFormatter);
    assert_eq!(query.avg(&conn, "total").unwrap(), Value::Float(2.5));
    assert_eq!(
        conn.statements(),
        vec![r#"SELECT AVG("total") AS aggregate FROM "orders" WHERE "status" = $1"#]
    );
}

#[test]
fn aggregate_rejects_expression_column() {
    let conn = MockConnection::returning(vec![]);
    let err = select("t").min(&conn, "a); DROP TABLE t; --").unwrap_err();
    assert!(matches!(err, QueryError::Validation(_)));
    assert!(conn.statements().is_empty());
}

#[test]
fn render_errors_never_reach_connection() {
    let conn = MockConnection::returning(vec![]).with_config(QueryConfig::default().no_truncate());
    let err = select("").all(&conn).unwrap_err();
    assert!(matches!(err, QueryError::Validation(_)));
    assert!(conn.statements().is_empty());
}
