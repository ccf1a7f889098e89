//! # querykit
//!
//! A fluent SQL query construction engine.
//!
//! ## Features
//!
//! - **Parameter-safe**: values are always bound, never spliced into SQL text
//! - **Dialect boundary**: one statement model renders through a [`Formatter`]
//!   (generic `?`, PostgreSQL `$n`, MySQL backticks)
//! - **Condition chains**: write-once nodes joined by AND/OR, with IN
//!   de-duplication, BETWEEN, ranges and raw fragments
//! - **Copy, then mutate**: `one()`, `exists()`, `count()` and pagination work
//!   on copies and never touch the caller's builder
//! - **Pagination**: offset pages with totals, cursor pages with look-ahead
//!
//! ## Builders
//!
//! ```ignore
//! use querykit::prelude::*;
//!
//! // SELECT
//! let rows = select("users")
//!     .where_op("status", "IN", vec!["active", "trial"])?
//!     .where_op("age", ">", 18)?
//!     .order_by("id", "DESC")?
//!     .limit(10)
//!     .all(&conn)?;
//!
//! // INSERT
//! insert("users")
//!     .value([("username", Value::from("alice")), ("age", Value::from(30))])
//!     .execute(&conn)?;
//!
//! // UPDATE
//! update("users")
//!     .set("status", "inactive")
//!     .where_eq("id", user_id)
//!     .execute(&conn)?;
//!
//! // DELETE
//! delete("users").where_eq("id", user_id).execute(&conn)?;
//! ```

pub mod builder;
pub mod condition;
pub mod config;
pub mod connection;
pub mod error;
pub mod format;
pub mod ident;
pub mod row;
pub mod statement;
pub mod types;
pub mod value;

#[cfg(feature = "postgres")]
pub mod postgres;

pub mod prelude;

pub use builder::{
    ConditionsBuilder, Count, CursorPage, DeleteBuilder, InsertBuilder, JoinBuilder, OffsetPage,
    Predicate, SelectBuilder, UpdateBuilder, delete, insert, select, update,
};
pub use condition::{ConditionBuilder, ConditionNode, Logic, Operator, Params};
pub use config::{LogLevel, QueryConfig};
pub use connection::Connection;
pub use error::{QueryError, QueryResult};
pub use format::{
    Formatter, GenericFormatter, MySqlFormatter, PostgresFormatter, Rendered, render,
};
pub use ident::Ident;
pub use row::{FromRow, FromValue, Row, RowExt};
pub use statement::{
    DeleteStatement, InsertStatement, JoinDefinition, JoinType, OrderBy, SelectStatement,
    SortDirection, Statement, StatementKind, UpdateStatement,
};
pub use types::{Bound, Range};
pub use value::{Bindings, Value};

#[cfg(feature = "postgres")]
pub use postgres::PgConnection;
