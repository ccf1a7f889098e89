//! Convenient imports for typical `querykit` usage.
//!
//! ```ignore
//! use querykit::prelude::*;
//! ```

pub use crate::{
    ConditionBuilder, ConditionsBuilder, Connection, Count, FromRow, Predicate, QueryError,
    QueryResult, Range, Row, RowExt, SelectBuilder, Value, delete, insert, select, update,
};
pub use crate::{Formatter, GenericFormatter, MySqlFormatter, PostgresFormatter};

#[cfg(feature = "postgres")]
pub use crate::PgConnection;
