//! Connection boundary: executes rendered statements.
//!
//! Builders render with the connection's [`Formatter`] and hand the text and
//! bindings to [`Connection::query`] or [`Connection::affecting_query`].
//! Implementations only deal with transport and row decoding.

use crate::config::{LogLevel, QueryConfig};
use crate::error::QueryResult;
use crate::format::{self, Formatter, Rendered, WriteSql};
use crate::row::Row;
use crate::statement::StatementKind;
use crate::value::Bindings;

/// A synchronous database connection.
pub trait Connection {
    /// Dialect used to render statements for this connection.
    fn formatter(&self) -> &dyn Formatter;

    /// Logging and pagination settings.
    fn config(&self) -> &QueryConfig {
        &QueryConfig::DEFAULT
    }

    /// Run a row-returning statement.
    fn query(&self, sql: &str, bindings: &Bindings) -> QueryResult<Vec<Row>>;

    /// Run a statement and return the number of affected rows.
    fn affecting_query(&self, sql: &str, bindings: &Bindings) -> QueryResult<u64>;
}

/// Render `statement` for `conn`, log it, and fetch rows.
pub(crate) fn run_query<C, S>(conn: &C, statement: &S) -> QueryResult<Vec<Row>>
where
    C: Connection + ?Sized,
    S: WriteSql,
{
    let rendered = format::render(conn.formatter(), statement)?;
    log_statement(conn.config(), statement.kind(), &rendered);
    conn.query(&rendered.sql, &rendered.bindings)
}

/// Render `statement` for `conn`, log it, and return the affected row count.
pub(crate) fn run_affecting<C, S>(conn: &C, statement: &S) -> QueryResult<u64>
where
    C: Connection + ?Sized,
    S: WriteSql,
{
    let rendered = format::render(conn.formatter(), statement)?;
    log_statement(conn.config(), statement.kind(), &rendered);
    conn.affecting_query(&rendered.sql, &rendered.bindings)
}

fn log_statement(config: &QueryConfig, kind: StatementKind, rendered: &Rendered) {
    macro_rules! emit_at_level {
        ($level:expr, $($field:tt)*) => {
            match $level {
                LogLevel::Error => tracing::error!($($field)*),
                LogLevel::Warn  => tracing::warn!($($field)*),
                LogLevel::Info  => tracing::info!($($field)*),
                LogLevel::Debug => tracing::debug!($($field)*),
                LogLevel::Trace => tracing::trace!($($field)*),
            }
        };
    }

    let sql = config.loggable_sql(&rendered.sql);
    emit_at_level!(
        config.log_level,
        target: "querykit.sql",
        statement = kind.as_str(),
        binding_count = rendered.bindings.len(),
        sql = %sql,
        "executing statement"
    );
}
