use crate::connection::{Connection, run_affecting, run_query};
use crate::error::QueryResult;
use crate::format::{self, Formatter, GenericFormatter, Rendered};
use crate::row::Row;
use crate::statement::InsertStatement;
use crate::value::Value;

/// INSERT builder.
///
/// ```ignore
/// insert("users")
///     .value([("name", Value::from("ann")), ("age", Value::from(31))])
///     .execute(&conn)?;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct InsertBuilder {
    statement: InsertStatement,
}

impl InsertBuilder {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            statement: InsertStatement::new(table),
        }
    }

    /// Replace the target table.
    pub fn into(mut self, table: impl Into<String>) -> Self {
        self.statement.table = table.into();
        self
    }

    /// Append one row of `(column, value)` pairs.
    pub fn value<I, K, V>(mut self, row: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        self.statement.dataset.push(
            row.into_iter()
                .map(|(column, value)| (column.into(), value.into()))
                .collect(),
        );
        self
    }

    /// Append several rows. Every row must name the same columns in the
    /// same order; rendering rejects a mismatch.
    pub fn values<R, I, K, V>(self, rows: R) -> Self
    where
        R: IntoIterator<Item = I>,
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        rows.into_iter().fold(self, |builder, row| builder.value(row))
    }

    /// Add RETURNING columns (dialect permitting).
    pub fn returning<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.statement
            .returning
            .extend(columns.into_iter().map(Into::into));
        self
    }

    pub fn statement(&self) -> &InsertStatement {
        &self.statement
    }

    pub fn is_empty(&self) -> bool {
        self.statement.dataset.is_empty()
    }

    pub fn inspect(&self, formatter: &dyn Formatter) -> QueryResult<Rendered> {
        format::render(formatter, &self.statement)
    }

    pub fn to_sql(&self) -> QueryResult<String> {
        Ok(format::render(&GenericFormatter, &self.statement)?.interpolated)
    }

    /// Execute and return the number of inserted rows.
    ///
    /// An empty dataset runs nothing and reports 0.
    pub fn execute(&self, conn: &impl Connection) -> QueryResult<u64> {
        if self.is_empty() {
            tracing::debug!(
                target: "querykit",
                table = %self.statement.table,
                "skipping INSERT with no rows"
            );
            return Ok(0);
        }
        run_affecting(conn, &self.statement)
    }

    /// Execute and return the RETURNING rows.
    pub fn execute_returning(&self, conn: &impl Connection) -> QueryResult<Vec<Row>> {
        if self.is_empty() {
            return Ok(Vec::new());
        }
        run_query(conn, &self.statement)
    }
}
