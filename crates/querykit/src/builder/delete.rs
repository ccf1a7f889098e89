use super::ConditionsBuilder;
use crate::condition::ConditionBuilder;
use crate::connection::{Connection, run_affecting, run_query};
use crate::error::QueryResult;
use crate::format::{self, Formatter, GenericFormatter, Rendered};
use crate::row::Row;
use crate::statement::{DeleteStatement, OrderBy};

/// DELETE builder.
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteBuilder {
    statement: DeleteStatement,
}

impl DeleteBuilder {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            statement: DeleteStatement::new(table),
        }
    }

    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.statement.table = table.into();
        self
    }

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

    pub fn statement(&self) -> &DeleteStatement {
        &self.statement
    }

    pub fn inspect(&self, formatter: &dyn Formatter) -> QueryResult<Rendered> {
        format::render(formatter, &self.statement)
    }

    pub fn to_sql(&self) -> QueryResult<String> {
        Ok(format::render(&GenericFormatter, &self.statement)?.interpolated)
    }

    /// Execute and return the number of deleted rows.
    pub fn execute(&self, conn: &impl Connection) -> QueryResult<u64> {
        run_affecting(conn, &self.statement)
    }

    /// Execute and return the deleted rows' RETURNING columns.
    ///
    /// Fails with `UnsupportedStatementOperation` on dialects without
    /// `RETURNING`.
    pub fn execute_returning(&self, conn: &impl Connection) -> QueryResult<Vec<Row>> {
        run_query(conn, &self.statement)
    }
}

impl ConditionsBuilder for DeleteBuilder {
    fn where_chains(&mut self) -> &mut Vec<ConditionBuilder> {
        &mut self.statement.wheres
    }

    fn order_slot(&mut self) -> &mut OrderBy {
        &mut self.statement.order_by
    }

    fn limit_slot(&mut self) -> &mut Option<u64> {
        &mut self.statement.limit
    }
}
