use super::ConditionsBuilder;
use crate::condition::ConditionBuilder;
use crate::connection::{Connection, run_affecting, run_query};
use crate::error::QueryResult;
use crate::format::{self, Formatter, GenericFormatter, Rendered};
use crate::row::Row;
use crate::statement::{OrderBy, UpdateStatement};
use crate::value::Value;

/// UPDATE builder.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateBuilder {
    statement: UpdateStatement,
}

impl UpdateBuilder {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            statement: UpdateStatement::new(table),
        }
    }

    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.statement.table = table.into();
        self
    }

    /// `SET column = value`. Setting a column twice keeps its first
    /// position and the latest value.
    pub fn set(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        let column = column.into();
        let value = value.into();
        match self
            .statement
            .assignments
            .iter_mut()
            .find(|(existing, _)| *existing == column)
        {
            Some(slot) => slot.1 = value,
            None => self.statement.assignments.push((column, value)),
        }
        self
    }

    pub fn set_many<I, K, V>(self, assignments: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        assignments
            .into_iter()
            .fold(self, |builder, (column, value)| builder.set(column, value))
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

    pub fn statement(&self) -> &UpdateStatement {
        &self.statement
    }

    pub fn inspect(&self, formatter: &dyn Formatter) -> QueryResult<Rendered> {
        format::render(formatter, &self.statement)
    }

    pub fn to_sql(&self) -> QueryResult<String> {
        Ok(format::render(&GenericFormatter, &self.statement)?.interpolated)
    }

    /// Execute and return the number of affected rows.
    pub fn execute(&self, conn: &impl Connection) -> QueryResult<u64> {
        run_affecting(conn, &self.statement)
    }

    /// Execute and return the RETURNING rows.
    pub fn execute_returning(&self, conn: &impl Connection) -> QueryResult<Vec<Row>> {
        run_query(conn, &self.statement)
    }
}

impl ConditionsBuilder for UpdateBuilder {
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
