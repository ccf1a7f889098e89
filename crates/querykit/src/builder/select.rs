//! SELECT query builder.

use super::{ConditionsBuilder, JoinBuilder, Predicate};
use crate::condition::{ConditionBuilder, Operator, Params};
use crate::connection::{Connection, run_query};
use crate::error::{QueryError, QueryResult};
use crate::format::{self, Formatter, GenericFormatter, Rendered};
use crate::ident::Ident;
use crate::row::{FromRow, Row};
use crate::statement::{JoinType, OrderBy, SelectStatement};
use crate::value::Value;

/// Result of [`SelectBuilder::count`].
#[derive(Debug, Clone, PartialEq)]
pub enum Count {
    /// Row count of an ungrouped query.
    Total(u64),
    /// `(group key, count)` per group, in result order.
    Grouped(Vec<(Value, u64)>),
}

impl Count {
    /// Overall total; grouped counts are summed.
    pub fn total(&self) -> u64 {
        match self {
            Count::Total(n) => *n,
            Count::Grouped(groups) => groups.iter().map(|(_, n)| n).sum(),
        }
    }

    pub fn groups(&self) -> Option<&[(Value, u64)]> {
        match self {
            Count::Total(_) => None,
            Count::Grouped(groups) => Some(groups),
        }
    }
}

/// SELECT query builder.
///
/// Builder methods consume and return `self`; [`copy`](Self::copy) forks an
/// independent builder. Execution methods borrow and never alter the builder.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectBuilder {
    statement: SelectStatement,
}

impl SelectBuilder {
    /// Create a SELECT query builder for a table.
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            statement: SelectStatement::new(table),
        }
    }

    /// Replace the target table.
    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.statement.table = table.into();
        self
    }

    /// Replace the target table and give it an alias.
    pub fn from(mut self, table: impl Into<String>, alias: impl Into<String>) -> Self {
        self.statement.table = table.into();
        self.statement.alias = Some(alias.into());
        self
    }

    // ==================== SELECT columns ====================

    /// Set SELECT columns (expressions pass through unquoted).
    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.statement.columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Append one SELECT column.
    pub fn add_column(mut self, column: impl Into<String>) -> Self {
        self.statement
            .columns
            .get_or_insert_with(Vec::new)
            .push(column.into());
        self
    }

    pub fn distinct(mut self) -> Self {
        self.statement.distinct = true;
        self
    }

    /// Lock selected rows (`FOR UPDATE` or the dialect's equivalent).
    pub fn lock(mut self) -> Self {
        self.statement.lock = true;
        self
    }

    // ==================== GROUP BY / HAVING ====================

    pub fn group_by<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.statement
            .group_by
            .extend(columns.into_iter().map(Into::into));
        self
    }

    /// Append a HAVING predicate.
    pub fn having(mut self, predicate: impl Into<Predicate>) -> QueryResult<Self> {
        let chain = predicate.into().into_condition(false)?;
        chain.validate()?;
        self.statement.havings.push(chain);
        Ok(self)
    }

    /// `HAVING <expr> <symbol> value`, e.g. `having_op("COUNT(*)", ">", 5)`.
    pub fn having_op(
        self,
        expr: impl Into<String>,
        symbol: &str,
        value: impl Into<Value>,
    ) -> QueryResult<Self> {
        self.having(Predicate::op(expr, symbol, value)?)
    }

    pub fn having_raw(mut self, sql: impl Into<String>) -> Self {
        self.statement.havings.push(ConditionBuilder::raw(sql));
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.statement.offset = Some(offset);
        self
    }

    // ==================== JOIN ====================

    pub fn join(mut self, join: JoinBuilder) -> Self {
        self.statement.joins.push(join.build());
        self
    }

    fn join_with<F>(
        self,
        join_type: JoinType,
        table: impl Into<String>,
        build: F,
    ) -> QueryResult<Self>
    where
        F: FnOnce(JoinBuilder) -> QueryResult<JoinBuilder>,
    {
        let join = build(JoinBuilder::new(join_type, table))?;
        Ok(self.join(join))
    }

    /// Add INNER JOIN configured by `build`.
    pub fn inner_join<F>(self, table: impl Into<String>, build: F) -> QueryResult<Self>
    where
        F: FnOnce(JoinBuilder) -> QueryResult<JoinBuilder>,
    {
        self.join_with(JoinType::Inner, table, build)
    }

    /// Add LEFT JOIN configured by `build`.
    pub fn left_join<F>(self, table: impl Into<String>, build: F) -> QueryResult<Self>
    where
        F: FnOnce(JoinBuilder) -> QueryResult<JoinBuilder>,
    {
        self.join_with(JoinType::Left, table, build)
    }

    /// Add RIGHT JOIN configured by `build`.
    pub fn right_join<F>(self, table: impl Into<String>, build: F) -> QueryResult<Self>
    where
        F: FnOnce(JoinBuilder) -> QueryResult<JoinBuilder>,
    {
        self.join_with(JoinType::Right, table, build)
    }

    // ==================== Inspection ====================

    pub fn statement(&self) -> &SelectStatement {
        &self.statement
    }

    pub fn into_statement(self) -> SelectStatement {
        self.statement
    }

    /// Independent deep copy.
    pub fn copy(&self) -> Self {
        self.clone()
    }

    /// Render with `formatter` without executing.
    pub fn inspect(&self, formatter: &dyn Formatter) -> QueryResult<Rendered> {
        format::render(formatter, &self.statement)
    }

    /// Statement with bound values inlined, for debugging.
    pub fn to_sql(&self) -> QueryResult<String> {
        Ok(format::render(&GenericFormatter, &self.statement)?.interpolated)
    }

    // ==================== Execution ====================

    /// Execute and return all rows.
    pub fn all(&self, conn: &impl Connection) -> QueryResult<Vec<Row>> {
        run_query(conn, &self.statement)
    }

    /// Execute and map all rows to `T`.
    pub fn all_as<T: FromRow>(&self, conn: &impl Connection) -> QueryResult<Vec<T>> {
        self.all(conn)?.iter().map(T::from_row).collect()
    }

    /// First row, fetched with `LIMIT 1`.
    pub fn one(&self, conn: &impl Connection) -> QueryResult<Option<Row>> {
        let mut query = self.copy();
        query.statement.limit = Some(1);
        Ok(query.all(conn)?.into_iter().next())
    }

    /// First row mapped to `T`.
    pub fn one_as<T: FromRow>(&self, conn: &impl Connection) -> QueryResult<Option<T>> {
        self.one(conn)?.as_ref().map(T::from_row).transpose()
    }

    /// First row mapped to `T`, failing with `NotFound` when there is none.
    pub fn first_as<T: FromRow>(&self, conn: &impl Connection) -> QueryResult<T> {
        self.one_as(conn)?.ok_or_else(|| {
            QueryError::not_found(format!("no row in {}", self.statement.table))
        })
    }

    /// Whether at least one row matches.
    ///
    /// Runs the query as `SELECT 1 ... LIMIT 1`. An OFFSET is kept, and the
    /// ordering with it since the offset depends on it.
    pub fn exists(&self, conn: &impl Connection) -> QueryResult<bool> {
        let mut query = self.copy();
        query.statement.columns = Some(vec!["1".to_string()]);
        if query.statement.offset.is_none() {
            query.statement.order_by = OrderBy::new();
        }
        query.statement.limit = Some(1);
        Ok(!query.all(conn)?.is_empty())
    }

    /// Count matching rows.
    ///
    /// Ungrouped queries yield [`Count::Total`]. Grouped queries yield one
    /// `(key, count)` per group, keyed by the first selected column (the
    /// first GROUP BY column when no columns were chosen).
    pub fn count(&self, conn: &impl Connection) -> QueryResult<Count> {
        let mut query = self.aggregate_base();
        let st = &mut query.statement;

        if st.group_by.is_empty() {
            st.columns = Some(vec!["COUNT(*) AS total".to_string()]);
            let rows = query.all(conn)?;
            let total = match rows.first() {
                Some(row) => row.try_get::<u64>("total")?,
                None => 0,
            };
            return Ok(Count::Total(total));
        }

        let mut columns = st
            .columns
            .take()
            .unwrap_or_else(|| vec![st.group_by[0].clone()]);
        columns.push("COUNT(*) AS total".to_string());
        st.columns = Some(columns);

        let rows = query.all(conn)?;
        let groups = rows
            .iter()
            .map(|row| {
                let key = row.get_at(0).cloned().unwrap_or_default();
                Ok((key, row.try_get::<u64>("total")?))
            })
            .collect::<QueryResult<Vec<_>>>()?;
        Ok(Count::Grouped(groups))
    }

    /// `SUM(column)`; `0` when no rows match.
    pub fn sum(&self, conn: &impl Connection, column: &str) -> QueryResult<Value> {
        match self.aggregate(conn, "SUM", column)? {
            Value::Null => Ok(Value::Int(0)),
            value => Ok(value),
        }
    }

    /// `AVG(column)`; null when no rows match.
    pub fn avg(&self, conn: &impl Connection, column: &str) -> QueryResult<Value> {
        self.aggregate(conn, "AVG", column)
    }

    /// `MIN(column)`; null when no rows match.
    pub fn min(&self, conn: &impl Connection, column: &str) -> QueryResult<Value> {
        self.aggregate(conn, "MIN", column)
    }

    /// `MAX(column)`; null when no rows match.
    pub fn max(&self, conn: &impl Connection, column: &str) -> QueryResult<Value> {
        self.aggregate(conn, "MAX", column)
    }

    fn aggregate(
        &self,
        conn: &impl Connection,
        function: &str,
        column: &str,
    ) -> QueryResult<Value> {
        let column = Ident::parse(column)?;
        let mut query = self.aggregate_base();
        query.statement.columns = Some(vec![format!(
            "{function}({}) AS aggregate",
            conn.formatter().quote_identifier(&column.to_sql())
        )]);
        let row = query.all(conn)?.into_iter().next();
        Ok(row
            .and_then(|r| r.get("aggregate").cloned())
            .unwrap_or_default())
    }

    /// Copy without ORDER BY / LIMIT / OFFSET, which aggregates ignore.
    fn aggregate_base(&self) -> Self {
        let mut query = self.copy();
        query.statement.order_by = OrderBy::new();
        query.statement.limit = None;
        query.statement.offset = None;
        query.statement.lock = false;
        query
    }

    pub(crate) fn push_cursor_condition(
        &mut self,
        column: &str,
        operator: Operator,
        cursor: Value,
    ) {
        self.statement.wheres.push(ConditionBuilder::single(
            column,
            operator,
            false,
            Params::Positional(vec![cursor]),
        ));
    }

    pub(crate) fn statement_mut(&mut self) -> &mut SelectStatement {
        &mut self.statement
    }
}

impl ConditionsBuilder for SelectBuilder {
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
