use super::Predicate;
use crate::condition::{ConditionBuilder, Operator, Params, distinct_values};
use crate::error::QueryResult;
use crate::statement::{OrderBy, SortDirection};
use crate::types::Range;
use crate::value::Value;

/// WHERE / ORDER BY / LIMIT methods shared by SELECT, UPDATE and DELETE.
///
/// Every `where_*` call appends one condition chain; chains are joined with
/// `AND` when rendered. Implementors only expose their statement's slots.
pub trait ConditionsBuilder: Sized {
    #[doc(hidden)]
    fn where_chains(&mut self) -> &mut Vec<ConditionBuilder>;

    #[doc(hidden)]
    fn order_slot(&mut self) -> &mut OrderBy;

    #[doc(hidden)]
    fn limit_slot(&mut self) -> &mut Option<u64>;

    /// Append any predicate.
    fn filter(mut self, predicate: impl Into<Predicate>) -> QueryResult<Self> {
        let chain = predicate.into().into_condition(false)?;
        chain.validate()?;
        self.where_chains().push(chain);
        Ok(self)
    }

    /// Append a pre-built chain.
    fn where_cond(self, condition: ConditionBuilder) -> QueryResult<Self> {
        self.filter(condition)
    }

    /// Configure a chain on `column` through a callback.
    ///
    /// ```ignore
    /// let q = select("users").where_fn("age", |c| c.greater_than(18)?.or_same()?.is_null())?;
    /// ```
    fn where_fn<F>(self, column: impl Into<String>, build: F) -> QueryResult<Self>
    where
        F: FnOnce(ConditionBuilder) -> QueryResult<ConditionBuilder>,
    {
        let condition = build(ConditionBuilder::column(column))?;
        self.filter(condition)
    }

    /// `column = value` (`IS NULL` for a null value); a list means `IN`.
    fn where_eq(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        let chain = match value.into() {
            Value::List(values) => ConditionBuilder::single(
                column,
                Operator::In,
                false,
                Params::Positional(distinct_values(values)),
            ),
            scalar => ConditionBuilder::single(
                column,
                Operator::Eq,
                false,
                Params::Positional(vec![scalar]),
            ),
        };
        self.where_chains().push(chain);
        self
    }

    /// `column <symbol> value`, e.g. `where_op("age", ">=", 18)`.
    fn where_op(
        self,
        column: impl Into<String>,
        symbol: &str,
        value: impl Into<Value>,
    ) -> QueryResult<Self> {
        self.filter(Predicate::op(column, symbol, value)?)
    }

    /// `column IN (...)`.
    fn where_in<I, T>(mut self, column: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        self.where_chains().push(ConditionBuilder::single(
            column,
            Operator::In,
            false,
            Params::Positional(distinct_values(values)),
        ));
        self
    }

    /// Column within `range`.
    fn where_range<T: Into<Value>>(mut self, column: impl Into<String>, range: Range<T>) -> Self {
        self.where_chains().push(ConditionBuilder::single(
            column,
            Operator::Range,
            false,
            Params::Range(range.map(Into::into)),
        ));
        self
    }

    /// Literal SQL fragment.
    fn where_raw(mut self, sql: impl Into<String>) -> Self {
        self.where_chains().push(ConditionBuilder::raw(sql));
        self
    }

    /// Literal SQL fragment with parameters.
    fn where_raw_with(self, sql: impl Into<String>, params: Params) -> QueryResult<Self> {
        self.filter(Predicate::raw_with(sql, params))
    }

    /// Negated shorthand: a list becomes `NOT IN`, a scalar `!=`
    /// (`IS NOT NULL` for null).
    fn where_not(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        let chain = match value.into() {
            Value::List(values) => ConditionBuilder::single(
                column,
                Operator::In,
                true,
                Params::Positional(distinct_values(values)),
            ),
            scalar => ConditionBuilder::single(
                column,
                Operator::Eq,
                true,
                Params::Positional(vec![scalar]),
            ),
        };
        self.where_chains().push(chain);
        self
    }

    /// Column outside `range`.
    fn where_not_in_range<T: Into<Value>>(
        mut self,
        column: impl Into<String>,
        range: Range<T>,
    ) -> Self {
        self.where_chains().push(ConditionBuilder::single(
            column,
            Operator::Range,
            true,
            Params::Range(range.map(Into::into)),
        ));
        self
    }

    /// Order by `column`; `direction` is `ASC` or `DESC`, any case.
    fn order_by(mut self, column: impl Into<String>, direction: &str) -> QueryResult<Self> {
        let direction = SortDirection::parse(direction)?;
        self.order_slot().set(column, direction);
        Ok(self)
    }

    fn order_by_asc(mut self, column: impl Into<String>) -> Self {
        self.order_slot().set(column, SortDirection::Asc);
        self
    }

    fn order_by_desc(mut self, column: impl Into<String>) -> Self {
        self.order_slot().set(column, SortDirection::Desc);
        self
    }

    fn limit(mut self, limit: u64) -> Self {
        *self.limit_slot() = Some(limit);
        self
    }
}
