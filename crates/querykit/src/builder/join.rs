use super::Predicate;
use crate::condition::{ConditionBuilder, Logic, Operator, Params};
use crate::error::{QueryError, QueryResult};
use crate::ident::Ident;
use crate::statement::{JoinDefinition, JoinType};

/// Builds one JOIN clause for a [`SelectBuilder`](super::SelectBuilder).
///
/// ```ignore
/// let join = JoinBuilder::left("orders")
///     .alias("o")
///     .on_columns("o.user_id", "=", "u.id")?
///     .and(Predicate::eq("o.status", "paid"))?;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct JoinBuilder {
    definition: JoinDefinition,
}

impl JoinBuilder {
    pub fn new(join_type: JoinType, table: impl Into<String>) -> Self {
        Self {
            definition: JoinDefinition::new(join_type, table),
        }
    }

    pub fn inner(table: impl Into<String>) -> Self {
        Self::new(JoinType::Inner, table)
    }

    pub fn left(table: impl Into<String>) -> Self {
        Self::new(JoinType::Left, table)
    }

    pub fn right(table: impl Into<String>) -> Self {
        Self::new(JoinType::Right, table)
    }

    pub fn full(table: impl Into<String>) -> Self {
        Self::new(JoinType::Full, table)
    }

    pub fn cross(table: impl Into<String>) -> Self {
        Self::new(JoinType::Cross, table)
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.definition.alias = Some(alias.into());
        self
    }

    /// Start the ON condition. Further calls behave like [`and`](Self::and).
    pub fn on(self, predicate: impl Into<Predicate>) -> QueryResult<Self> {
        self.push(Logic::And, predicate.into())
    }

    /// Column-to-column comparison such as `o.user_id = u.id`.
    ///
    /// Both sides must be plain identifiers and the operator a comparison.
    pub fn on_columns(self, left: &str, symbol: &str, right: &str) -> QueryResult<Self> {
        let (operator, negated) = Operator::parse(symbol)?;
        if !matches!(
            operator,
            Operator::Eq | Operator::Gt | Operator::Gte | Operator::Lt | Operator::Lte
        ) {
            return Err(QueryError::validation(format!(
                "operator {symbol} cannot compare two columns"
            ))
            .traced());
        }
        Ident::parse(left).map_err(QueryError::traced)?;
        Ident::parse(right).map_err(QueryError::traced)?;
        let condition =
            ConditionBuilder::single(left, operator, negated, Params::Column(right.to_string()));
        self.push(Logic::And, Predicate::Sub(condition))
    }

    /// Extend the ON condition with AND.
    pub fn and(self, predicate: impl Into<Predicate>) -> QueryResult<Self> {
        self.push(Logic::And, predicate.into())
    }

    /// Extend the ON condition with OR.
    pub fn or(self, predicate: impl Into<Predicate>) -> QueryResult<Self> {
        self.push(Logic::Or, predicate.into())
    }

    fn push(mut self, logic: Logic, predicate: Predicate) -> QueryResult<Self> {
        let condition: ConditionBuilder = predicate.into_condition(false)?;
        condition.validate()?;
        self.definition.on.push((logic, condition));
        Ok(self)
    }

    pub fn definition(&self) -> &JoinDefinition {
        &self.definition
    }

    pub fn build(self) -> JoinDefinition {
        self.definition
    }
}
