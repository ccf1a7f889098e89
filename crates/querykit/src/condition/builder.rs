use super::{ConditionNode, Logic, Operator, Params, distinct_values};
use crate::error::{QueryError, QueryResult};
use crate::format::{Formatter, Rendered, SqlWriter};
use crate::types::Range;
use crate::value::{Bindings, Value};

/// A fluent chain of column conditions joined by AND / OR.
///
/// The chain always holds at least one node; calls that set an operator act on
/// the last node, and [`and`](Self::and) / [`or`](Self::or) append a new one.
/// `Clone` produces an independent deep copy.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionBuilder {
    nodes: Vec<ConditionNode>,
}

impl ConditionBuilder {
    /// Start a chain on `column`.
    pub fn column(column: impl Into<String>) -> Self {
        Self {
            nodes: vec![ConditionNode::for_column(column.into())],
        }
    }

    /// Start a chain with a literal SQL fragment.
    pub fn raw(sql: impl Into<String>) -> Self {
        Self {
            nodes: vec![ConditionNode::raw(sql.into(), Params::None)],
        }
    }

    /// Start a chain with a raw fragment and its parameters.
    ///
    /// Positional parameters fill the fragment's `?` slots in order (each slot
    /// is rewritten to the dialect's placeholder); named parameters are bound
    /// by name and the text is kept verbatim.
    pub fn raw_with(sql: impl Into<String>, params: Params) -> QueryResult<Self> {
        let sql = sql.into();
        check_raw_params(&sql, &params)?;
        Ok(Self {
            nodes: vec![ConditionNode::raw(sql, params)],
        })
    }

    /// A single node with its operator already set.
    pub(crate) fn single(
        column: impl Into<String>,
        operator: Operator,
        negated: bool,
        params: Params,
    ) -> Self {
        Self {
            nodes: vec![ConditionNode::defined(column.into(), operator, negated, params)],
        }
    }

    fn cursor(&mut self) -> &mut ConditionNode {
        let idx = self.nodes.len() - 1;
        &mut self.nodes[idx]
    }

    fn define(mut self, operator: Operator, negated: bool, params: Params) -> QueryResult<Self> {
        self.cursor().define(operator, negated, params)?;
        Ok(self)
    }

    // ==================== Operators ====================

    /// `column = value` (`IS NULL` for a null value).
    pub fn equals(self, value: impl Into<Value>) -> QueryResult<Self> {
        self.define(Operator::Eq, false, Params::Positional(vec![value.into()]))
    }

    /// `column != value` (`IS NOT NULL` for a null value).
    pub fn not_equals(self, value: impl Into<Value>) -> QueryResult<Self> {
        self.define(Operator::Eq, true, Params::Positional(vec![value.into()]))
    }

    pub fn greater_than(self, value: impl Into<Value>) -> QueryResult<Self> {
        self.define(Operator::Gt, false, Params::Positional(vec![value.into()]))
    }

    pub fn greater_than_or_equals(self, value: impl Into<Value>) -> QueryResult<Self> {
        self.define(Operator::Gte, false, Params::Positional(vec![value.into()]))
    }

    pub fn less_than(self, value: impl Into<Value>) -> QueryResult<Self> {
        self.define(Operator::Lt, false, Params::Positional(vec![value.into()]))
    }

    pub fn less_than_or_equals(self, value: impl Into<Value>) -> QueryResult<Self> {
        self.define(Operator::Lte, false, Params::Positional(vec![value.into()]))
    }

    pub fn like(self, pattern: impl Into<Value>) -> QueryResult<Self> {
        self.define(Operator::Like, false, Params::Positional(vec![pattern.into()]))
    }

    pub fn not_like(self, pattern: impl Into<Value>) -> QueryResult<Self> {
        self.define(Operator::Like, true, Params::Positional(vec![pattern.into()]))
    }

    pub fn is_null(self) -> QueryResult<Self> {
        self.equals(Value::Null)
    }

    pub fn is_not_null(self) -> QueryResult<Self> {
        self.not_equals(Value::Null)
    }

    /// `column IN (...)`. Nulls are dropped and duplicates collapsed, first
    /// occurrence wins; an empty list renders as `1 = 0`.
    pub fn in_list<I, T>(self, values: I) -> QueryResult<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        self.define(Operator::In, false, Params::Positional(distinct_values(values)))
    }

    /// `column NOT IN (...)`, with the same filtering as [`in_list`](Self::in_list).
    pub fn not_in<I, T>(self, values: I) -> QueryResult<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        self.define(Operator::In, true, Params::Positional(distinct_values(values)))
    }

    /// `column BETWEEN min AND max`. Both values are bound as given.
    pub fn between(self, min: impl Into<Value>, max: impl Into<Value>) -> QueryResult<Self> {
        self.define(Operator::Between, false, Params::Pair(min.into(), max.into()))
    }

    pub fn not_between(self, min: impl Into<Value>, max: impl Into<Value>) -> QueryResult<Self> {
        self.define(Operator::Between, true, Params::Pair(min.into(), max.into()))
    }

    pub fn in_range<T: Into<Value>>(self, range: Range<T>) -> QueryResult<Self> {
        self.define(Operator::Range, false, Params::Range(range.map(Into::into)))
    }

    pub fn not_in_range<T: Into<Value>>(self, range: Range<T>) -> QueryResult<Self> {
        self.define(Operator::Range, true, Params::Range(range.map(Into::into)))
    }

    /// Negate the current node.
    ///
    /// Before an operator is set, the negation is held and applied by the next
    /// operator call, which then fails for `>`, `>=`, `<`, `<=`.
    pub fn not(mut self) -> QueryResult<Self> {
        self.cursor().negate()?;
        Ok(self)
    }

    /// Apply an operator given as a symbol, e.g. `"NOT IN"` or `"<>"`.
    pub fn with(self, symbol: &str, value: impl Into<Value>) -> QueryResult<Self> {
        let (operator, negated) = Operator::parse(symbol)?;
        self.with_op(operator, negated, value)
    }

    /// Typed counterpart of [`with`](Self::with).
    ///
    /// `In` takes a list (a scalar counts as a one-item list) and `Between`
    /// a two-item list. `Range` has no value form. The remaining operators
    /// reject lists.
    pub fn with_op(
        self,
        operator: Operator,
        negated: bool,
        value: impl Into<Value>,
    ) -> QueryResult<Self> {
        let value = value.into();
        match operator {
            Operator::In => self.define(
                Operator::In,
                negated,
                Params::Positional(distinct_values(value.into_list())),
            ),
            Operator::Between => match value {
                Value::List(items) if items.len() == 2 => {
                    let mut items = items.into_iter();
                    let low = items.next().unwrap_or_default();
                    let high = items.next().unwrap_or_default();
                    self.define(Operator::Between, negated, Params::Pair(low, high))
                }
                other => Err(QueryError::validation(format!(
                    "BETWEEN expects two values, got {other}"
                ))
                .traced()),
            },
            Operator::Range => Err(QueryError::UnknownOperator(
                Operator::Range.symbol().to_string(),
            )
            .traced()),
            Operator::Eq
            | Operator::Gt
            | Operator::Gte
            | Operator::Lt
            | Operator::Lte
            | Operator::Like => self.define(operator, negated, Params::Positional(vec![value])),
        }
    }

    // ==================== Chaining ====================

    /// Join the current node with AND and continue on `column`.
    pub fn and(self, column: impl Into<String>) -> Self {
        self.link(Logic::And, ConditionNode::for_column(column.into()))
    }

    /// Join the current node with OR and continue on `column`.
    pub fn or(self, column: impl Into<String>) -> Self {
        self.link(Logic::Or, ConditionNode::for_column(column.into()))
    }

    /// Join with AND and continue on the current node's column.
    pub fn and_same(self) -> QueryResult<Self> {
        let column = self.current_column()?;
        Ok(self.and(column))
    }

    /// Join with OR and continue on the current node's column.
    pub fn or_same(self) -> QueryResult<Self> {
        let column = self.current_column()?;
        Ok(self.or(column))
    }

    /// Join with AND and append a raw fragment.
    pub fn and_raw(self, sql: impl Into<String>) -> Self {
        self.link(Logic::And, ConditionNode::raw(sql.into(), Params::None))
    }

    /// Join with OR and append a raw fragment.
    pub fn or_raw(self, sql: impl Into<String>) -> Self {
        self.link(Logic::Or, ConditionNode::raw(sql.into(), Params::None))
    }

    fn link(mut self, logic: Logic, node: ConditionNode) -> Self {
        self.cursor().set_next_logic(logic);
        self.nodes.push(node);
        self
    }

    fn current_column(&self) -> QueryResult<String> {
        self.nodes
            .last()
            .and_then(|n| n.column())
            .map(str::to_string)
            .ok_or_else(|| {
                QueryError::validation("a raw condition has no column to continue on").traced()
            })
    }

    // ==================== Inspection ====================

    /// The head node.
    pub fn definition(&self) -> &ConditionNode {
        &self.nodes[0]
    }

    pub fn nodes(&self) -> &[ConditionNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false`: a chain holds at least its head node.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Fail if any column node never received an operator.
    pub fn validate(&self) -> QueryResult<()> {
        self.nodes
            .iter()
            .try_for_each(ConditionNode::ensure_defined)
            .map_err(QueryError::traced)
    }

    /// Parameters of the chain from head to tail, in placeholder order.
    pub fn bindings(&self) -> Bindings {
        let mut out = Bindings::new();
        for node in &self.nodes {
            node.collect_bindings(&mut out);
        }
        out
    }

    /// Render the chain on its own with `formatter`.
    pub fn render(&self, formatter: &dyn Formatter) -> QueryResult<Rendered> {
        let mut w = SqlWriter::new(formatter);
        self.write_sql(&mut w)?;
        Ok(w.finish())
    }

    /// Write the chain; chains of more than one node are parenthesized.
    pub(crate) fn write_sql<F: Formatter + ?Sized>(
        &self,
        w: &mut SqlWriter<'_, F>,
    ) -> QueryResult<()> {
        let compound = self.nodes.len() > 1;
        if compound {
            w.push("(");
        }
        for (i, node) in self.nodes.iter().enumerate() {
            node.write_sql(w)?;
            if i + 1 < self.nodes.len() {
                let logic = node.next_logic().unwrap_or(Logic::And);
                w.push(" ").push(logic.keyword()).push(" ");
            }
        }
        if compound {
            w.push(")");
        }
        Ok(())
    }
}

fn check_raw_params(sql: &str, params: &Params) -> QueryResult<()> {
    match params {
        Params::None | Params::Named(_) => Ok(()),
        Params::Positional(values) => {
            let slots = sql.matches('?').count();
            if slots == values.len() {
                Ok(())
            } else {
                Err(QueryError::validation(format!(
                    "raw condition has {slots} '?' placeholders but {} values",
                    values.len()
                ))
                .traced())
            }
        }
        Params::Pair(..) | Params::Range(_) | Params::Column(_) => Err(QueryError::validation(
            "raw conditions take positional or named parameters",
        )
        .traced()),
    }
}
