use crate::condition::{ConditionBuilder, Operator, Params, distinct_values};
use crate::error::{QueryError, QueryResult};
use crate::ident::Ident;
use crate::types::Range;
use crate::value::Value;

/// One WHERE / HAVING / ON predicate.
///
/// The typed variants cover what the variadic `where(...)` forms express;
/// [`Predicate::from_parts`] keeps the runtime-arity form for dynamic input.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// `column = value`; a list value means `IN`.
    Eq { column: String, value: Value },
    /// `column <op> value`, where `negated` selects the NOT form.
    Cmp {
        column: String,
        operator: Operator,
        negated: bool,
        value: Value,
    },
    /// `column IN (...)`
    In { column: String, values: Vec<Value> },
    /// Column within an interval.
    Range { column: String, range: Range<Value> },
    /// Literal SQL with optional parameters.
    Raw { sql: String, params: Params },
    /// A pre-built condition chain.
    Sub(ConditionBuilder),
}

impl Predicate {
    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Predicate::Eq {
            column: column.into(),
            value: value.into(),
        }
    }

    pub fn cmp(column: impl Into<String>, operator: Operator, value: impl Into<Value>) -> Self {
        Predicate::Cmp {
            column: column.into(),
            operator,
            negated: false,
            value: value.into(),
        }
    }

    /// Comparison from an operator symbol such as `">="` or `"NOT LIKE"`.
    pub fn op(
        column: impl Into<String>,
        symbol: &str,
        value: impl Into<Value>,
    ) -> QueryResult<Self> {
        let (operator, negated) = Operator::parse(symbol)?;
        Ok(Predicate::Cmp {
            column: column.into(),
            operator,
            negated,
            value: value.into(),
        })
    }

    pub fn in_list<I, T>(column: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Predicate::In {
            column: column.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn range<T: Into<Value>>(column: impl Into<String>, range: Range<T>) -> Self {
        Predicate::Range {
            column: column.into(),
            range: range.map(Into::into),
        }
    }

    pub fn raw(sql: impl Into<String>) -> Self {
        Predicate::Raw {
            sql: sql.into(),
            params: Params::None,
        }
    }

    pub fn raw_with(sql: impl Into<String>, params: Params) -> Self {
        Predicate::Raw {
            sql: sql.into(),
            params,
        }
    }

    pub fn sub(condition: ConditionBuilder) -> Self {
        Predicate::Sub(condition)
    }

    /// Build a predicate from runtime parts:
    ///
    /// - `[column, value]`: a list value means IN, anything else equality
    /// - `[column, operator, value]`: operator symbol applied to value
    ///
    /// Column names must be plain identifiers. A single part fails with
    /// [`QueryError::Validation`]: dynamic input never supplies SQL text, so
    /// raw fragments go through [`Predicate::raw`]. Counts outside 1 to 3
    /// fail with [`QueryError::InvalidArgumentCount`].
    pub fn from_parts(parts: Vec<Value>) -> QueryResult<Self> {
        let count = parts.len();
        let mut parts = parts.into_iter();
        match (count, parts.next(), parts.next(), parts.next()) {
            (1, Some(_), None, None) => Err(QueryError::validation(
                "a single-part predicate must be a condition, not SQL text",
            )
            .traced()),
            (2, Some(column), Some(value), None) => {
                let column = column_part(column)?;
                Ok(match value {
                    Value::List(values) => Predicate::In { column, values },
                    value => Predicate::Eq { column, value },
                })
            }
            (3, Some(column), Some(symbol), Some(value)) => {
                let column = column_part(column)?;
                let symbol = text_part(symbol, "operator")?;
                Predicate::op(column, &symbol, value)
            }
            _ => Err(QueryError::InvalidArgumentCount(count).traced()),
        }
    }

    /// [`from_parts`](Self::from_parts) over a JSON array, e.g.
    /// `["age", ">", 18]`.
    pub fn from_json(json: &serde_json::Value) -> QueryResult<Self> {
        match json {
            serde_json::Value::Array(items) => {
                Self::from_parts(items.iter().map(Value::from_json).collect())
            }
            other => Err(QueryError::validation(format!(
                "predicate must be a JSON array, got {other}"
            ))
            .traced()),
        }
    }

    /// Lower into a condition chain, optionally negated.
    pub fn into_condition(self, negated: bool) -> QueryResult<ConditionBuilder> {
        match self {
            Predicate::Eq {
                column,
                value: Value::List(values),
            } => Ok(ConditionBuilder::single(
                column,
                Operator::In,
                negated,
                Params::Positional(distinct_values(values)),
            )),
            Predicate::Eq { column, value } => Ok(ConditionBuilder::single(
                column,
                Operator::Eq,
                negated,
                Params::Positional(vec![value]),
            )),
            Predicate::Cmp {
                column,
                operator,
                negated: symbol_negated,
                value,
            } => ConditionBuilder::column(column).with_op(
                operator,
                negated != symbol_negated,
                value,
            ),
            Predicate::In { column, values } => Ok(ConditionBuilder::single(
                column,
                Operator::In,
                negated,
                Params::Positional(distinct_values(values)),
            )),
            Predicate::Range { column, range } => Ok(ConditionBuilder::single(
                column,
                Operator::Range,
                negated,
                Params::Range(range),
            )),
            Predicate::Raw { sql, params } => {
                if negated {
                    return Err(QueryError::NegationUnsupported {
                        operator: "raw SQL".to_string(),
                    }
                    .traced());
                }
                ConditionBuilder::raw_with(sql, params)
            }
            Predicate::Sub(condition) => {
                if negated {
                    return Err(QueryError::NegationUnsupported {
                        operator: "condition chain".to_string(),
                    }
                    .traced());
                }
                Ok(condition)
            }
        }
    }
}

impl From<ConditionBuilder> for Predicate {
    fn from(condition: ConditionBuilder) -> Self {
        Predicate::Sub(condition)
    }
}

fn column_part(value: Value) -> QueryResult<String> {
    let column = text_part(value, "column")?;
    Ident::parse(&column).map_err(QueryError::traced)?;
    Ok(column)
}

fn text_part(value: Value, what: &str) -> QueryResult<String> {
    match value {
        Value::Text(s) => Ok(s),
        other => Err(QueryError::validation(format!(
            "predicate {what} must be text, got {}",
            other.type_name()
        ))
        .traced()),
    }
}
