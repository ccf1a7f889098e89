//! Condition chains: the building block behind WHERE, HAVING and JOIN ... ON.
//!
//! A [`ConditionBuilder`] owns an ordered chain of [`ConditionNode`]s. Each
//! node holds one column comparison (or a raw SQL fragment) and the logical
//! connector joining it to the next node.
//!
//! ```ignore
//! use querykit::condition::ConditionBuilder;
//!
//! let cond = ConditionBuilder::column("age")
//!     .greater_than(18)?
//!     .or("status")
//!     .equals("vip")?;
//! // (age > ? OR status = ?)
//! ```

mod builder;
mod node;

pub use builder::ConditionBuilder;
pub use node::ConditionNode;

use crate::error::{QueryError, QueryResult};
use crate::types::Range;
use crate::value::{Bindings, Value};

/// Comparison operators a condition node can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Eq,
    Gt,
    Gte,
    Lt,
    Lte,
    Like,
    In,
    Between,
    Range,
}

impl Operator {
    /// The positive SQL spelling of the operator.
    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Gt => ">",
            Operator::Gte => ">=",
            Operator::Lt => "<",
            Operator::Lte => "<=",
            Operator::Like => "LIKE",
            Operator::In => "IN",
            Operator::Between => "BETWEEN",
            Operator::Range => "RANGE",
        }
    }

    /// Ordering comparisons have no negated form.
    pub fn supports_negation(self) -> bool {
        !matches!(
            self,
            Operator::Gt | Operator::Gte | Operator::Lt | Operator::Lte
        )
    }

    /// Parse an operator symbol into `(operator, negated)`.
    ///
    /// Matching is case-insensitive and tolerant of extra whitespace, so
    /// `"not  in"` parses as `(In, true)`.
    pub fn parse(symbol: &str) -> QueryResult<(Operator, bool)> {
        let normalized = symbol
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_ascii_uppercase();

        let parsed = match normalized.as_str() {
            "=" => (Operator::Eq, false),
            "!=" | "<>" => (Operator::Eq, true),
            ">" => (Operator::Gt, false),
            ">=" => (Operator::Gte, false),
            "<" => (Operator::Lt, false),
            "<=" => (Operator::Lte, false),
            "IN" => (Operator::In, false),
            "NOT IN" => (Operator::In, true),
            "BETWEEN" => (Operator::Between, false),
            "NOT BETWEEN" => (Operator::Between, true),
            "LIKE" => (Operator::Like, false),
            "NOT LIKE" => (Operator::Like, true),
            _ => return Err(QueryError::UnknownOperator(symbol.to_string()).traced()),
        };
        Ok(parsed)
    }
}

/// Logical connector between two adjacent nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Logic {
    And,
    Or,
}

impl Logic {
    pub fn keyword(self) -> &'static str {
        match self {
            Logic::And => "AND",
            Logic::Or => "OR",
        }
    }
}

/// Parameter payload of a condition node.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Params {
    #[default]
    None,
    /// Ordered values: one for comparisons, many for `IN`, or raw `?` slots.
    Positional(Vec<Value>),
    /// Named values for raw fragments using `:name` tokens.
    Named(Vec<(String, Value)>),
    /// The two endpoints of `BETWEEN`.
    Pair(Value, Value),
    Range(Range<Value>),
    /// Another column on the right-hand side, e.g. `o.user_id = u.id`.
    Column(String),
}

impl Params {
    /// Values contributed to the statement's bindings, in placeholder order.
    pub(crate) fn collect_into(&self, out: &mut Bindings) {
        match self {
            Params::None | Params::Column(_) => {}
            Params::Positional(values) => values.iter().cloned().for_each(|v| out.push(v)),
            Params::Named(values) => {
                for (name, value) in values {
                    out.set_named(name.clone(), value.clone());
                }
            }
            Params::Pair(low, high) => {
                out.push(low.clone());
                out.push(high.clone());
            }
            Params::Range(range) => range.bindings().into_iter().for_each(|v| out.push(v)),
        }
    }
}

/// Drop nulls and duplicates, keeping the first occurrence of each value.
pub(crate) fn distinct_values<I, T>(values: I) -> Vec<Value>
where
    I: IntoIterator<Item = T>,
    T: Into<Value>,
{
    let mut out: Vec<Value> = Vec::new();
    for value in values {
        let value = value.into();
        if value.is_null() || out.contains(&value) {
            continue;
        }
        out.push(value);
    }
    out
}
