use super::{Logic, Operator, Params};
use crate::error::{QueryError, QueryResult};
use crate::format::{Formatter, SqlWriter};
use crate::value::{Bindings, Value};

/// One link of a condition chain.
///
/// A node is either a column comparison (column set, operator assigned once)
/// or a raw SQL fragment (no column, no operator, text in [`raw_sql`]).
///
/// [`raw_sql`]: ConditionNode::raw_sql
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionNode {
    column: Option<String>,
    raw: Option<String>,
    operator: Option<Operator>,
    negated: bool,
    params: Params,
    defined: bool,
    next_logic: Option<Logic>,
}

impl ConditionNode {
    pub(crate) fn for_column(column: String) -> Self {
        Self {
            column: Some(column),
            raw: None,
            operator: None,
            negated: false,
            params: Params::None,
            defined: false,
            next_logic: None,
        }
    }

    /// A column node with its operator set. Callers only negate operators
    /// that have a negated form.
    pub(crate) fn defined(
        column: String,
        operator: Operator,
        negated: bool,
        params: Params,
    ) -> Self {
        debug_assert!(
            !negated || operator.supports_negation(),
            "{} has no negated form",
            operator.symbol()
        );
        Self {
            column: Some(column),
            raw: None,
            operator: Some(operator),
            negated,
            params,
            defined: true,
            next_logic: None,
        }
    }

    pub(crate) fn raw(sql: String, params: Params) -> Self {
        Self {
            column: None,
            raw: Some(sql),
            operator: None,
            negated: false,
            params,
            defined: true,
            next_logic: None,
        }
    }

    pub fn column(&self) -> Option<&str> {
        self.column.as_deref()
    }

    pub fn raw_sql(&self) -> Option<&str> {
        self.raw.as_deref()
    }

    pub fn is_raw(&self) -> bool {
        self.raw.is_some()
    }

    pub fn operator(&self) -> Option<Operator> {
        self.operator
    }

    pub fn is_negated(&self) -> bool {
        self.negated
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn is_defined(&self) -> bool {
        self.defined
    }

    pub fn next_logic(&self) -> Option<Logic> {
        self.next_logic
    }

    pub(crate) fn set_next_logic(&mut self, logic: Logic) {
        self.next_logic = Some(logic);
    }

    fn label(&self) -> String {
        match (&self.column, &self.raw) {
            (Some(column), _) => column.clone(),
            (None, Some(sql)) => sql.clone(),
            (None, None) => String::new(),
        }
    }

    /// Assign operator and parameters. A negation requested earlier through
    /// `not()` combines with `negated`.
    pub(crate) fn define(
        &mut self,
        operator: Operator,
        negated: bool,
        params: Params,
    ) -> QueryResult<()> {
        if self.is_raw() {
            return Err(QueryError::NegationUnsupported {
                operator: "raw SQL".to_string(),
            }
            .traced());
        }
        if self.defined {
            return Err(QueryError::AlreadyDefined {
                column: self.label(),
            }
            .traced());
        }

        if operator != Operator::In {
            if let Params::Positional(values) = &params {
                if let Some(list) = values.iter().find(|v| matches!(v, Value::List(_))) {
                    return Err(QueryError::validation(format!(
                        "operator {} on '{}' takes a single value, got {list}",
                        operator.symbol(),
                        self.label()
                    ))
                    .traced());
                }
            }
        }

        let negated = self.negated != negated;
        if negated && !operator.supports_negation() {
            return Err(QueryError::NegationUnsupported {
                operator: operator.symbol().to_string(),
            }
            .traced());
        }

        self.operator = Some(operator);
        self.negated = negated;
        self.params = params;
        self.defined = true;
        Ok(())
    }

    pub(crate) fn negate(&mut self) -> QueryResult<()> {
        if self.is_raw() {
            return Err(QueryError::NegationUnsupported {
                operator: "raw SQL".to_string(),
            }
            .traced());
        }
        if let Some(operator) = self.operator {
            if !operator.supports_negation() {
                return Err(QueryError::NegationUnsupported {
                    operator: operator.symbol().to_string(),
                }
                .traced());
            }
        }
        self.negated = !self.negated;
        Ok(())
    }

    pub(crate) fn ensure_defined(&self) -> QueryResult<()> {
        if self.defined {
            Ok(())
        } else {
            Err(QueryError::validation(format!(
                "condition on '{}' has no operator",
                self.label()
            )))
        }
    }

    /// Values this node binds, mirroring [`write_sql`](Self::write_sql).
    pub(crate) fn collect_bindings(&self, out: &mut Bindings) {
        match (self.operator, &self.params) {
            (Some(Operator::Eq), Params::Positional(values))
                if values.first().is_some_and(Value::is_null) => {}
            (_, params) => params.collect_into(out),
        }
    }

    pub(crate) fn write_sql<F: Formatter + ?Sized>(
        &self,
        w: &mut SqlWriter<'_, F>,
    ) -> QueryResult<()> {
        if let Some(sql) = &self.raw {
            match &self.params {
                Params::Positional(values) => {
                    w.push_template(sql, values);
                }
                Params::Named(values) => {
                    w.push(sql);
                    for (name, value) in values {
                        w.bind_named(name, value.clone());
                    }
                }
                _ => {
                    w.push(sql);
                }
            }
            return Ok(());
        }

        self.ensure_defined()?;
        let (Some(column), Some(operator)) = (&self.column, self.operator) else {
            return Ok(());
        };
        let column = w.formatter().column_name(column, None);
        let negated = self.negated;

        match (operator, &self.params) {
            (Operator::Eq, Params::Positional(values)) => match values.first() {
                Some(Value::Null) | None => {
                    w.push(&column)
                        .push(if negated { " IS NOT NULL" } else { " IS NULL" });
                }
                Some(value) => {
                    w.push(&column).push(if negated { " != " } else { " = " });
                    w.push_bind(value.clone());
                }
            },
            (
                op @ (Operator::Eq | Operator::Gt | Operator::Gte | Operator::Lt | Operator::Lte),
                Params::Column(other),
            ) => {
                let symbol = if negated { "!=" } else { op.symbol() };
                let other = w.formatter().column_name(other, None);
                w.push(&column).push(" ").push(symbol).push(" ").push(&other);
            }
            (Operator::In, Params::Positional(values)) => {
                if values.is_empty() {
                    w.push("1 = 0");
                } else {
                    w.push(&column)
                        .push(if negated { " NOT IN (" } else { " IN (" });
                    for (i, value) in values.iter().enumerate() {
                        if i > 0 {
                            w.push(", ");
                        }
                        w.push_bind(value.clone());
                    }
                    w.push(")");
                }
            }
            (Operator::Between, Params::Pair(low, high)) => {
                w.push(&column)
                    .push(if negated { " NOT BETWEEN " } else { " BETWEEN " });
                w.push_bind(low.clone());
                w.push(" AND ");
                w.push_bind(high.clone());
            }
            (Operator::Range, Params::Range(range)) => {
                range.write_condition(&column, negated, w);
            }
            (Operator::Like, Params::Positional(values)) => {
                w.push(&column)
                    .push(if negated { " NOT LIKE " } else { " LIKE " });
                w.push_bind(values.first().cloned().unwrap_or_default());
            }
            (
                op @ (Operator::Gt | Operator::Gte | Operator::Lt | Operator::Lte),
                Params::Positional(values),
            ) => {
                if negated {
                    return Err(QueryError::NegationUnsupported {
                        operator: op.symbol().to_string(),
                    });
                }
                w.push(&column).push(" ").push(op.symbol()).push(" ");
                w.push_bind(values.first().cloned().unwrap_or_default());
            }
            (op, params) => {
                return Err(QueryError::validation(format!(
                    "operator {} on '{}' cannot take {:?}",
                    op.symbol(),
                    column,
                    params
                )));
            }
        }
        Ok(())
    }
}
