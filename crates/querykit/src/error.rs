//! Error types for querykit

use thiserror::Error;

/// Result type alias for querykit operations
pub type QueryResult<T> = Result<T, QueryError>;

/// Error types for statement building and execution
#[derive(Debug, Error)]
pub enum QueryError {
    /// An operator was set twice on the same condition node
    #[error("condition on '{column}' is already defined")]
    AlreadyDefined { column: String },

    /// Operator symbol outside the supported table
    #[error("unknown operator: {0}")]
    UnknownOperator(String),

    /// Negation requested on an operator (or raw node) that cannot be negated
    #[error("operator {operator} cannot be negated")]
    NegationUnsupported { operator: String },

    /// A runtime-arity predicate received other than 1 to 3 parts
    #[error("expected 1 to 3 predicate arguments, got {0}")]
    InvalidArgumentCount(usize),

    /// Sort direction other than ASC/DESC
    #[error("invalid sort direction '{0}', expected ASC or DESC")]
    InvalidSortDirection(String),

    /// Cursor pagination needs an ORDER BY column to seek on
    #[error("cursor pagination requires at least one ORDER BY column")]
    CursorPaginationRequiresOrder,

    /// The statement type (or the active dialect) lacks the operation
    #[error("{statement} does not support {operation}")]
    UnsupportedStatementOperation { statement: String, operation: String },

    /// Database connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Query execution error
    #[error("Query error: {0}")]
    Query(String),

    /// Row decode/mapping error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// Row not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

impl QueryError {
    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create an unsupported-operation error
    pub fn unsupported(statement: impl Into<String>, operation: impl Into<String>) -> Self {
        Self::UnsupportedStatementOperation {
            statement: statement.into(),
            operation: operation.into(),
        }
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Check if this error comes from misuse of a builder rather than the backend.
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self,
            Self::AlreadyDefined { .. }
                | Self::UnknownOperator(_)
                | Self::NegationUnsupported { .. }
                | Self::InvalidArgumentCount(_)
                | Self::InvalidSortDirection(_)
                | Self::CursorPaginationRequiresOrder
                | Self::UnsupportedStatementOperation { .. }
                | Self::Validation(_)
        )
    }

    /// Log a rejected builder call at debug level and hand the error back.
    pub(crate) fn traced(self) -> Self {
        tracing::debug!(target: "querykit", error = %self, "rejected builder call");
        self
    }
}

#[cfg(feature = "postgres")]
impl From<tokio_postgres::Error> for QueryError {
    fn from(err: tokio_postgres::Error) -> Self {
        if err.is_closed() {
            Self::Connection(err.to_string())
        } else {
            Self::Query(err.to_string())
        }
    }
}
