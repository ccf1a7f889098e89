//! Dialect boundary: turns statement models into SQL text plus bindings.
//!
//! A [`Formatter`] supplies the dialect-specific pieces (placeholders,
//! identifier quoting, clause support). The shared renderer walks the
//! statement once through a [`SqlWriter`], so the text and the bindings it
//! returns always agree on parameter order.

mod dialect;
mod render;
mod writer;

pub use dialect::{GenericFormatter, MySqlFormatter, PostgresFormatter};
pub use render::WriteSql;
pub use writer::SqlWriter;

use crate::error::QueryResult;
use crate::statement::Statement;
use crate::value::Bindings;

/// SQL dialect hooks used by the renderer.
pub trait Formatter: Send + Sync {
    /// Dialect name for logs and error messages.
    fn name(&self) -> &'static str;

    /// Quote a table or column name. Expressions are returned unchanged.
    fn quote_identifier(&self, name: &str) -> String;

    /// Placeholder for the `index`-th parameter (1-based, in emission order).
    fn placeholder(&self, index: usize) -> String;

    /// Column reference, optionally qualified by `table`.
    fn column_name(&self, name: &str, table: Option<&str>) -> String {
        match table {
            Some(table) => format!(
                "{}.{}",
                self.quote_identifier(table),
                self.quote_identifier(name)
            ),
            None => self.quote_identifier(name),
        }
    }

    /// Whether INSERT/UPDATE/DELETE may carry `RETURNING`.
    fn supports_returning(&self) -> bool {
        false
    }

    /// Whether UPDATE/DELETE may carry `ORDER BY` / `LIMIT`.
    fn supports_ordered_mutations(&self) -> bool {
        false
    }

    /// Row lock clause appended to a locking SELECT.
    fn lock_clause(&self) -> &'static str {
        "FOR UPDATE"
    }

    /// Render `statement` to text and bindings.
    fn render(&self, statement: &Statement) -> QueryResult<Rendered> {
        crate::format::render(self, statement)
    }

    /// Bindings `render` would produce, in the same order.
    fn bindings_for(&self, statement: &Statement) -> QueryResult<Bindings> {
        Ok(crate::format::render(self, statement)?.bindings)
    }
}

/// Output of rendering one statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Rendered {
    /// Statement text with dialect placeholders.
    pub sql: String,
    /// Parameters in placeholder order.
    pub bindings: Bindings,
    pub(crate) interpolated: String,
}

impl Rendered {
    /// Statement text with every bound value inlined as an SQL literal.
    ///
    /// For logs and debugging only; never execute it.
    pub fn interpolated(&self) -> &str {
        &self.interpolated
    }
}

/// Render any statement model with `formatter`.
pub fn render<F, S>(formatter: &F, statement: &S) -> QueryResult<Rendered>
where
    F: Formatter + ?Sized,
    S: WriteSql + ?Sized,
{
    let mut w = SqlWriter::new(formatter);
    statement.write_sql(&mut w)?;
    Ok(w.finish())
}
