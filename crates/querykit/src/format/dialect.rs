use super::Formatter;
use crate::ident::quote_or_verbatim;

/// Dialect-neutral output: `?` placeholders, identifiers as written.
///
/// Accepts every clause, which makes it the formatter of choice for
/// `to_sql()` debugging and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenericFormatter;

impl Formatter for GenericFormatter {
    fn name(&self) -> &'static str {
        "generic"
    }

    fn quote_identifier(&self, name: &str) -> String {
        name.to_string()
    }

    fn placeholder(&self, _index: usize) -> String {
        "?".to_string()
    }

    fn supports_returning(&self) -> bool {
        true
    }

    fn supports_ordered_mutations(&self) -> bool {
        true
    }
}

/// PostgreSQL: `$1, $2, ...` placeholders and double-quoted identifiers.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresFormatter;

impl Formatter for PostgresFormatter {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn quote_identifier(&self, name: &str) -> String {
        quote_or_verbatim(name, '"')
    }

    fn placeholder(&self, index: usize) -> String {
        format!("${index}")
    }

    fn supports_returning(&self) -> bool {
        true
    }
}

/// MySQL: `?` placeholders and backtick-quoted identifiers.
#[derive(Debug, Clone, Copy, Default)]
pub struct MySqlFormatter;

impl Formatter for MySqlFormatter {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn quote_identifier(&self, name: &str) -> String {
        quote_or_verbatim(name, '`')
    }

    fn placeholder(&self, _index: usize) -> String {
        "?".to_string()
    }

    fn supports_ordered_mutations(&self) -> bool {
        true
    }
}
