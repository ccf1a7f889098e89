use super::{Formatter, Rendered};
use crate::value::{Bindings, Value};

/// Accumulates statement text and bindings in a single walk.
///
/// Every [`push_bind`](Self::push_bind) asks the formatter for the next
/// placeholder and appends the value to the bindings at the same moment, so
/// placeholder order and binding order cannot drift apart. A second buffer
/// receives the value as an SQL literal for debug output.
pub struct SqlWriter<'f, F: Formatter + ?Sized> {
    formatter: &'f F,
    sql: String,
    interpolated: String,
    bindings: Bindings,
    placeholders: usize,
}

impl<'f, F: Formatter + ?Sized> SqlWriter<'f, F> {
    pub fn new(formatter: &'f F) -> Self {
        Self {
            formatter,
            sql: String::with_capacity(128),
            interpolated: String::with_capacity(128),
            bindings: Bindings::new(),
            placeholders: 0,
        }
    }

    pub fn formatter(&self) -> &'f F {
        self.formatter
    }

    /// Append literal SQL text.
    pub fn push(&mut self, sql: &str) -> &mut Self {
        self.sql.push_str(sql);
        self.interpolated.push_str(sql);
        self
    }

    /// Append a table or column name through the dialect's quoting.
    pub fn push_column(&mut self, name: &str) -> &mut Self {
        let column = self.formatter.column_name(name, None);
        self.push(&column)
    }

    /// Append a placeholder and bind `value` to it.
    pub fn push_bind(&mut self, value: Value) -> &mut Self {
        self.placeholders += 1;
        let placeholder = self.formatter.placeholder(self.placeholders);
        self.sql.push_str(&placeholder);
        self.interpolated.push_str(&value.to_string());
        self.bindings.push(value);
        self
    }

    /// Append `template`, binding one value per `?` in order.
    pub fn push_template(&mut self, template: &str, values: &[Value]) -> &mut Self {
        let mut values = values.iter();
        let mut pieces = template.split('?');
        if let Some(first) = pieces.next() {
            self.push(first);
        }
        for piece in pieces {
            let value = values.next().cloned().unwrap_or_default();
            self.push_bind(value);
            self.push(piece);
        }
        self
    }

    /// Bind a named value; the token itself is already part of the text.
    pub fn bind_named(&mut self, name: &str, value: Value) -> &mut Self {
        self.bindings.set_named(name, value);
        self
    }

    pub fn finish(self) -> Rendered {
        Rendered {
            sql: self.sql,
            bindings: self.bindings,
            interpolated: self.interpolated,
        }
    }
}
