//! Safe SQL identifier handling.
//!
//! [`Ident`] represents a SQL identifier (schema/table/column) in dotted
//! notation. Formatters use it to decide whether a name is a plain identifier
//! they may quote, or an expression they must pass through untouched.
//!
//! - Unquoted parts are validated against: `[A-Za-z_][A-Za-z0-9_$]*`
//! - Quoted parts allow any characters except NUL and escape `"` as `""`
//!
//! # Example
//! ```ignore
//! use querykit::Ident;
//!
//! let t = Ident::parse("public.users")?;
//! let c = Ident::parse(r#""CamelCase"."UserTable""#)?;
//! # Ok::<(), querykit::QueryError>(())
//! ```

use crate::error::{QueryError, QueryResult};

/// A part of a SQL identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentPart {
    /// Unquoted identifier: must match `[A-Za-z_][A-Za-z0-9_$]*`.
    Unquoted(String),
    /// Quoted identifier: allows any characters except NUL.
    Quoted(String),
}

/// A SQL identifier (column, table, or schema name).
///
/// Supports dotted notation (e.g., `schema.table.column`) and quoted identifiers
/// (e.g., `"CamelCase"."User"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    pub parts: Vec<IdentPart>,
}

impl Ident {
    /// Parse a possibly dotted, possibly quoted name such as `orders.total`
    /// or `public."OrderLines".qty`.
    ///
    /// Fails with [`QueryError::Validation`] naming the offending input.
    pub fn parse(s: &str) -> QueryResult<Self> {
        if s.contains('\0') {
            return Err(invalid(s, "NUL character"));
        }

        let mut parts = Vec::new();
        let mut rest = s;
        loop {
            let (part, tail) = split_part(rest).map_err(|reason| invalid(s, reason))?;
            parts.push(part);
            if tail.is_empty() {
                return Ok(Self { parts });
            }
            rest = tail
                .strip_prefix('.')
                .ok_or_else(|| invalid(s, "parts must be separated by '.'"))?;
        }
    }

    /// Render the identifier as written (unquoted parts bare, quoted parts in `"`).
    pub fn to_sql(&self) -> String {
        self.render(|part| matches!(part, IdentPart::Quoted(_)), '"')
    }

    /// Render with every part wrapped in `quote`, doubling embedded quote chars.
    pub fn quoted_with(&self, quote: char) -> String {
        self.render(|_| true, quote)
    }

    fn render(&self, quote_part: impl Fn(&IdentPart) -> bool, quote: char) -> String {
        let mut out = String::new();
        for part in &self.parts {
            if !out.is_empty() {
                out.push('.');
            }
            let (IdentPart::Unquoted(name) | IdentPart::Quoted(name)) = part;
            if quote_part(part) {
                push_quoted(&mut out, name, quote);
            } else {
                out.push_str(name);
            }
        }
        out
    }
}

fn invalid(input: &str, reason: &str) -> QueryError {
    QueryError::validation(format!("invalid identifier '{input}': {reason}"))
}

/// Split the leading part off `s`, returning it and the unconsumed tail.
fn split_part(s: &str) -> Result<(IdentPart, &str), &'static str> {
    if let Some(body) = s.strip_prefix('"') {
        let mut name = String::new();
        let mut chars = body.char_indices().peekable();
        while let Some((i, c)) = chars.next() {
            if c != '"' {
                name.push(c);
            } else if chars.next_if(|&(_, next)| next == '"').is_some() {
                name.push('"');
            } else if name.is_empty() {
                return Err("empty quoted part");
            } else {
                return Ok((IdentPart::Quoted(name), &body[i + 1..]));
            }
        }
        return Err("unclosed quote");
    }

    let end = s.find(['.', '"']).unwrap_or(s.len());
    let (name, tail) = s.split_at(end);
    let mut chars = name.chars();
    match chars.next() {
        None => Err("empty part"),
        Some(first) if first != '_' && !first.is_ascii_alphabetic() => {
            Err("a part must start with a letter or '_'")
        }
        Some(_) if !chars.all(|c| c == '_' || c == '$' || c.is_ascii_alphanumeric()) => {
            Err("a part may only hold letters, digits, '_' and '$'")
        }
        Some(_) => Ok((IdentPart::Unquoted(name.to_string()), tail)),
    }
}

fn push_quoted(out: &mut String, name: &str, quote: char) {
    out.push(quote);
    for ch in name.chars() {
        if ch == quote {
            out.push(quote);
        }
        out.push(ch);
    }
    out.push(quote);
}

/// Quote `name` when it parses as an identifier; expressions pass through.
pub(crate) fn quote_or_verbatim(name: &str, quote: char) -> String {
    match Ident::parse(name) {
        Ok(ident) => ident.quoted_with(quote),
        Err(_) => name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts(s: &str) -> Vec<IdentPart> {
        Ident::parse(s).unwrap().parts
    }

    #[test]
    fn qualified_column_names() {
        assert_eq!(
            parts("orders.total"),
            vec![
                IdentPart::Unquoted("orders".into()),
                IdentPart::Unquoted("total".into()),
            ]
        );
        assert_eq!(parts("sales.orders.total").len(), 3);
        assert_eq!(Ident::parse("_tmp$2").unwrap().to_sql(), "_tmp$2");
    }

    #[test]
    fn quoted_parts_keep_case_and_quotes() {
        let ident = Ident::parse(r#"public."OrderLines"."say ""hi""""#).unwrap();
        assert_eq!(
            ident.parts,
            vec![
                IdentPart::Unquoted("public".into()),
                IdentPart::Quoted("OrderLines".into()),
                IdentPart::Quoted(r#"say "hi""#.into()),
            ]
        );
        assert_eq!(ident.to_sql(), r#"public."OrderLines"."say ""hi""""#);
    }

    #[test]
    fn malformed_names_are_rejected() {
        for bad in [
            "",
            "9lives",
            "first name",
            "a..b",
            "orders.",
            ".orders",
            r#""open"#,
            r#""""#,
            r#""a"b"#,
            "id; DROP TABLE t",
            "a\0b",
        ] {
            let err = Ident::parse(bad).unwrap_err();
            assert!(matches!(err, QueryError::Validation(_)), "input {bad:?}");
        }
    }

    #[test]
    fn error_names_the_input() {
        let err = Ident::parse("total-amount").unwrap_err();
        assert!(err.to_string().contains("total-amount"));
    }

    #[test]
    fn dialect_quoting_escapes_the_quote_char() {
        let ident = Ident::parse(r#"orders."Net""Total""#).unwrap();
        assert_eq!(ident.quoted_with('"'), r#""orders"."Net""Total""#);
        assert_eq!(ident.quoted_with('`'), r#"`orders`.`Net"Total`"#);
    }

    #[test]
    fn expressions_pass_through() {
        assert_eq!(quote_or_verbatim("COUNT(*) AS total", '"'), "COUNT(*) AS total");
        assert_eq!(quote_or_verbatim("orders.*", '"'), "orders.*");
        assert_eq!(quote_or_verbatim("status", '`'), "`status`");
    }
}
