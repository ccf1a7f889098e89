//! Row mapping traits and utilities

use crate::error::{QueryError, QueryResult};
use crate::value::Value;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// One result row: ordered column names and their values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    columns: Vec<String>,
    values: Vec<Value>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a row from `(column, value)` pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let mut row = Self::new();
        for (column, value) in pairs {
            row.push(column, value);
        }
        row
    }

    pub fn push(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        self.columns.push(column.into());
        self.values.push(value.into());
    }

    /// Value of `column`. A qualified name (`users.id`) falls back to its
    /// last segment when the row has no exact match.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.position(column)
            .or_else(|| {
                column
                    .rsplit_once('.')
                    .and_then(|(_, name)| self.position(name))
            })
            .map(|idx| &self.values[idx])
    }

    pub fn get_at(&self, idx: usize) -> Option<&Value> {
        self.values.get(idx)
    }

    /// Decode `column` into `T`.
    pub fn try_get<T: FromValue>(&self, column: &str) -> QueryResult<T> {
        let value = self
            .get(column)
            .ok_or_else(|| QueryError::decode(column, "column not found"))?;
        T::from_value(value).map_err(|message| QueryError::decode(column, message))
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn position(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }
}

/// Convert a single [`Value`] into a Rust type.
pub trait FromValue: Sized {
    fn from_value(value: &Value) -> Result<Self, String>;
}

fn mismatch(expected: &str, value: &Value) -> String {
    format!("expected {expected}, found {}", value.type_name())
}

impl FromValue for Value {
    fn from_value(value: &Value) -> Result<Self, String> {
        Ok(value.clone())
    }
}

impl FromValue for i64 {
    fn from_value(value: &Value) -> Result<Self, String> {
        match value {
            Value::Int(v) => Ok(*v),
            Value::Text(s) => s.parse().map_err(|_| mismatch("int", value)),
            other => Err(mismatch("int", other)),
        }
    }
}

impl FromValue for i32 {
    fn from_value(value: &Value) -> Result<Self, String> {
        let wide = i64::from_value(value)?;
        i32::try_from(wide).map_err(|_| format!("{wide} does not fit in i32"))
    }
}

impl FromValue for u64 {
    fn from_value(value: &Value) -> Result<Self, String> {
        let wide = i64::from_value(value)?;
        u64::try_from(wide).map_err(|_| format!("{wide} is negative"))
    }
}

impl FromValue for f64 {
    fn from_value(value: &Value) -> Result<Self, String> {
        match value {
            Value::Float(v) => Ok(*v),
            Value::Int(v) => Ok(*v as f64),
            Value::Text(s) => s.parse().map_err(|_| mismatch("float", value)),
            other => Err(mismatch("float", other)),
        }
    }
}

impl FromValue for bool {
    fn from_value(value: &Value) -> Result<Self, String> {
        match value {
            Value::Bool(v) => Ok(*v),
            Value::Int(v) => Ok(*v != 0),
            other => Err(mismatch("bool", other)),
        }
    }
}

impl FromValue for String {
    fn from_value(value: &Value) -> Result<Self, String> {
        match value {
            Value::Text(v) => Ok(v.clone()),
            other => Err(mismatch("text", other)),
        }
    }
}

impl FromValue for Vec<u8> {
    fn from_value(value: &Value) -> Result<Self, String> {
        match value {
            Value::Bytes(v) => Ok(v.clone()),
            other => Err(mismatch("bytes", other)),
        }
    }
}

impl FromValue for serde_json::Value {
    fn from_value(value: &Value) -> Result<Self, String> {
        match value {
            Value::Json(v) => Ok(v.clone()),
            Value::Text(s) => serde_json::from_str(s).map_err(|e| e.to_string()),
            other => Err(mismatch("json", other)),
        }
    }
}

impl FromValue for DateTime<Utc> {
    fn from_value(value: &Value) -> Result<Self, String> {
        match value {
            Value::Timestamp(v) => Ok(*v),
            Value::Text(s) => DateTime::parse_from_rfc3339(s)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| e.to_string()),
            other => Err(mismatch("timestamp", other)),
        }
    }
}

impl FromValue for Uuid {
    fn from_value(value: &Value) -> Result<Self, String> {
        match value {
            Value::Uuid(v) => Ok(*v),
            Value::Text(s) => Uuid::parse_str(s).map_err(|e| e.to_string()),
            other => Err(mismatch("uuid", other)),
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: &Value) -> Result<Self, String> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

/// Trait for types that can be constructed from a result row.
pub trait FromRow: Sized {
    /// Construct an instance from a row.
    fn from_row(row: &Row) -> QueryResult<Self>;
}

impl FromRow for Row {
    fn from_row(row: &Row) -> QueryResult<Self> {
        Ok(row.clone())
    }
}

/// Extension trait for convenient typed row access.
pub trait RowExt {
    /// Decode the first column.
    fn try_get_first<T: FromValue>(&self) -> QueryResult<T>;
}

impl RowExt for Row {
    fn try_get_first<T: FromValue>(&self) -> QueryResult<T> {
        let column = self.columns.first().map(String::as_str).unwrap_or("");
        let value = self
            .get_at(0)
            .ok_or_else(|| QueryError::decode(column, "row has no columns"))?;
        T::from_value(value).map_err(|message| QueryError::decode(column, message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct User {
        id: i64,
        email: Option<String>,
    }

    impl FromRow for User {
        fn from_row(row: &Row) -> QueryResult<Self> {
            Ok(Self {
                id: row.try_get("id")?,
                email: row.try_get("email")?,
            })
        }
    }

    #[test]
    fn typed_access_by_name() {
        let row = Row::from_pairs([("id", Value::Int(7)), ("email", Value::Null)]);
        let user = User::from_row(&row).unwrap();
        assert_eq!(user.id, 7);
        assert_eq!(user.email, None);
    }

    #[test]
    fn qualified_names_fall_back_to_last_segment() {
        let row = Row::from_pairs([("id", 3)]);
        assert_eq!(row.get("users.id"), Some(&Value::Int(3)));
        assert_eq!(row.try_get_first::<i32>().unwrap(), 3);
    }

    #[test]
    fn decode_errors_name_the_column() {
        let row = Row::from_pairs([("id", "seven")]);
        let err = row.try_get::<i64>("id").unwrap_err();
        assert!(matches!(err, QueryError::Decode { ref column, .. } if column == "id"));

        let err = row.try_get::<i64>("missing").unwrap_err();
        assert!(matches!(err, QueryError::Decode { ref column, .. } if column == "missing"));
    }
}
