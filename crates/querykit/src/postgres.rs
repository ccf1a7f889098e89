//! PostgreSQL connection over `tokio-postgres`.
//!
//! Builders are synchronous, so [`PgConnection`] owns a current-thread tokio
//! runtime and blocks on each call. The connection task is spawned on that
//! runtime and makes progress while a query is being awaited.

use crate::config::QueryConfig;
use crate::connection::Connection;
use crate::error::{QueryError, QueryResult};
use crate::format::{Formatter, PostgresFormatter};
use crate::row::Row;
use crate::value::{Bindings, Value};
use bytes::BytesMut;
use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use std::error::Error;
use tokio::runtime::Runtime;
use tokio_postgres::types::{IsNull, ToSql, Type};
use tokio_postgres::{Client, NoTls};
use uuid::Uuid;

/// Blocking PostgreSQL connection.
pub struct PgConnection {
    runtime: Runtime,
    client: Client,
    formatter: PostgresFormatter,
    config: QueryConfig,
}

impl PgConnection {
    /// Connect with `NoTls` using a connection string or URL.
    pub fn connect(conn_str: &str) -> QueryResult<Self> {
        Self::connect_with(conn_str, QueryConfig::default())
    }

    /// Connect with `NoTls` and custom settings.
    pub fn connect_with(conn_str: &str, config: QueryConfig) -> QueryResult<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| QueryError::Connection(format!("failed to start runtime: {e}")))?;

        let (client, connection) = runtime.block_on(tokio_postgres::connect(conn_str, NoTls))?;
        runtime.spawn(async move {
            if let Err(e) = connection.await {
                tracing::warn!(
                    target: "querykit.postgres",
                    error = %e,
                    "connection closed with error"
                );
            }
        });

        tracing::debug!(target: "querykit.postgres", "connected");
        Ok(Self {
            runtime,
            client,
            formatter: PostgresFormatter,
            config,
        })
    }

    /// The underlying client, for statements the builders do not cover.
    pub fn client(&self) -> &Client {
        &self.client
    }
}

impl std::fmt::Debug for PgConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgConnection")
            .field("closed", &self.client.is_closed())
            .field("config", &self.config)
            .finish()
    }
}

impl Connection for PgConnection {
    fn formatter(&self) -> &dyn Formatter {
        &self.formatter
    }

    fn config(&self) -> &QueryConfig {
        &self.config
    }

    fn query(&self, sql: &str, bindings: &Bindings) -> QueryResult<Vec<Row>> {
        let params = positional_params(bindings)?;
        let rows = self.runtime.block_on(self.client.query(sql, &params))?;
        rows.iter().map(decode_row).collect()
    }

    fn affecting_query(&self, sql: &str, bindings: &Bindings) -> QueryResult<u64> {
        let params = positional_params(bindings)?;
        Ok(self.runtime.block_on(self.client.execute(sql, &params))?)
    }
}

fn positional_params(bindings: &Bindings) -> QueryResult<Vec<&(dyn ToSql + Sync)>> {
    if !bindings.named().is_empty() {
        return Err(QueryError::unsupported("postgres", "named bindings").traced());
    }
    Ok(bindings
        .positional()
        .iter()
        .map(|v| v as &(dyn ToSql + Sync))
        .collect())
}

// ==================== Encoding ====================

impl ToSql for Value {
    fn to_sql(
        &self,
        ty: &Type,
        out: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
        match self {
            Value::Null => Ok(IsNull::Yes),
            Value::Bool(v) => v.to_sql_checked(ty, out),
            Value::Int(v) => match *ty {
                Type::INT2 => i16::try_from(*v)?.to_sql_checked(ty, out),
                Type::INT4 => i32::try_from(*v)?.to_sql_checked(ty, out),
                Type::NUMERIC => Decimal::from(*v).to_sql_checked(ty, out),
                _ => v.to_sql_checked(ty, out),
            },
            Value::Float(v) => match *ty {
                Type::FLOAT4 => (*v as f32).to_sql_checked(ty, out),
                Type::NUMERIC => Decimal::try_from(*v)?.to_sql_checked(ty, out),
                _ => v.to_sql_checked(ty, out),
            },
            Value::Text(v) => v.to_sql_checked(ty, out),
            Value::Bytes(v) => v.to_sql_checked(ty, out),
            Value::Json(v) => v.to_sql_checked(ty, out),
            Value::Timestamp(v) => match *ty {
                Type::TIMESTAMP => v.naive_utc().to_sql_checked(ty, out),
                _ => v.to_sql_checked(ty, out),
            },
            Value::Uuid(v) => v.to_sql_checked(ty, out),
            Value::List(_) => Err(format!("cannot bind a list as {ty}").into()),
        }
    }

    fn accepts(_ty: &Type) -> bool {
        true
    }

    tokio_postgres::types::to_sql_checked!();
}

// ==================== Decoding ====================

fn decode_row(row: &tokio_postgres::Row) -> QueryResult<Row> {
    let mut out = Row::new();
    for (idx, column) in row.columns().iter().enumerate() {
        let value = decode_value(row, idx, column.type_())
            .map_err(|message| QueryError::decode(column.name(), message))?;
        out.push(column.name(), value);
    }
    Ok(out)
}

fn decode_value(row: &tokio_postgres::Row, idx: usize, ty: &Type) -> Result<Value, String> {
    fn get<'a, T>(row: &'a tokio_postgres::Row, idx: usize) -> Result<Option<T>, String>
    where
        T: tokio_postgres::types::FromSql<'a>,
    {
        row.try_get::<_, Option<T>>(idx).map_err(|e| e.to_string())
    }

    let value = match *ty {
        Type::BOOL => get::<bool>(row, idx)?.map(Value::Bool),
        Type::INT2 => get::<i16>(row, idx)?.map(|v| Value::Int(i64::from(v))),
        Type::INT4 => get::<i32>(row, idx)?.map(|v| Value::Int(i64::from(v))),
        Type::INT8 => get::<i64>(row, idx)?.map(Value::Int),
        Type::FLOAT4 => get::<f32>(row, idx)?.map(|v| Value::Float(f64::from(v))),
        Type::FLOAT8 => get::<f64>(row, idx)?.map(Value::Float),
        Type::NUMERIC => get::<Decimal>(row, idx)?.map(numeric_value),
        Type::TEXT | Type::VARCHAR | Type::BPCHAR | Type::NAME | Type::UNKNOWN => {
            get::<String>(row, idx)?.map(Value::Text)
        }
        Type::BYTEA => get::<Vec<u8>>(row, idx)?.map(Value::Bytes),
        Type::JSON | Type::JSONB => get::<serde_json::Value>(row, idx)?.map(Value::Json),
        Type::TIMESTAMPTZ => get::<DateTime<Utc>>(row, idx)?.map(Value::Timestamp),
        Type::TIMESTAMP => get::<NaiveDateTime>(row, idx)?.map(|v| Value::Timestamp(v.and_utc())),
        Type::UUID => get::<Uuid>(row, idx)?.map(Value::Uuid),
        _ => return Err(format!("unsupported column type {ty}")),
    };
    Ok(value.unwrap_or(Value::Null))
}

/// Whole numbers that fit become `Int` (`SUM` over integers); anything else
/// becomes `Float` (`AVG`).
fn numeric_value(value: Decimal) -> Value {
    if value.fract().is_zero() {
        if let Some(v) = value.to_i64() {
            return Value::Int(v);
        }
    }
    match value.to_f64() {
        Some(v) => Value::Float(v),
        None => Value::Text(value.to_string()),
    }
}
