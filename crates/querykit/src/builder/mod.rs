//! Fluent statement builders.
//!
//! Each builder owns one statement model and renders it through a
//! [`Formatter`](crate::format::Formatter), so the same builder yields
//! `?` placeholders for the generic dialect and `$1, $2, ...` for Postgres.
//!
//! ## Design
//!
//! - Builder methods take `self` and return it (or `QueryResult<Self>` when
//!   the call can be rejected), so misuse surfaces at the call site.
//! - Values never reach the SQL text; they are bound in the same walk that
//!   emits their placeholders.
//! - Execution methods borrow the builder and work on a copy, so `one()`,
//!   `exists()`, `count()` and pagination never alter the caller's query.

pub mod conditions;
pub mod delete;
pub mod insert;
pub mod join;
pub mod pagination;
pub mod predicate;
pub mod select;
pub mod update;

pub use conditions::ConditionsBuilder;
pub use delete::DeleteBuilder;
pub use insert::InsertBuilder;
pub use join::JoinBuilder;
pub use pagination::{CursorPage, OffsetPage};
pub use predicate::Predicate;
pub use select::{Count, SelectBuilder};
pub use update::UpdateBuilder;

/// Start a SELECT on `table`.
pub fn select(table: impl Into<String>) -> SelectBuilder {
    SelectBuilder::new(table)
}

/// Start an INSERT into `table`.
pub fn insert(table: impl Into<String>) -> InsertBuilder {
    InsertBuilder::new(table)
}

/// Start an UPDATE of `table`.
pub fn update(table: impl Into<String>) -> UpdateBuilder {
    UpdateBuilder::new(table)
}

/// Start a DELETE from `table`.
pub fn delete(table: impl Into<String>) -> DeleteBuilder {
    DeleteBuilder::new(table)
}

#[cfg(test)]
mod tests;
