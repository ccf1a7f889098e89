//! Statement model: what a builder has collected, independent of dialect.
//!
//! Builders own one of these structs and mutate it; a [`Formatter`] turns it
//! into SQL text and bindings.
//!
//! [`Formatter`]: crate::format::Formatter

use crate::condition::{ConditionBuilder, Logic};
use crate::error::{QueryError, QueryResult};
use crate::value::{Bindings, Value};
use std::fmt;

/// Sort direction for ORDER BY.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Parse `ASC` / `DESC`, case-insensitively.
    pub fn parse(direction: &str) -> QueryResult<Self> {
        match direction.trim().to_ascii_uppercase().as_str() {
            "ASC" => Ok(SortDirection::Asc),
            "DESC" => Ok(SortDirection::Desc),
            _ => Err(QueryError::InvalidSortDirection(direction.to_string()).traced()),
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// Ordered mapping column -> direction.
///
/// Ordering by a column that is already present replaces its direction and
/// keeps its position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderBy {
    items: Vec<(String, SortDirection)>,
}

impl OrderBy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, column: impl Into<String>, direction: SortDirection) {
        let column = column.into();
        match self.items.iter_mut().find(|(c, _)| *c == column) {
            Some(slot) => slot.1 = direction,
            None => self.items.push((column, direction)),
        }
    }

    pub fn first(&self) -> Option<(&str, SortDirection)> {
        self.items.first().map(|(c, d)| (c.as_str(), *d))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, SortDirection)> {
        self.items.iter().map(|(c, d)| (c.as_str(), *d))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

/// JOIN flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoinType {
    Inner,
    Left,
    Right,
    Full,
    Cross,
}

impl JoinType {
    pub fn keyword(self) -> &'static str {
        match self {
            JoinType::Inner => "INNER JOIN",
            JoinType::Left => "LEFT JOIN",
            JoinType::Right => "RIGHT JOIN",
            JoinType::Full => "FULL OUTER JOIN",
            JoinType::Cross => "CROSS JOIN",
        }
    }
}

/// One JOIN clause.
///
/// `on` holds the ON conditions in order; each entry's [`Logic`] joins it to
/// the entry before it and is ignored for the first one.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinDefinition {
    pub join_type: JoinType,
    pub table: String,
    pub alias: Option<String>,
    pub on: Vec<(Logic, ConditionBuilder)>,
}

impl JoinDefinition {
    pub fn new(join_type: JoinType, table: impl Into<String>) -> Self {
        Self {
            join_type,
            table: table.into(),
            alias: None,
            on: Vec::new(),
        }
    }

    fn collect_bindings(&self, out: &mut Bindings) {
        for (_, cond) in &self.on {
            out.extend(cond.bindings());
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectStatement {
    pub table: String,
    pub alias: Option<String>,
    /// `None` selects `*`.
    pub columns: Option<Vec<String>>,
    pub distinct: bool,
    /// Append the dialect's row lock clause.
    pub lock: bool,
    pub joins: Vec<JoinDefinition>,
    pub wheres: Vec<ConditionBuilder>,
    pub group_by: Vec<String>,
    pub havings: Vec<ConditionBuilder>,
    pub order_by: OrderBy,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl SelectStatement {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            alias: None,
            columns: None,
            distinct: false,
            lock: false,
            joins: Vec::new(),
            wheres: Vec::new(),
            group_by: Vec::new(),
            havings: Vec::new(),
            order_by: OrderBy::new(),
            limit: None,
            offset: None,
        }
    }

    /// Bindings in emission order: JOIN ... ON, WHERE, HAVING.
    pub fn bindings(&self) -> Bindings {
        let mut out = Bindings::new();
        for join in &self.joins {
            join.collect_bindings(&mut out);
        }
        collect_chains(&self.wheres, &mut out);
        collect_chains(&self.havings, &mut out);
        out
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InsertStatement {
    pub table: String,
    /// Rows of column -> value; every row must carry the same column set.
    pub dataset: Vec<Vec<(String, Value)>>,
    pub returning: Vec<String>,
}

impl InsertStatement {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            dataset: Vec::new(),
            returning: Vec::new(),
        }
    }

    /// Row values in row-major order.
    pub fn bindings(&self) -> Bindings {
        self.dataset
            .iter()
            .flat_map(|row| row.iter().map(|(_, v)| v.clone()))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateStatement {
    pub table: String,
    pub assignments: Vec<(String, Value)>,
    pub wheres: Vec<ConditionBuilder>,
    pub order_by: OrderBy,
    pub limit: Option<u64>,
    pub returning: Vec<String>,
}

impl UpdateStatement {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            assignments: Vec::new(),
            wheres: Vec::new(),
            order_by: OrderBy::new(),
            limit: None,
            returning: Vec::new(),
        }
    }

    /// SET values first, then WHERE values.
    pub fn bindings(&self) -> Bindings {
        let mut out: Bindings = self.assignments.iter().map(|(_, v)| v.clone()).collect();
        collect_chains(&self.wheres, &mut out);
        out
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeleteStatement {
    pub table: String,
    pub wheres: Vec<ConditionBuilder>,
    pub order_by: OrderBy,
    pub limit: Option<u64>,
    pub returning: Vec<String>,
}

impl DeleteStatement {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            wheres: Vec::new(),
            order_by: OrderBy::new(),
            limit: None,
            returning: Vec::new(),
        }
    }

    pub fn bindings(&self) -> Bindings {
        let mut out = Bindings::new();
        collect_chains(&self.wheres, &mut out);
        out
    }
}

fn collect_chains(chains: &[ConditionBuilder], out: &mut Bindings) {
    for chain in chains {
        out.extend(chain.bindings());
    }
}

/// Statement kind, used for logging and error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementKind {
    Select,
    Insert,
    Update,
    Delete,
}

impl StatementKind {
    pub fn as_str(self) -> &'static str {
        match self {
            StatementKind::Select => "SELECT",
            StatementKind::Insert => "INSERT",
            StatementKind::Update => "UPDATE",
            StatementKind::Delete => "DELETE",
        }
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Any of the four statement models.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Select(SelectStatement),
    Insert(InsertStatement),
    Update(UpdateStatement),
    Delete(DeleteStatement),
}

impl Statement {
    pub fn kind(&self) -> StatementKind {
        match self {
            Statement::Select(_) => StatementKind::Select,
            Statement::Insert(_) => StatementKind::Insert,
            Statement::Update(_) => StatementKind::Update,
            Statement::Delete(_) => StatementKind::Delete,
        }
    }

    pub fn table(&self) -> &str {
        match self {
            Statement::Select(s) => &s.table,
            Statement::Insert(s) => &s.table,
            Statement::Update(s) => &s.table,
            Statement::Delete(s) => &s.table,
        }
    }

    /// ORDER BY of the statement; INSERT has none.
    pub fn order_by_mut(&mut self) -> QueryResult<&mut OrderBy> {
        match self {
            Statement::Select(s) => Ok(&mut s.order_by),
            Statement::Update(s) => Ok(&mut s.order_by),
            Statement::Delete(s) => Ok(&mut s.order_by),
            Statement::Insert(_) => Err(QueryError::unsupported("INSERT", "ORDER BY").traced()),
        }
    }

    /// WHERE chains of the statement; INSERT has none.
    pub fn wheres_mut(&mut self) -> QueryResult<&mut Vec<ConditionBuilder>> {
        match self {
            Statement::Select(s) => Ok(&mut s.wheres),
            Statement::Update(s) => Ok(&mut s.wheres),
            Statement::Delete(s) => Ok(&mut s.wheres),
            Statement::Insert(_) => Err(QueryError::unsupported("INSERT", "WHERE").traced()),
        }
    }

    pub fn bindings(&self) -> Bindings {
        match self {
            Statement::Select(s) => s.bindings(),
            Statement::Insert(s) => s.bindings(),
            Statement::Update(s) => s.bindings(),
            Statement::Delete(s) => s.bindings(),
        }
    }
}

impl From<SelectStatement> for Statement {
    fn from(s: SelectStatement) -> Self {
        Statement::Select(s)
    }
}

impl From<InsertStatement> for Statement {
    fn from(s: InsertStatement) -> Self {
        Statement::Insert(s)
    }
}

impl From<UpdateStatement> for Statement {
    fn from(s: UpdateStatement) -> Self {
        Statement::Update(s)
    }
}

impl From<DeleteStatement> for Statement {
    fn from(s: DeleteStatement) -> Self {
        Statement::Delete(s)
    }
}
