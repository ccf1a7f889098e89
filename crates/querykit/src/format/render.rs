use super::{Formatter, SqlWriter};
use crate::condition::ConditionBuilder;
use crate::error::{QueryError, QueryResult};
use crate::statement::{
    DeleteStatement, InsertStatement, JoinDefinition, JoinType, OrderBy, SelectStatement,
    Statement, StatementKind, UpdateStatement,
};

/// A statement model that can write itself through a [`SqlWriter`].
pub trait WriteSql {
    fn kind(&self) -> StatementKind;

    fn write_sql<F: Formatter + ?Sized>(&self, w: &mut SqlWriter<'_, F>) -> QueryResult<()>;
}

impl WriteSql for SelectStatement {
    fn kind(&self) -> StatementKind {
        StatementKind::Select
    }

    fn write_sql<F: Formatter + ?Sized>(&self, w: &mut SqlWriter<'_, F>) -> QueryResult<()> {
        require_table(&self.table, StatementKind::Select)?;

        w.push("SELECT ");
        if self.distinct {
            w.push("DISTINCT ");
        }
        match &self.columns {
            Some(columns) if !columns.is_empty() => write_list(w, columns),
            _ => {
                w.push("*");
            }
        }
        w.push(" FROM ");
        write_table(w, &self.table, self.alias.as_deref());

        for join in &self.joins {
            write_join(w, join)?;
        }
        write_where(w, &self.wheres)?;

        if !self.group_by.is_empty() {
            w.push(" GROUP BY ");
            write_list(w, &self.group_by);
        }
        if !self.havings.is_empty() {
            w.push(" HAVING ");
            write_chains(w, &self.havings)?;
        }

        write_order_by(w, &self.order_by);
        write_limit(w, self.limit);
        if let Some(offset) = self.offset {
            w.push(&format!(" OFFSET {offset}"));
        }
        if self.lock {
            let clause = w.formatter().lock_clause();
            w.push(" ").push(clause);
        }
        Ok(())
    }
}

impl WriteSql for InsertStatement {
    fn kind(&self) -> StatementKind {
        StatementKind::Insert
    }

    fn write_sql<F: Formatter + ?Sized>(&self, w: &mut SqlWriter<'_, F>) -> QueryResult<()> {
        require_table(&self.table, StatementKind::Insert)?;
        let Some(first) = self.dataset.first() else {
            return Err(QueryError::validation("INSERT requires at least one row"));
        };
        if first.is_empty() {
            return Err(QueryError::validation("INSERT requires at least one column"));
        }
        let columns: Vec<&str> = first.iter().map(|(c, _)| c.as_str()).collect();

        w.push("INSERT INTO ");
        w.push_column(&self.table);
        w.push(" (");
        write_list(w, &columns);
        w.push(") VALUES ");

        for (i, row) in self.dataset.iter().enumerate() {
            if row.len() != columns.len() {
                return Err(column_mismatch(i));
            }
            if i > 0 {
                w.push(", ");
            }
            w.push("(");
            for (j, column) in columns.iter().enumerate() {
                let Some((_, value)) = row.iter().find(|(c, _)| c == column) else {
                    return Err(column_mismatch(i));
                };
                if j > 0 {
                    w.push(", ");
                }
                w.push_bind(value.clone());
            }
            w.push(")");
        }

        write_returning(w, StatementKind::Insert, &self.returning)
    }
}

impl WriteSql for UpdateStatement {
    fn kind(&self) -> StatementKind {
        StatementKind::Update
    }

    fn write_sql<F: Formatter + ?Sized>(&self, w: &mut SqlWriter<'_, F>) -> QueryResult<()> {
        require_table(&self.table, StatementKind::Update)?;
        if self.assignments.is_empty() {
            return Err(QueryError::validation(
                "UPDATE requires at least one SET assignment",
            ));
        }

        w.push("UPDATE ");
        w.push_column(&self.table);
        w.push(" SET ");
        for (i, (column, value)) in self.assignments.iter().enumerate() {
            if i > 0 {
                w.push(", ");
            }
            w.push_column(column).push(" = ");
            w.push_bind(value.clone());
        }

        write_where(w, &self.wheres)?;
        write_ordered_mutation(w, StatementKind::Update, &self.order_by, self.limit)?;
        write_returning(w, StatementKind::Update, &self.returning)
    }
}

impl WriteSql for DeleteStatement {
    fn kind(&self) -> StatementKind {
        StatementKind::Delete
    }

    fn write_sql<F: Formatter + ?Sized>(&self, w: &mut SqlWriter<'_, F>) -> QueryResult<()> {
        require_table(&self.table, StatementKind::Delete)?;

        w.push("DELETE FROM ");
        w.push_column(&self.table);
        write_where(w, &self.wheres)?;
        write_ordered_mutation(w, StatementKind::Delete, &self.order_by, self.limit)?;
        write_returning(w, StatementKind::Delete, &self.returning)
    }
}

impl WriteSql for Statement {
    fn kind(&self) -> StatementKind {
        Statement::kind(self)
    }

    fn write_sql<F: Formatter + ?Sized>(&self, w: &mut SqlWriter<'_, F>) -> QueryResult<()> {
        match self {
            Statement::Select(s) => s.write_sql(w),
            Statement::Insert(s) => s.write_sql(w),
            Statement::Update(s) => s.write_sql(w),
            Statement::Delete(s) => s.write_sql(w),
        }
    }
}

// ==================== Clauses ====================

fn require_table(table: &str, kind: StatementKind) -> QueryResult<()> {
    if table.trim().is_empty() {
        return Err(QueryError::validation(format!("{kind} requires a table name")));
    }
    Ok(())
}

fn column_mismatch(row: usize) -> QueryError {
    QueryError::validation(format!(
        "INSERT row {row} does not match the column set of the first row"
    ))
}

fn write_list<F, S>(w: &mut SqlWriter<'_, F>, items: &[S])
where
    F: Formatter + ?Sized,
    S: AsRef<str>,
{
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            w.push(", ");
        }
        w.push_column(item.as_ref());
    }
}

fn write_table<F: Formatter + ?Sized>(w: &mut SqlWriter<'_, F>, table: &str, alias: Option<&str>) {
    w.push_column(table);
    if let Some(alias) = alias {
        w.push(" AS ").push_column(alias);
    }
}

fn write_join<F: Formatter + ?Sized>(
    w: &mut SqlWriter<'_, F>,
    join: &JoinDefinition,
) -> QueryResult<()> {
    require_table(&join.table, StatementKind::Select)?;
    w.push(" ").push(join.join_type.keyword()).push(" ");
    write_table(w, &join.table, join.alias.as_deref());

    match (join.join_type, join.on.is_empty()) {
        (JoinType::Cross, true) => Ok(()),
        (JoinType::Cross, false) => Err(QueryError::validation(format!(
            "CROSS JOIN {} takes no ON condition",
            join.table
        ))),
        (join_type, true) => Err(QueryError::validation(format!(
            "{} {} requires an ON condition",
            join_type.keyword(),
            join.table
        ))),
        (_, false) => {
            w.push(" ON ");
            for (i, (logic, cond)) in join.on.iter().enumerate() {
                if i > 0 {
                    w.push(" ").push(logic.keyword()).push(" ");
                }
                cond.write_sql(w)?;
            }
            Ok(())
        }
    }
}

fn write_chains<F: Formatter + ?Sized>(
    w: &mut SqlWriter<'_, F>,
    chains: &[ConditionBuilder],
) -> QueryResult<()> {
    for (i, chain) in chains.iter().enumerate() {
        if i > 0 {
            w.push(" AND ");
        }
        chain.write_sql(w)?;
    }
    Ok(())
}

fn write_where<F: Formatter + ?Sized>(
    w: &mut SqlWriter<'_, F>,
    wheres: &[ConditionBuilder],
) -> QueryResult<()> {
    if wheres.is_empty() {
        return Ok(());
    }
    w.push(" WHERE ");
    write_chains(w, wheres)
}

fn write_order_by<F: Formatter + ?Sized>(w: &mut SqlWriter<'_, F>, order_by: &OrderBy) {
    if order_by.is_empty() {
        return;
    }
    w.push(" ORDER BY ");
    for (i, (column, direction)) in order_by.iter().enumerate() {
        if i > 0 {
            w.push(", ");
        }
        w.push_column(column).push(" ").push(direction.keyword());
    }
}

fn write_limit<F: Formatter + ?Sized>(w: &mut SqlWriter<'_, F>, limit: Option<u64>) {
    if let Some(limit) = limit {
        w.push(&format!(" LIMIT {limit}"));
    }
}

fn write_ordered_mutation<F: Formatter + ?Sized>(
    w: &mut SqlWriter<'_, F>,
    kind: StatementKind,
    order_by: &OrderBy,
    limit: Option<u64>,
) -> QueryResult<()> {
    if order_by.is_empty() && limit.is_none() {
        return Ok(());
    }
    if !w.formatter().supports_ordered_mutations() {
        let operation = if order_by.is_empty() { "LIMIT" } else { "ORDER BY" };
        return Err(QueryError::unsupported(kind.as_str(), operation).traced());
    }
    write_order_by(w, order_by);
    write_limit(w, limit);
    Ok(())
}

fn write_returning<F: Formatter + ?Sized>(
    w: &mut SqlWriter<'_, F>,
    kind: StatementKind,
    returning: &[String],
) -> QueryResult<()> {
    if returning.is_empty() {
        return Ok(());
    }
    if !w.formatter().supports_returning() {
        return Err(QueryError::unsupported(kind.as_str(), "RETURNING").traced());
    }
    w.push(" RETURNING ");
    write_list(w, returning);
    Ok(())
}
