//! Offset and cursor pagination on top of [`SelectBuilder`].

use super::{Count, SelectBuilder};
use crate::condition::Operator;
use crate::connection::Connection;
use crate::error::{QueryError, QueryResult};
use crate::row::{FromRow, Row};
use crate::statement::SortDirection;
use crate::value::Value;

/// One page of an offset-paginated query.
#[derive(Debug, Clone, PartialEq)]
pub struct OffsetPage<T = Row> {
    pub items: Vec<T>,
    /// Matching rows across all pages; groups for a grouped query.
    pub total: u64,
    pub per_page: u64,
    /// Zero-based page index.
    pub page: u64,
}

impl<T> OffsetPage<T> {
    /// Index of the last page (zero-based); 0 when nothing matched.
    pub fn last_page(&self) -> u64 {
        if self.total == 0 || self.per_page == 0 {
            0
        } else {
            (self.total - 1) / self.per_page
        }
    }

    pub fn has_next(&self) -> bool {
        self.page < self.last_page()
    }

    /// Map the items, keeping the page metadata.
    pub fn try_map<U, F>(self, f: F) -> QueryResult<OffsetPage<U>>
    where
        F: FnMut(T) -> QueryResult<U>,
    {
        Ok(OffsetPage {
            items: self.items.into_iter().map(f).collect::<QueryResult<_>>()?,
            total: self.total,
            per_page: self.per_page,
            page: self.page,
        })
    }
}

impl OffsetPage<Row> {
    pub fn decode<T: FromRow>(self) -> QueryResult<OffsetPage<T>> {
        self.try_map(|row| T::from_row(&row))
    }
}

/// One page of a cursor-paginated query.
#[derive(Debug, Clone, PartialEq)]
pub struct CursorPage<T = Row> {
    pub items: Vec<T>,
    /// Order-column value of the last item; pass it back to fetch the next page.
    pub next_cursor: Option<Value>,
    /// Whether rows exist beyond this page.
    pub has_more: bool,
}

impl<T> CursorPage<T> {
    pub fn try_map<U, F>(self, f: F) -> QueryResult<CursorPage<U>>
    where
        F: FnMut(T) -> QueryResult<U>,
    {
        Ok(CursorPage {
            items: self.items.into_iter().map(f).collect::<QueryResult<_>>()?,
            next_cursor: self.next_cursor,
            has_more: self.has_more,
        })
    }
}

impl CursorPage<Row> {
    pub fn decode<T: FromRow>(self) -> QueryResult<CursorPage<T>> {
        self.try_map(|row| T::from_row(&row))
    }
}

impl SelectBuilder {
    /// Fetch page `page` (zero-based) of `per_page` rows plus the total count.
    ///
    /// `per_page` goes through [`QueryConfig::clamp_per_page`](crate::QueryConfig::clamp_per_page):
    /// 0 selects the configured default and the configured maximum caps it.
    pub fn offset_paginate(
        &self,
        conn: &impl Connection,
        per_page: u64,
        page: u64,
    ) -> QueryResult<OffsetPage> {
        let per_page = conn.config().clamp_per_page(per_page);
        let offset = per_page.saturating_mul(page);

        let mut query = self.copy();
        let st = query.statement_mut();
        st.limit = Some(per_page);
        st.offset = Some(offset);

        let items = query.all(conn)?;
        let total = match self.count(conn)? {
            Count::Total(n) => n,
            Count::Grouped(groups) => groups.len() as u64,
        };

        tracing::trace!(
            target: "querykit",
            table = %self.statement().table,
            page,
            per_page,
            total,
            "offset page fetched"
        );

        Ok(OffsetPage {
            items,
            total,
            per_page,
            page,
        })
    }

    /// Fetch up to `per_page` rows after `cursor` in the first ORDER BY
    /// column's direction.
    ///
    /// Ascending order continues with `column > cursor`, descending with
    /// `column < cursor`. One extra row is fetched to detect a next page.
    pub fn cursor_paginate(
        &self,
        conn: &impl Connection,
        per_page: u64,
        cursor: Option<Value>,
    ) -> QueryResult<CursorPage> {
        let (column, direction) = self
            .statement()
            .order_by
            .first()
            .map(|(column, direction)| (column.to_string(), direction))
            .ok_or_else(|| QueryError::CursorPaginationRequiresOrder.traced())?;
        let per_page = conn.config().clamp_per_page(per_page);

        let mut query = self.copy();
        if let Some(cursor) = cursor {
            let operator = match direction {
                SortDirection::Asc => Operator::Gt,
                SortDirection::Desc => Operator::Lt,
            };
            query.push_cursor_condition(&column, operator, cursor);
        }
        let st = query.statement_mut();
        st.limit = Some(per_page.saturating_add(1));
        st.offset = None;

        let mut items = query.all(conn)?;
        let limit = usize::try_from(per_page).unwrap_or(usize::MAX);
        let has_more = items.len() > limit;
        items.truncate(limit);

        let next_cursor = items.last().and_then(|row| row.get(&column).cloned());

        tracing::trace!(
            target: "querykit",
            table = %self.statement().table,
            column = %column,
            rows = items.len(),
            has_more,
            "cursor page fetched"
        );

        Ok(CursorPage {
            items,
            next_cursor,
            has_more,
        })
    }
}
