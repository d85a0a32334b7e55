use super::self_prelude::*;
use std::cmp::Ordering;

/// A [`RowSource`] over rows held in memory. Cursors are row ids.
#[derive(Clone, Debug, Default)]
pub struct MemoryRowSource {
    tables: IndexMap<String, Vec<Row>>,
}

impl MemoryRowSource {
    pub fn new(tables: IndexMap<String, Vec<Row>>) -> Self {
        Self { tables }
    }

    pub fn with_rows(mut self, table_id: impl Into<String>, rows: Vec<Row>) -> Self {
        self.tables.insert(table_id.into(), rows);
        self
    }

    fn rows(&self, table_id: &str) -> RowSourceResult<&[Row]> {
        self.tables
            .get(table_id)
            .map(Vec::as_slice)
            .ok_or_else(|| RowSourceError::UnknownTable(table_id.to_string()))
    }
}

fn compare(a: &Row, b: &Row, order_by: &[RowOrderBy]) -> Ordering {
    order_by
        .iter()
        .map(|order| {
            let ordering = order.field.value(a).cmp(order.field.value(b));
            match order.direction {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        })
        .find(|ordering| ordering.is_ne())
        .unwrap_or(Ordering::Equal)
}

#[async_trait]
impl RowSource for MemoryRowSource {
    async fn list_rows(&self, table_id: &str, query: RowQuery) -> RowSourceResult<RowPage> {
        let mut rows: Vec<&Row> = self
            .rows(table_id)?
            .iter()
            .filter(|row| query.ids.as_ref().map_or(true, |ids| ids.contains(&row.id)))
            .filter(|row| query.where_.as_ref().map_or(true, |filter| filter.matches(row)))
            .collect();
        rows.sort_by(|a, b| compare(a, b, &query.order_by));

        let start = match &query.after {
            Some(cursor) => rows
                .iter()
                .position(|row| &row.id == cursor)
                .map(|position| position + 1)
                .ok_or_else(|| RowSourceError::InvalidCursor(cursor.clone()))?,
            None => 0,
        };
        let count = query.first.map_or(rows.len(), |first| first as usize);
        let edges: Vec<RowEdge> = rows
            .iter()
            .skip(start)
            .take(count)
            .map(|row| RowEdge {
                cursor: row.id.clone(),
                row: (*row).clone(),
            })
            .collect();

        let page_info = PageInfo {
            start_cursor: edges.first().map(|edge| edge.cursor.clone()),
            end_cursor: edges.last().map(|edge| edge.cursor.clone()),
            has_next_page: start + edges.len() < rows.len(),
            has_previous_page: start > 0,
        };
        Ok(RowPage {
            total_count: rows.len() as u64,
            edges,
            page_info,
        })
    }

    async fn get_row(&self, table_id: &str, row_id: &str) -> RowSourceResult<Option<Row>> {
        Ok(self.rows(table_id)?.iter().find(|row| row.id == row_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::super::tables::*;
    use super::*;
    use assert_matches::assert_matches;

    #[tokio::test]
    async fn test_list_rows_pages_by_cursor() {
        let source = MemoryRowSource::new(blog_rows());
        let query = RowQuery {
            first: Some(2),
            order_by: vec![RowOrderBy {
                field: RowOrderField::Id,
                direction: SortOrder::Desc,
            }],
            ..Default::default()
        };

        let page = source.list_rows("user", query.clone()).await.unwrap();
        let ids: Vec<_> = page.edges.iter().map(|edge| edge.row.id.as_str()).collect();
        assert_eq!(ids, vec!["u3", "u2"]);
        assert_eq!(page.total_count, 3);
        assert!(page.page_info.has_next_page);
        assert!(!page.page_info.has_previous_page);

        let query = RowQuery {
            after: page.page_info.end_cursor,
            ..query
        };
        let page = source.list_rows("user", query).await.unwrap();
        let ids: Vec<_> = page.edges.iter().map(|edge| edge.row.id.as_str()).collect();
        assert_eq!(ids, vec!["u1"]);
        assert!(!page.page_info.has_next_page);
        assert!(page.page_info.has_previous_page);
    }

    #[tokio::test]
    async fn test_list_rows_rejects_unknown_input() {
        let source = MemoryRowSource::new(blog_rows());
        assert_matches!(
            source.list_rows("nope", RowQuery::default()).await,
            Err(RowSourceError::UnknownTable(table)) if table == "nope"
        );
        let query = RowQuery {
            after: Some("gone".to_string()),
            ..Default::default()
        };
        assert_matches!(
            source.list_rows("user", query).await,
            Err(RowSourceError::InvalidCursor(_))
        );
    }
}
