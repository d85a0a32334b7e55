use super::connection::*;
use super::node::*;
use super::schema_type::*;
use super::self_prelude::*;
use store::{RowQuery, RowSource, SchemaNodeId, SchemaStore, ValueStore};

/// Fetches rows through the injected [`RowSource`] and loads their documents
/// against the schema tree of their table.
pub struct DynLoader {
    source: Arc<dyn RowSource>,
    store: Arc<SchemaStore>,
    roots: HashMap<String, SchemaNodeId>,
}

pub type DynLoaderResult<T> = Result<T, DynLoaderError>;

#[derive(thiserror::Error, Debug)]
pub enum DynLoaderError {
    #[error("Table {0:?} is not part of the schema")]
    UnknownTable(String),
    #[error(transparent)]
    Source(#[from] store::RowSourceError),
    #[error(transparent)]
    Store(#[from] store::StoreError),
}

impl DynLoader {
    pub fn new(schema_type: &DynSchemaType, source: Arc<dyn RowSource>) -> Self {
        let roots = schema_type
            .tables
            .values()
            .map(|table| (table.id.clone(), table.options.root))
            .collect();
        Self {
            source,
            store: schema_type.store.clone(),
            roots,
        }
    }

    fn root(&self, table_id: &str) -> DynLoaderResult<SchemaNodeId> {
        self.roots
            .get(table_id)
            .copied()
            .ok_or_else(|| DynLoaderError::UnknownTable(table_id.to_string()))
    }

    /// One page of rows. Every row of the page shares one value store.
    pub async fn load_page(
        &self,
        table_id: &str,
        query: RowQuery,
    ) -> DynLoaderResult<DynConnection> {
        let root = self.root(table_id)?;
        let page = self.source.list_rows(table_id, query).await?;
        trace!(
            "Loaded {} of {} rows from {table_id:?}",
            page.edges.len(),
            page.total_count
        );

        let mut values = ValueStore::new();
        let mut data = Vec::with_capacity(page.edges.len());
        for edge in &page.edges {
            data.push(values.load(&self.store, root, &edge.row.id, &edge.row.data)?);
        }
        let values = Arc::new(values);

        let edges = page
            .edges
            .into_iter()
            .zip(data)
            .map(|(edge, data)| DynConnectionEdge {
                cursor: edge.cursor,
                node: DynNode::new(table_id, edge.row, &data, values.clone()),
            })
            .collect();
        Ok(DynConnection {
            total_count: page.total_count,
            edges,
            page_info: page.page_info,
        })
    }

    pub async fn load_node(
        &self,
        table_id: &str,
        row_id: &str,
    ) -> DynLoaderResult<Option<DynNode>> {
        let root = self.root(table_id)?;
        let Some(row) = self.source.get_row(table_id, row_id).await? else {
            return Ok(None);
        };

        let mut values = ValueStore::new();
        let data = values.load(&self.store, root, &row.id, &row.data)?;
        Ok(Some(DynNode::new(table_id, row, &data, Arc::new(values))))
    }
}
