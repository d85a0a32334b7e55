use super::self_prelude::*;
use store::{Row, SchemaNodeId, ValueNode, ValueStore};

/// A row handed to the `{Type}Node` resolvers, with its document loaded
/// into a value store.
#[derive(Clone, Debug)]
pub struct DynNode {
    pub table_id: String,
    pub row: Row,
    root: SchemaNodeId,
    index: usize,
    values: Arc<ValueStore>,
}

impl DynNode {
    pub fn new(
        table_id: impl Into<String>,
        row: Row,
        data: &ValueNode,
        values: Arc<ValueStore>,
    ) -> Self {
        Self {
            table_id: table_id.into(),
            row,
            root: data.schema_node,
            index: data.index,
            values,
        }
    }

    pub fn id(&self) -> &str {
        &self.row.id
    }

    /// Root value of the row document.
    pub fn data(&self) -> Option<Arc<ValueNode>> {
        self.values.get_value_at(self.root, &self.row.id, self.index)
    }

    pub fn values(&self) -> &ValueStore {
        &self.values
    }
}
