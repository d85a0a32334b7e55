use super::node::*;
use super::paging::*;
use super::self_prelude::*;

#[derive(Clone, Debug)]
pub struct DynConnectionEdge {
    pub cursor: Cursor,
    pub node: DynNode,
}

#[derive(Clone, Debug)]
pub struct DynConnection {
    pub total_count: u64,
    pub edges: Vec<DynConnectionEdge>,
    pub page_info: DynPageInfo,
}

impl DynConnectionEdge {
    pub fn node(&self) -> &DynNode {
        &self.node
    }
    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }
}

impl DynConnection {
    pub fn nodes(&self) -> impl Iterator<Item = &DynNode> {
        self.edges.iter().map(DynConnectionEdge::node)
    }
}
