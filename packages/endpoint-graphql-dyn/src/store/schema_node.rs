use super::self_prelude::*;

/// Index of a node in a [`SchemaStore`](super::SchemaStore) arena.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct SchemaNodeId(pub usize);

impl fmt::Display for SchemaNodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum SchemaNodeKind {
    Object {
        required: Vec<String>,
        properties: IndexMap<String, SchemaNodeId>,
    },
    Array {
        items: SchemaNodeId,
    },
    String {
        default: String,
        foreign_key: Option<String>,
        read_only: bool,
    },
    Number {
        default: f64,
        read_only: bool,
    },
    Boolean {
        default: bool,
        read_only: bool,
    },
    /// Shape lives in the registry under `reference`.
    Ref {
        reference: String,
    },
}

/// One node of a parsed table schema.
///
/// `parent` is a plain index and never keeps anything alive; the arena owns
/// every node.
#[derive(Clone, Debug, PartialEq)]
pub struct SchemaNode {
    pub id: SchemaNodeId,
    /// Property name, empty for roots and array items.
    pub name: String,
    pub parent: Option<SchemaNodeId>,
    pub kind: SchemaNodeKind,
}

impl SchemaNode {
    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            SchemaNodeKind::Object { .. } => "object",
            SchemaNodeKind::Array { .. } => "array",
            SchemaNodeKind::String { .. } => "string",
            SchemaNodeKind::Number { .. } => "number",
            SchemaNodeKind::Boolean { .. } => "boolean",
            SchemaNodeKind::Ref { .. } => "$ref",
        }
    }

    pub fn reference(&self) -> Option<&str> {
        match &self.kind {
            SchemaNodeKind::Ref { reference } => Some(reference),
            _ => None,
        }
    }

    pub fn foreign_key(&self) -> Option<&str> {
        match &self.kind {
            SchemaNodeKind::String { foreign_key, .. } => foreign_key.as_deref(),
            _ => None,
        }
    }

    pub fn properties(&self) -> Option<&IndexMap<String, SchemaNodeId>> {
        match &self.kind {
            SchemaNodeKind::Object { properties, .. } => Some(properties),
            _ => None,
        }
    }

    pub fn items(&self) -> Option<SchemaNodeId> {
        match &self.kind {
            SchemaNodeKind::Array { items } => Some(*items),
            _ => None,
        }
    }

    pub fn is_ref(&self) -> bool {
        matches!(self.kind, SchemaNodeKind::Ref { .. })
    }

    /// Default value as JSON; `None` for composites and refs.
    pub fn default_value(&self) -> Option<serde_json::Value> {
        match &self.kind {
            SchemaNodeKind::String { default, .. } => Some(default.clone().into()),
            SchemaNodeKind::Number { default, .. } => Some((*default).into()),
            SchemaNodeKind::Boolean { default, .. } => Some((*default).into()),
            _ => None,
        }
    }
}
