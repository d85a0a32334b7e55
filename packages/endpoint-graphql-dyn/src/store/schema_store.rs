use super::plain::*;
use super::refs::*;
use super::schema_node::*;
use super::self_prelude::*;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("Unregistered $ref {reference:?} at {path}")]
    Resolution { reference: String, path: String },
    #[error("$ref cycle through {reference:?} at {path}")]
    RefCycle { reference: String, path: String },
    #[error("Unknown schema node {0}")]
    UnknownNode(SchemaNodeId),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Arena holding every parsed schema tree of one build.
///
/// Registered `$ref` targets are parsed once, on first use, into a shared
/// subtree. Ref nodes keep only the id and are followed through [`resolve`].
///
/// [`resolve`]: SchemaStore::resolve
#[derive(Clone, Debug, Default)]
pub struct SchemaStore {
    nodes: Vec<SchemaNode>,
    refs: RefRegistry,
    ref_roots: IndexMap<String, SchemaNodeId>,
    root_refs: HashMap<SchemaNodeId, String>,
    pending: HashSet<String>,
}

impl SchemaStore {
    pub fn new(refs: RefRegistry) -> Self {
        Self {
            refs,
            ..Default::default()
        }
    }

    pub fn refs(&self) -> &RefRegistry {
        &self.refs
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn node(&self, id: SchemaNodeId) -> StoreResult<&SchemaNode> {
        self.nodes.get(id.0).ok_or(StoreError::UnknownNode(id))
    }

    /// Root of the shared subtree parsed for `reference`, if it was reached.
    pub fn ref_root(&self, reference: &str) -> Option<SchemaNodeId> {
        self.ref_roots.get(reference).copied()
    }

    /// Parse a plain schema into a new tree and return its root.
    pub fn parse(&mut self, schema: &PlainSchema) -> StoreResult<SchemaNodeId> {
        self.parse_node(schema, String::new(), None)
    }

    fn push(
        &mut self,
        name: String,
        parent: Option<SchemaNodeId>,
        kind: SchemaNodeKind,
    ) -> SchemaNodeId {
        let id = SchemaNodeId(self.nodes.len());
        self.nodes.push(SchemaNode {
            id,
            name,
            parent,
            kind,
        });
        id
    }

    fn parse_node(
        &mut self,
        schema: &PlainSchema,
        name: String,
        parent: Option<SchemaNodeId>,
    ) -> StoreResult<SchemaNodeId> {
        let typed = match schema {
            PlainSchema::Ref(PlainRefSchema { reference }) => {
                let id = self.push(
                    name,
                    parent,
                    SchemaNodeKind::Ref {
                        reference: reference.clone(),
                    },
                );
                self.load_ref(reference, id)?;
                return Ok(id);
            }
            PlainSchema::Typed(typed) => typed,
        };

        match typed {
            PlainTypedSchema::Object {
                required,
                properties,
            } => {
                let id = self.push(
                    name,
                    parent,
                    SchemaNodeKind::Object {
                        required: required.clone(),
                        properties: IndexMap::new(),
                    },
                );
                let mut children = IndexMap::with_capacity(properties.len());
                for (key, property) in properties {
                    let child = self.parse_node(property, key.clone(), Some(id))?;
                    children.insert(key.clone(), child);
                }
                if let SchemaNodeKind::Object { properties, .. } = &mut self.nodes[id.0].kind
                {
                    *properties = children;
                }
                Ok(id)
            }
            PlainTypedSchema::Array { items } => {
                // Items need the array's id as parent, patch the link afterwards.
                let id = self.push(
                    name,
                    parent,
                    SchemaNodeKind::Array {
                        items: SchemaNodeId(self.nodes.len()),
                    },
                );
                let child = self.parse_node(items, String::new(), Some(id))?;
                self.nodes[id.0].kind = SchemaNodeKind::Array { items: child };
                Ok(id)
            }
            PlainTypedSchema::String {
                default,
                foreign_key,
                read_only,
            } => Ok(self.push(
                name,
                parent,
                SchemaNodeKind::String {
                    default: default.clone(),
                    foreign_key: foreign_key.clone(),
                    read_only: *read_only,
                },
            )),
            PlainTypedSchema::Number { default, read_only } => Ok(self.push(
                name,
                parent,
                SchemaNodeKind::Number {
                    default: *default,
                    read_only: *read_only,
                },
            )),
            PlainTypedSchema::Boolean { default, read_only } => Ok(self.push(
                name,
                parent,
                SchemaNodeKind::Boolean {
                    default: *default,
                    read_only: *read_only,
                },
            )),
        }
    }

    fn load_ref(&mut self, reference: &str, at: SchemaNodeId) -> StoreResult<()> {
        if self.ref_roots.contains_key(reference) || self.pending.contains(reference) {
            return Ok(());
        }
        let schema = match self.refs.get(reference) {
            Some(entry) => entry.schema.clone(),
            None => {
                return Err(StoreError::Resolution {
                    reference: reference.to_string(),
                    path: self.path(at),
                })
            }
        };

        self.pending.insert(reference.to_string());
        let root = self.parse_node(&schema, String::new(), None);
        self.pending.remove(reference);
        let root = root?;

        self.ref_roots.insert(reference.to_string(), root);
        self.root_refs.insert(root, reference.to_string());
        Ok(())
    }

    /// Follow `$ref` links until a node with a shape of its own is reached.
    pub fn resolve(&self, id: SchemaNodeId) -> StoreResult<&SchemaNode> {
        let mut node = self.node(id)?;
        let mut seen = HashSet::new();
        while let SchemaNodeKind::Ref { reference } = &node.kind {
            if !seen.insert(reference.as_str()) {
                return Err(StoreError::RefCycle {
                    reference: reference.clone(),
                    path: self.path(id),
                });
            }
            let root = self.ref_root(reference).ok_or_else(|| StoreError::Resolution {
                reference: reference.clone(),
                path: self.path(node.id),
            })?;
            node = self.node(root)?;
        }
        Ok(node)
    }

    /// JSON-pointer-like location of a node, prefixed with the ref id when
    /// the node lives in a shared subtree.
    pub fn path(&self, id: SchemaNodeId) -> String {
        let mut segments = Vec::new();
        let mut current = self.nodes.get(id.0);
        let mut root = None;

        while let Some(node) = current {
            match node.parent.and_then(|parent| self.nodes.get(parent.0)) {
                Some(parent) => {
                    match parent.kind {
                        SchemaNodeKind::Array { .. } => segments.push("items"),
                        _ => {
                            segments.push(node.name.as_str());
                            segments.push("properties");
                        }
                    }
                    current = Some(parent);
                }
                None => {
                    root = Some(node.id);
                    current = None;
                }
            }
        }

        segments.reverse();
        let pointer = format!("/{}", segments.join("/"));
        match root.and_then(|root| self.root_refs.get(&root)) {
            Some(reference) => format!("{reference}#{pointer}"),
            None => pointer,
        }
    }

    /// Serialize a tree back to its plain form. With `skip_ref`, referenced
    /// shapes are inlined; self-referential ones cannot be and fail.
    pub fn to_plain(&self, id: SchemaNodeId, skip_ref: bool) -> StoreResult<PlainSchema> {
        self.to_plain_inner(id, skip_ref, &mut Vec::new())
    }

    fn to_plain_inner(
        &self,
        id: SchemaNodeId,
        skip_ref: bool,
        stack: &mut Vec<String>,
    ) -> StoreResult<PlainSchema> {
        let node = self.node(id)?;
        let plain = match &node.kind {
            SchemaNodeKind::Ref { reference } => {
                if !skip_ref {
                    return Ok(PlainSchema::reference(reference.clone()));
                }
                if stack.contains(reference) {
                    return Err(StoreError::RefCycle {
                        reference: reference.clone(),
                        path: self.path(id),
                    });
                }
                let root = self.ref_root(reference).ok_or_else(|| StoreError::Resolution {
                    reference: reference.clone(),
                    path: self.path(id),
                })?;
                stack.push(reference.clone());
                let plain = self.to_plain_inner(root, skip_ref, stack);
                stack.pop();
                return plain;
            }
            SchemaNodeKind::Object {
                required,
                properties,
            } => {
                let mut plain = IndexMap::with_capacity(properties.len());
                for (key, child) in properties {
                    plain.insert(key.clone(), self.to_plain_inner(*child, skip_ref, stack)?);
                }
                PlainTypedSchema::Object {
                    required: required.clone(),
                    properties: plain,
                }
            }
            SchemaNodeKind::Array { items } => PlainTypedSchema::Array {
                items: Box::new(self.to_plain_inner(*items, skip_ref, stack)?),
            },
            SchemaNodeKind::String {
                default,
                foreign_key,
                read_only,
            } => PlainTypedSchema::String {
                default: default.clone(),
                foreign_key: foreign_key.clone(),
                read_only: *read_only,
            },
            SchemaNodeKind::Number { default, read_only } => PlainTypedSchema::Number {
                default: *default,
                read_only: *read_only,
            },
            SchemaNodeKind::Boolean { default, read_only } => PlainTypedSchema::Boolean {
                default: *default,
                read_only: *read_only,
            },
        };
        Ok(PlainSchema::Typed(plain))
    }

    /// Pre-order walk: objects before their properties, arrays before their
    /// items. Ref nodes are visited but not followed.
    pub fn traverse<F>(&self, id: SchemaNodeId, visit: &mut F) -> StoreResult<()>
    where
        F: FnMut(&SchemaNode),
    {
        let node = self.node(id)?;
        visit(node);
        match &node.kind {
            SchemaNodeKind::Object { properties, .. } => {
                for child in properties.values() {
                    self.traverse(*child, visit)?;
                }
            }
            SchemaNodeKind::Array { items } => self.traverse(*items, visit)?,
            _ => {}
        }
        Ok(())
    }

    /// Whether a node contributes no shape at all: an object without
    /// non-empty properties, or an array of such items. A ref already being
    /// expanded counts as empty.
    pub fn is_empty(&self, id: SchemaNodeId) -> StoreResult<bool> {
        self.is_empty_inner(id, &mut Vec::new())
    }

    fn is_empty_inner<'a>(
        &'a self,
        id: SchemaNodeId,
        stack: &mut Vec<&'a str>,
    ) -> StoreResult<bool> {
        let node = self.node(id)?;
        match &node.kind {
            SchemaNodeKind::Object { properties, .. } => {
                for child in properties.values() {
                    if !self.is_empty_inner(*child, stack)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            SchemaNodeKind::Array { items } => self.is_empty_inner(*items, stack),
            SchemaNodeKind::Ref { reference } => {
                if stack.contains(&reference.as_str()) {
                    return Ok(true);
                }
                let root = self.ref_root(reference).ok_or_else(|| StoreError::Resolution {
                    reference: reference.clone(),
                    path: self.path(id),
                })?;
                stack.push(reference);
                let empty = self.is_empty_inner(root, stack);
                stack.pop();
                empty
            }
            SchemaNodeKind::String { .. }
            | SchemaNodeKind::Number { .. }
            | SchemaNodeKind::Boolean { .. } => Ok(false),
        }
    }
}
