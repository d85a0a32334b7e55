use super::schema_node::*;
use super::schema_store::*;
use super::self_prelude::*;
use serde_json::Value as JsonValue;

pub type RowId = String;

#[derive(Clone, Debug, PartialEq)]
pub enum ValueKind {
    String {
        value: Option<String>,
        default: String,
        foreign_key: Option<String>,
    },
    Number {
        value: Option<f64>,
        default: f64,
    },
    Boolean {
        value: Option<bool>,
        default: bool,
    },
    Object(IndexMap<String, Arc<ValueNode>>),
    Array(Vec<Arc<ValueNode>>),
}

/// A concrete value of one schema node inside one row.
#[derive(Clone, Debug, PartialEq)]
pub struct ValueNode {
    pub schema_node: SchemaNodeId,
    pub row_id: RowId,
    /// Position among the values registered for `(schema_node, row_id)`.
    pub index: usize,
    pub kind: ValueKind,
}

impl ValueNode {
    /// String value, or the schema default when absent.
    pub fn string(&self) -> Option<&str> {
        match &self.kind {
            ValueKind::String { value, default, .. } => {
                Some(value.as_deref().unwrap_or(default))
            }
            _ => None,
        }
    }

    pub fn number(&self) -> Option<f64> {
        match &self.kind {
            ValueKind::Number { value, default } => Some(value.unwrap_or(*default)),
            _ => None,
        }
    }

    pub fn boolean(&self) -> Option<bool> {
        match &self.kind {
            ValueKind::Boolean { value, default } => Some(value.unwrap_or(*default)),
            _ => None,
        }
    }

    pub fn foreign_key(&self) -> Option<&str> {
        match &self.kind {
            ValueKind::String { foreign_key, .. } => foreign_key.as_deref(),
            _ => None,
        }
    }

    pub fn property(&self, name: &str) -> Option<&Arc<ValueNode>> {
        match &self.kind {
            ValueKind::Object(properties) => properties.get(name),
            _ => None,
        }
    }

    pub fn items(&self) -> &[Arc<ValueNode>] {
        match &self.kind {
            ValueKind::Array(items) => items,
            _ => &[],
        }
    }

    pub fn to_json(&self) -> JsonValue {
        match &self.kind {
            ValueKind::String { .. } => self.string().map(Into::into).unwrap_or_default(),
            ValueKind::Number { .. } => self.number().map(Into::into).unwrap_or_default(),
            ValueKind::Boolean { .. } => self.boolean().map(Into::into).unwrap_or_default(),
            ValueKind::Object(properties) => JsonValue::Object(
                properties
                    .iter()
                    .map(|(name, value)| (name.clone(), value.to_json()))
                    .collect(),
            ),
            ValueKind::Array(items) => {
                JsonValue::Array(items.iter().map(|item| item.to_json()).collect())
            }
        }
    }
}

type ValueKey = (SchemaNodeId, RowId);

/// Registry of value occurrences, scoped per `(schema node, row id)`.
#[derive(Clone, Debug, Default)]
pub struct ValueStore {
    entries: HashMap<ValueKey, Vec<Option<Arc<ValueNode>>>>,
}

impl ValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn reserve(&mut self, schema_node: SchemaNodeId, row_id: &str) -> usize {
        let slots = self
            .entries
            .entry((schema_node, row_id.to_string()))
            .or_default();
        slots.push(None);
        slots.len() - 1
    }

    fn fill(&mut self, value: ValueNode) -> Arc<ValueNode> {
        let value = Arc::new(value);
        if let Some(slot) = self
            .entries
            .get_mut(&(value.schema_node, value.row_id.clone()))
            .and_then(|slots| slots.get_mut(value.index))
        {
            *slot = Some(value.clone());
        }
        value
    }

    /// Append a value for `(schema_node, row_id)`; the first write gets index 0.
    pub fn register(
        &mut self,
        schema_node: SchemaNodeId,
        row_id: &str,
        kind: ValueKind,
    ) -> Arc<ValueNode> {
        let index = self.reserve(schema_node, row_id);
        self.fill(ValueNode {
            schema_node,
            row_id: row_id.to_string(),
            index,
            kind,
        })
    }

    pub fn get_value(&self, schema_node: SchemaNodeId, row_id: &str) -> Option<Arc<ValueNode>> {
        self.get_value_at(schema_node, row_id, 0)
    }

    pub fn get_value_at(
        &self,
        schema_node: SchemaNodeId,
        row_id: &str,
        index: usize,
    ) -> Option<Arc<ValueNode>> {
        self.entries
            .get(&(schema_node, row_id.to_string()))
            .and_then(|slots| slots.get(index))
            .and_then(Clone::clone)
    }

    pub fn count(&self, schema_node: SchemaNodeId, row_id: &str) -> usize {
        self.entries
            .get(&(schema_node, row_id.to_string()))
            .map(Vec::len)
            .unwrap_or_default()
    }

    /// Materialize a row's JSON document under `root`, in document order.
    ///
    /// Values of a `$ref` property are keyed by the ref node itself. Absent
    /// primitives fall back to the schema default, absent arrays are empty,
    /// and an absent object re-entering a ref that is already being expanded
    /// is left out of its parent.
    pub fn load(
        &mut self,
        store: &SchemaStore,
        root: SchemaNodeId,
        row_id: &str,
        json: &JsonValue,
    ) -> StoreResult<Arc<ValueNode>> {
        let mut stack = Vec::new();
        let value = self.load_node(store, root, row_id, Some(json), &mut stack)?;
        match value {
            Some(value) => Ok(value),
            None => Ok(self.register(root, row_id, ValueKind::Object(IndexMap::new()))),
        }
    }

    fn load_node(
        &mut self,
        store: &SchemaStore,
        id: SchemaNodeId,
        row_id: &str,
        json: Option<&JsonValue>,
        stack: &mut Vec<String>,
    ) -> StoreResult<Option<Arc<ValueNode>>> {
        let json = json.filter(|json| !json.is_null());

        // Ref-only cycles fail here instead of spinning below.
        store.resolve(id)?;

        let mut refs = 0;
        let mut node = store.node(id)?;
        while let SchemaNodeKind::Ref { reference } = &node.kind {
            if json.is_none() && stack.contains(reference) {
                stack.truncate(stack.len() - refs);
                return Ok(None);
            }
            stack.push(reference.clone());
            refs += 1;
            let root = store
                .ref_root(reference)
                .ok_or_else(|| StoreError::Resolution {
                    reference: reference.clone(),
                    path: store.path(node.id),
                })?;
            node = store.node(root)?;
        }

        let value = self.load_shape(store, id, node, row_id, json, stack);
        stack.truncate(stack.len() - refs);
        value.map(Some)
    }

    fn load_shape(
        &mut self,
        store: &SchemaStore,
        id: SchemaNodeId,
        node: &SchemaNode,
        row_id: &str,
        json: Option<&JsonValue>,
        stack: &mut Vec<String>,
    ) -> StoreResult<Arc<ValueNode>> {
        let kind = match &node.kind {
            SchemaNodeKind::String {
                default,
                foreign_key,
                ..
            } => ValueKind::String {
                value: json.and_then(JsonValue::as_str).map(ToString::to_string),
                default: default.clone(),
                foreign_key: foreign_key.clone(),
            },
            SchemaNodeKind::Number { default, .. } => ValueKind::Number {
                value: json.and_then(JsonValue::as_f64),
                default: *default,
            },
            SchemaNodeKind::Boolean { default, .. } => ValueKind::Boolean {
                value: json.and_then(JsonValue::as_bool),
                default: *default,
            },
            SchemaNodeKind::Object { properties, .. } => {
                let index = self.reserve(id, row_id);
                let mut values = IndexMap::with_capacity(properties.len());
                for (name, child) in properties {
                    let child_json = json.and_then(|json| json.get(name));
                    if let Some(value) =
                        self.load_node(store, *child, row_id, child_json, stack)?
                    {
                        values.insert(name.clone(), value);
                    }
                }
                return Ok(self.fill(ValueNode {
                    schema_node: id,
                    row_id: row_id.to_string(),
                    index,
                    kind: ValueKind::Object(values),
                }));
            }
            SchemaNodeKind::Array { items } => {
                let index = self.reserve(id, row_id);
                let mut values = Vec::new();
                for item in json.and_then(JsonValue::as_array).into_iter().flatten() {
                    // An explicit null item still yields a value so positions line up.
                    let item = match self.load_node(store, *items, row_id, Some(item), stack)? {
                        Some(item) => item,
                        None => self.register(*items, row_id, ValueKind::Object(IndexMap::new())),
                    };
                    values.push(item);
                }
                return Ok(self.fill(ValueNode {
                    schema_node: id,
                    row_id: row_id.to_string(),
                    index,
                    kind: ValueKind::Array(values),
                }));
            }
            SchemaNodeKind::Ref { reference } => {
                return Err(StoreError::RefCycle {
                    reference: reference.clone(),
                    path: store.path(id),
                })
            }
        };
        Ok(self.register(id, row_id, kind))
    }
}
