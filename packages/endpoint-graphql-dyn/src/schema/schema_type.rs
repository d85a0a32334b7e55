use super::self_prelude::*;
use crate::naming::TableTypeNames;

/// Type reference of the intermediate model, convertible to [`TypeRef`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum DynTypeRef {
    Named(String),
    NonNull(Box<DynTypeRef>),
    List(Box<DynTypeRef>),
}

impl DynTypeRef {
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }
    pub fn named_nn(name: impl Into<String>) -> Self {
        Self::NonNull(Box::new(Self::named(name)))
    }
    pub fn named_nn_list(name: impl Into<String>) -> Self {
        Self::List(Box::new(Self::named_nn(name)))
    }
    pub fn named_nn_list_nn(name: impl Into<String>) -> Self {
        Self::NonNull(Box::new(Self::named_nn_list(name)))
    }
    /// `[inner]!`
    pub fn list_nn(inner: DynTypeRef) -> Self {
        Self::NonNull(Box::new(Self::List(Box::new(inner))))
    }

    /// Innermost named type.
    pub fn type_name(&self) -> &str {
        match self {
            Self::Named(name) => name,
            Self::NonNull(inner) | Self::List(inner) => inner.type_name(),
        }
    }

    pub fn nullable(self) -> Self {
        match self {
            Self::NonNull(inner) => *inner,
            other => other,
        }
    }
}

impl fmt::Display for DynTypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => write!(f, "{name}"),
            Self::NonNull(inner) => write!(f, "{inner}!"),
            Self::List(inner) => write!(f, "[{inner}]"),
        }
    }
}

impl From<&DynTypeRef> for TypeRef {
    fn from(type_ref: &DynTypeRef) -> Self {
        match type_ref {
            DynTypeRef::Named(name) => TypeRef::Named(name.clone().into()),
            DynTypeRef::NonNull(inner) => TypeRef::NonNull(Box::new(inner.as_ref().into())),
            DynTypeRef::List(inner) => TypeRef::List(Box::new(inner.as_ref().into())),
        }
    }
}

/// How a generated field gets its value at query time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DynFieldResolver {
    /// Read `property` from the parent value object.
    Property { property: String },
    /// Read foreign key(s) from `property` and page through `target` rows.
    Relation {
        property: String,
        target: String,
        many: bool,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct DynArgType {
    pub name: String,
    pub type_ref: DynTypeRef,
    /// Set when the argument takes a generated input type.
    pub input: Option<Arc<DynInputType>>,
    pub description: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DynFieldType {
    pub name: String,
    pub type_ref: DynTypeRef,
    pub args: Vec<DynArgType>,
    pub resolver: Option<DynFieldResolver>,
}

impl DynFieldType {
    pub fn is_relation(&self) -> bool {
        matches!(self.resolver, Some(DynFieldResolver::Relation { .. }))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct DynObjectType {
    pub name: String,
    pub fields: IndexMap<String, DynFieldType>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DynInputFieldType {
    pub name: String,
    pub type_ref: DynTypeRef,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DynInputType {
    pub name: String,
    pub fields: IndexMap<String, DynInputFieldType>,
}

impl DynInputType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: IndexMap::new(),
        }
    }

    pub fn field(mut self, name: impl Into<String>, type_ref: DynTypeRef) -> Self {
        let name = name.into();
        self.fields.insert(
            name.clone(),
            DynInputFieldType { name, type_ref },
        );
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DynEnumType {
    pub name: String,
    pub items: Vec<String>,
}

/// A table that made it into the schema.
#[derive(Clone, Debug, PartialEq)]
pub struct ValidTableType {
    pub id: String,
    /// Name of the by-id root field; the list field is its plural.
    pub field_name: String,
    pub type_names: TableTypeNames,
    pub options: ValidTableOptions,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ValidTableOptions {
    pub version_id: String,
    /// Project prefix plus singular name; base of every per-table type.
    pub type_name: String,
    pub root: store::SchemaNodeId,
    /// Type of the node's `data` field.
    pub data_type: DynTypeRef,
}

impl ValidTableType {
    pub fn list_field_name(&self) -> String {
        crate::naming::decapitalize(&self.type_names.plural)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ExclusionReason {
    /// The schema has no shape; not an error.
    Empty,
    /// The schema could not be parsed or resolved.
    Failed(store::StoreError),
    /// Another table of the batch already uses this id.
    Duplicate,
}

impl fmt::Display for ExclusionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "structurally empty"),
            Self::Failed(err) => write!(f, "{err}"),
            Self::Duplicate => write!(f, "duplicate table id"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ExcludedTable {
    pub id: String,
    pub reason: ExclusionReason,
}

/// Everything one build generates, before it is turned into a [`Schema`].
#[derive(Clone, Debug, Default)]
pub struct DynSchemaType {
    pub project: String,
    /// Prefix of every generated type name.
    pub prefix: String,
    pub tables: IndexMap<String, ValidTableType>,
    pub objects: IndexMap<String, Arc<DynObjectType>>,
    pub inputs: IndexMap<String, Arc<DynInputType>>,
    pub enums: IndexMap<String, DynEnumType>,
    pub excluded: Vec<ExcludedTable>,
    pub store: Arc<store::SchemaStore>,
}

impl DynSchemaType {
    pub fn table(&self, id: &str) -> Option<&ValidTableType> {
        self.tables.get(id)
    }

    pub fn object(&self, name: &str) -> Option<&Arc<DynObjectType>> {
        self.objects.get(name)
    }

    pub fn input(&self, name: &str) -> Option<&Arc<DynInputType>> {
        self.inputs.get(name)
    }

    /// Data object type of a table, when its root is an object.
    pub fn table_object(&self, id: &str) -> Option<&Arc<DynObjectType>> {
        self.table(id)
            .and_then(|table| self.object(table.options.data_type.type_name()))
    }

    pub fn is_excluded(&self, id: &str) -> bool {
        self.excluded.iter().any(|table| table.id == id)
    }
}
