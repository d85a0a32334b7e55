//! Ordered strategy chain turning one schema node into one field.

use super::context::*;
use super::error::*;
use super::relation::*;
use super::schema_type::*;
use super::self_prelude::*;
use crate::naming::{capitalize, safe_name, NameRegistry};
use endpoint_graphql_lib::defaults;
use store::{SchemaNode, SchemaNodeId, SchemaNodeKind, SchemaStore};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TypeHandler {
    ForeignKey,
    ForeignKeyArray,
    String,
    Number,
    Boolean,
    Object,
    Array,
}

/// Dispatch order. Foreign keys come first so they are never turned into
/// plain strings or lists of strings.
pub const HANDLER_ORDER: [TypeHandler; 7] = [
    TypeHandler::ForeignKey,
    TypeHandler::ForeignKeyArray,
    TypeHandler::String,
    TypeHandler::Number,
    TypeHandler::Boolean,
    TypeHandler::Object,
    TypeHandler::Array,
];

/// A type generated alongside a field, registered once by the assembler.
#[derive(Clone, Debug, PartialEq)]
pub enum DynAuxType {
    Object(Arc<DynObjectType>),
    Input(Arc<DynInputType>),
}

impl DynAuxType {
    pub fn name(&self) -> &str {
        match self {
            Self::Object(object) => &object.name,
            Self::Input(input) => &input.name,
        }
    }
}

/// What a handler produced for one property.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldContribution {
    pub type_ref: DynTypeRef,
    pub resolver: Option<DynFieldResolver>,
    pub args: Vec<DynArgType>,
    pub aux_types: Vec<DynAuxType>,
}

impl FieldContribution {
    pub(crate) fn property(type_ref: DynTypeRef, site: &FieldSite) -> Self {
        Self {
            type_ref,
            resolver: Some(DynFieldResolver::Property {
                property: site.property.clone(),
            }),
            args: Vec::new(),
            aux_types: Vec::new(),
        }
    }
}

/// Where a node is being turned into a field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldSite {
    /// Raw property key in the row document.
    pub property: String,
    /// Name given to an object type minted at this site.
    pub type_name: String,
    /// Human readable owner, used when claiming names.
    pub owner: String,
    /// Whether foreign keys may become relation fields here.
    pub relations: bool,
    /// Whether `type_name` is already claimed for this site.
    pub claimed: bool,
}

impl FieldSite {
    pub fn root(table: &ValidTableType) -> Self {
        Self {
            property: String::new(),
            type_name: table.options.type_name.clone(),
            owner: format!("table {:?}", table.id),
            relations: true,
            claimed: true,
        }
    }

    fn child(&self, property: &str, field_name: &str) -> Self {
        Self {
            property: property.to_string(),
            type_name: format!("{}{}", self.type_name, capitalize(field_name)),
            owner: self.owner.clone(),
            relations: true,
            claimed: false,
        }
    }

    fn item(&self) -> Self {
        Self {
            relations: false,
            ..self.clone()
        }
    }
}

impl TypeHandler {
    pub fn can_handle(self, node: &SchemaNode, site: &FieldSite, store: &SchemaStore) -> bool {
        match self {
            Self::ForeignKey => site.relations && node.foreign_key().is_some(),
            Self::ForeignKeyArray => {
                site.relations
                    && node
                        .items()
                        .and_then(|items| store.resolve(items).ok())
                        .and_then(SchemaNode::foreign_key)
                        .is_some()
            }
            Self::String => matches!(node.kind, SchemaNodeKind::String { .. }),
            Self::Number => matches!(node.kind, SchemaNodeKind::Number { .. }),
            Self::Boolean => matches!(node.kind, SchemaNodeKind::Boolean { .. }),
            Self::Object => matches!(node.kind, SchemaNodeKind::Object { .. }),
            Self::Array => matches!(node.kind, SchemaNodeKind::Array { .. }),
        }
    }

    pub fn build(
        self,
        node: &SchemaNode,
        site: &FieldSite,
        ctx: &mut DynBuildContext,
    ) -> DynSchemaResult<Option<FieldContribution>> {
        match self {
            Self::ForeignKey => {
                let target = node.foreign_key().unwrap_or_default();
                match build_relation(target, false, site, ctx)? {
                    Some(relation) => Ok(Some(relation)),
                    None => Self::String.build(node, site, ctx),
                }
            }
            Self::ForeignKeyArray => {
                let store = ctx.store;
                let target = node
                    .items()
                    .and_then(|items| store.resolve(items).ok())
                    .and_then(SchemaNode::foreign_key)
                    .unwrap_or_default();
                match build_relation(target, true, site, ctx)? {
                    Some(relation) => Ok(Some(relation)),
                    None => Self::Array.build(node, &site.item(), ctx),
                }
            }
            Self::String => Ok(Some(FieldContribution::property(
                DynTypeRef::named_nn(TypeRef::STRING),
                site,
            ))),
            Self::Number => Ok(Some(FieldContribution::property(
                DynTypeRef::named_nn(TypeRef::FLOAT),
                site,
            ))),
            Self::Boolean => Ok(Some(FieldContribution::property(
                DynTypeRef::named_nn(TypeRef::BOOLEAN),
                site,
            ))),
            Self::Object => build_object(node, site, ctx),
            Self::Array => {
                let Some(items) = node.items() else {
                    return Ok(None);
                };
                let Some(item) = build_field(items, &site.item(), ctx)? else {
                    return Ok(None);
                };
                let mut list = FieldContribution::property(DynTypeRef::list_nn(item.type_ref), site);
                list.aux_types = item.aux_types;
                Ok(Some(list))
            }
        }
    }
}

/// Run the first matching handler over a node. Structurally empty nodes
/// produce no field.
pub fn build_field(
    id: SchemaNodeId,
    site: &FieldSite,
    ctx: &mut DynBuildContext,
) -> DynSchemaResult<Option<FieldContribution>> {
    let store = ctx.store;
    let node = store.node(id)?;
    if let Some(reference) = node.reference() {
        return build_ref(id, reference, site, ctx);
    }
    if store.is_empty(id)? {
        trace!("Skipping empty {} at {}", node.kind_name(), store.path(id));
        return Ok(None);
    }

    let Some(handler) = HANDLER_ORDER
        .into_iter()
        .find(|handler| handler.can_handle(node, site, store))
    else {
        return Ok(None);
    };
    handler.build(node, site, ctx)
}

fn build_ref(
    id: SchemaNodeId,
    reference: &str,
    site: &FieldSite,
    ctx: &mut DynBuildContext,
) -> DynSchemaResult<Option<FieldContribution>> {
    let store = ctx.store;
    let target = store.resolve(id)?;

    if !matches!(target.kind, SchemaNodeKind::Object { .. }) {
        if !ctx.enter_ref(reference) {
            warn!(
                "Dropping self-referencing {} {reference:?} at {}",
                target.kind_name(),
                store.path(id)
            );
            return Ok(None);
        }
        let built = build_field(target.id, site, ctx);
        ctx.leave_ref(reference);
        return built;
    }

    // Objects behind a ref become one shared, nullable type.
    if let Some((type_ref, aux_types)) = ctx.ref_type(reference) {
        return Ok(Some(FieldContribution {
            aux_types: aux_types.clone(),
            ..FieldContribution::property(type_ref.clone(), site)
        }));
    }
    let type_name = ctx.ref_type_name(reference)?;
    if !ctx.enter_ref(reference) {
        return Ok(Some(FieldContribution::property(
            DynTypeRef::named(type_name),
            site,
        )));
    }

    let ref_site = FieldSite {
        property: site.property.clone(),
        type_name,
        owner: format!("ref {reference:?}"),
        relations: true,
        claimed: true,
    };
    let built = build_field(target.id, &ref_site, ctx);
    ctx.leave_ref(reference);
    let Some(built) = built? else {
        return Ok(None);
    };

    let type_ref = built.type_ref.nullable();
    ctx.set_ref_type(reference, type_ref.clone(), built.aux_types.clone());
    Ok(Some(FieldContribution {
        aux_types: built.aux_types,
        ..FieldContribution::property(type_ref, site)
    }))
}

fn build_object(
    node: &SchemaNode,
    site: &FieldSite,
    ctx: &mut DynBuildContext,
) -> DynSchemaResult<Option<FieldContribution>> {
    let Some(properties) = node.properties() else {
        return Ok(None);
    };
    let mut site = site.clone();
    if !site.claimed {
        let owner = format!("{} at {}", site.owner, ctx.store.path(node.id));
        site.type_name = ctx.reserve_type_name(&site.type_name, owner)?;
        site.claimed = true;
    }
    let site = &site;

    let mut field_names = NameRegistry::new();
    let mut fields = IndexMap::with_capacity(properties.len());
    let mut aux_types = Vec::new();
    for (property, child) in properties {
        let name = safe_name(property, defaults::FIELD_NAME_PREFIX);
        field_names.claim(&name, format!("property {property:?} of {}", site.type_name))?;

        let Some(field) = build_field(*child, &site.child(property, &name), ctx)? else {
            continue;
        };
        aux_types.extend(field.aux_types);
        fields.insert(
            name.clone(),
            DynFieldType {
                name,
                type_ref: field.type_ref,
                args: field.args,
                resolver: field.resolver,
            },
        );
    }
    if fields.is_empty() {
        return Ok(None);
    }

    aux_types.push(DynAuxType::Object(Arc::new(DynObjectType {
        name: site.type_name.clone(),
        fields,
    })));

    Ok(Some(FieldContribution {
        aux_types,
        ..FieldContribution::property(DynTypeRef::named_nn(&site.type_name), site)
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::naming::TableTypeNames;
    use crate::store::{PlainSchema, RefRegistry};
    use assert_matches::assert_matches;

    fn table(id: &str, root: SchemaNodeId) -> ValidTableType {
        let type_names = TableTypeNames::new(id);
        ValidTableType {
            id: id.to_string(),
            field_name: crate::naming::decapitalize(&type_names.singular),
            options: ValidTableOptions {
                version_id: format!("{id}-v1"),
                type_name: format!("Blog{}", type_names.singular),
                root,
                data_type: DynTypeRef::named_nn(format!("Blog{}", type_names.singular)),
            },
            type_names,
        }
    }

    #[test]
    fn test_foreign_keys_are_dispatched_before_scalars() {
        let mut store = SchemaStore::new(RefRegistry::new());
        let id = store.parse(&PlainSchema::foreign_key("user")).unwrap();
        let list = store
            .parse(&PlainSchema::array(PlainSchema::foreign_key("user")))
            .unwrap();
        let site = FieldSite {
            property: "author".to_string(),
            type_name: "BlogPostAuthor".to_string(),
            owner: "table \"post\"".to_string(),
            relations: true,
            claimed: false,
        };

        let handler = |id| {
            HANDLER_ORDER
                .into_iter()
                .find(|handler| handler.can_handle(store.node(id).unwrap(), &site, &store))
        };
        assert_eq!(handler(id), Some(TypeHandler::ForeignKey));
        assert_eq!(handler(list), Some(TypeHandler::ForeignKeyArray));
    }

    #[test]
    fn test_object_fields_keep_property_order() {
        let mut store = SchemaStore::new(RefRegistry::new());
        let root = store
            .parse(&PlainSchema::object([
                ("title", PlainSchema::string()),
                ("1st", PlainSchema::number()),
                ("empty", PlainSchema::object::<&str, _>([])),
                ("flags", PlainSchema::array(PlainSchema::boolean())),
            ]))
            .unwrap();
        let tables = IndexMap::from([("post".to_string(), table("post", root))]);
        let mut ctx = DynBuildContext::new("blog", "Blog", &store, &tables, NameRegistry::new());

        let built = build_field(root, &FieldSite::root(&tables["post"]), &mut ctx)
            .unwrap()
            .unwrap();
        assert_eq!(built.type_ref.to_string(), "BlogPost!");

        let object = assert_matches!(built.aux_types.last(), Some(DynAuxType::Object(o)) => o);
        let fields: Vec<_> = object
            .fields
            .values()
            .map(|field| format!("{}: {}", field.name, field.type_ref))
            .collect();
        assert_eq!(
            fields,
            vec!["title: String!", "field_1st: Float!", "flags: [Boolean!]!"]
        );
        assert_eq!(
            object.fields["field_1st"].resolver,
            Some(DynFieldResolver::Property {
                property: "1st".to_string()
            })
        );
    }

    #[test]
    fn test_clashing_field_names_are_fatal() {
        let mut store = SchemaStore::new(RefRegistry::new());
        let root = store
            .parse(&PlainSchema::object([
                ("first-name", PlainSchema::string()),
                ("first_name", PlainSchema::string()),
            ]))
            .unwrap();
        let tables = IndexMap::from([("user".to_string(), table("user", root))]);
        let mut ctx = DynBuildContext::new("blog", "Blog", &store, &tables, NameRegistry::new());

        assert_matches!(
            build_field(root, &FieldSite::root(&tables["user"]), &mut ctx),
            Err(DynSchemaError::Naming(_))
        );
    }

    #[test]
    fn test_recursive_ref_is_named_once() {
        let mut refs = RefRegistry::new();
        refs.register_named(
            "urn:tree",
            "Tree",
            PlainSchema::object([
                ("label", PlainSchema::string()),
                ("children", PlainSchema::array(PlainSchema::reference("urn:tree"))),
            ]),
        );
        let mut store = SchemaStore::new(refs);
        let root = store
            .parse(&PlainSchema::object([
                ("tree", PlainSchema::reference("urn:tree")),
                ("other", PlainSchema::reference("urn:tree")),
            ]))
            .unwrap();
        let tables = IndexMap::from([("doc".to_string(), table("doc", root))]);
        let mut ctx = DynBuildContext::new("blog", "Blog", &store, &tables, NameRegistry::new());

        let built = build_field(root, &FieldSite::root(&tables["doc"]), &mut ctx)
            .unwrap()
            .unwrap();
        let tree: Vec<_> = built
            .aux_types
            .iter()
            .filter(|aux| aux.name() == "BlogTree")
            .collect();
        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0], tree[1]);

        let object = assert_matches!(tree[0], DynAuxType::Object(o) => o);
        assert_eq!(object.fields["children"].type_ref.to_string(), "[BlogTree]!");

        let root = assert_matches!(built.aux_types.last(), Some(DynAuxType::Object(o)) => o);
        assert_eq!(root.fields["tree"].type_ref.to_string(), "BlogTree");
        assert_eq!(root.fields["other"].type_ref.to_string(), "BlogTree");
    }
}
