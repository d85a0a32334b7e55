use super::context::*;
use super::error::*;
use super::filter::*;
use super::handler::*;
use super::schema_type::*;
use super::self_prelude::*;
use crate::naming::{decapitalize, project_prefix, NameRegistry, TableTypeNames};
use lazy_static::lazy_static;
use store::{ConverterTable, SchemaNodeId, SchemaNodeKind, SchemaStore, StoreResult};

lazy_static! {
    static ref BUILTIN_SCALARS: HashSet<&'static str> = HashSet::from([
        TypeRef::INT,
        TypeRef::FLOAT,
        TypeRef::STRING,
        TypeRef::BOOLEAN,
        TypeRef::ID,
        TypeRef::DATE_TIME,
        TypeRef::JSON,
    ]);
}

/// Turns a batch of tables into a [`DynSchemaType`].
///
/// Tables that fail to parse or turn out structurally empty are excluded with
/// a reason and the rest of the batch carries on. Name collisions and
/// dangling type references abort the build.
#[derive(Clone, Debug)]
pub struct DynSchemaTypeBuilder {
    project: String,
    prefix: String,
    refs: store::RefRegistry,
}

impl DynSchemaTypeBuilder {
    pub fn new(project: impl Into<String>, refs: store::RefRegistry) -> Self {
        let project = project.into();
        Self {
            prefix: project_prefix(&project),
            project,
            refs,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn build(&self, tables: &[ConverterTable]) -> DynSchemaResult<DynSchemaType> {
        let mut store = SchemaStore::new(self.refs.clone());
        let mut excluded = Vec::new();
        let classified = classify(&mut store, tables, &mut excluded);

        let mut names = self.scaffolding_names()?;
        let mut tables = self.name_tables(classified, &mut names)?;

        let mut objects = IndexMap::new();
        let mut inputs = IndexMap::new();
        let mut data_types = Vec::with_capacity(tables.len());
        {
            let mut ctx =
                DynBuildContext::new(&self.project, &self.prefix, &store, &tables, names);
            for table in tables.values() {
                trace!("Building fields of table {:?}", table.id);
                if !matches!(store.resolve(table.options.root)?.kind, SchemaNodeKind::Object { .. }) {
                    warn!("Table {:?} is not an object, exposing its data as JSON", table.id);
                    data_types.push(DynTypeRef::named(TypeRef::JSON));
                    continue;
                }
                let site = FieldSite::root(table);
                let data_type = match build_field(table.options.root, &site, &mut ctx)? {
                    Some(field) => {
                        register_aux_types(&mut objects, &mut inputs, field.aux_types);
                        field.type_ref
                    }
                    None => {
                        warn!(
                            "Table {:?} has no representable fields, exposing its data as JSON",
                            table.id
                        );
                        DynTypeRef::named(TypeRef::JSON)
                    }
                };
                data_types.push(data_type);
            }

            for table in tables.values() {
                let where_input = ctx.where_input(&table.options.type_name)?;
                let order_by_input = ctx.order_by_input(&table.options.type_name)?;
                register_aux_types(
                    &mut objects,
                    &mut inputs,
                    vec![
                        DynAuxType::Input(where_input),
                        DynAuxType::Input(order_by_input),
                    ],
                );
            }
        }

        for input in shared_filter_inputs(&self.prefix) {
            inputs.insert(input.name.clone(), Arc::new(input));
        }
        let enums = shared_enums(&self.prefix)
            .into_iter()
            .map(|item| (item.name.clone(), item))
            .collect();
        for (table, data_type) in tables.values_mut().zip(data_types) {
            table.options.data_type = data_type;
        }

        let schema_type = DynSchemaType {
            project: self.project.clone(),
            prefix: self.prefix.clone(),
            tables,
            objects,
            inputs,
            enums,
            excluded,
            store: Arc::new(store),
        };
        check_links(&schema_type)?;

        info!(
            "Built schema type for project {:?}: {} tables, {} excluded",
            schema_type.project,
            schema_type.tables.len(),
            schema_type.excluded.len()
        );
        Ok(schema_type)
    }

    /// Names shared by the whole project, claimed before any table.
    fn scaffolding_names(&self) -> DynSchemaResult<NameRegistry> {
        let mut names = NameRegistry::new();
        let shared = [
            TypeRef::QUERY.to_string(),
            TypeRef::SERVICE.to_string(),
            TypeRef::DATE_TIME.to_string(),
            TypeRef::JSON.to_string(),
            TypeRef::page_info(&self.prefix),
            TypeRef::sort_order(&self.prefix),
            TypeRef::order_by_field(&self.prefix),
            TypeRef::string_filter(&self.prefix),
            TypeRef::date_time_filter(&self.prefix),
            TypeRef::bool_filter(&self.prefix),
            TypeRef::json_filter(&self.prefix),
        ];
        for name in shared {
            names.claim(name, "shared scaffolding")?;
        }
        Ok(names)
    }

    fn name_tables(
        &self,
        classified: Vec<(&ConverterTable, SchemaNodeId)>,
        names: &mut NameRegistry,
    ) -> DynSchemaResult<IndexMap<String, ValidTableType>> {
        let mut root_fields = NameRegistry::new();
        root_fields.claim("_service", "service field")?;

        let mut tables = IndexMap::with_capacity(classified.len());
        for (table, root) in classified {
            let owner = format!("table {:?}", table.id);
            let type_names = TableTypeNames::new(&table.id);
            let type_name = format!("{}{}", self.prefix, type_names.singular);
            for name in [
                type_name.clone(),
                TypeRef::node(&type_name),
                TypeRef::connection(&type_name),
                TypeRef::connection_edge(&type_name),
            ] {
                names.claim(name, &owner)?;
            }
            names.claim(
                TypeRef::where_input(&type_name),
                format!("filter of {type_name}"),
            )?;
            names.claim(
                TypeRef::order_by_input(&type_name),
                format!("ordering of {type_name}"),
            )?;

            let valid = ValidTableType {
                id: table.id.clone(),
                field_name: decapitalize(&type_names.singular),
                type_names,
                options: ValidTableOptions {
                    version_id: table.version_id.clone(),
                    type_name,
                    root,
                    data_type: DynTypeRef::named(TypeRef::JSON),
                },
            };
            root_fields.claim(&valid.field_name, &owner)?;
            root_fields.claim(valid.list_field_name(), &owner)?;

            debug!(
                "Table {:?} ({}) is exposed as {}",
                table.id, table.version_id, valid.options.type_name
            );
            tables.insert(table.id.clone(), valid);
        }
        Ok(tables)
    }
}

/// Parse every table into the shared store and sort out the ones that cannot
/// be part of the schema.
fn classify<'t>(
    store: &mut SchemaStore,
    tables: &'t [ConverterTable],
    excluded: &mut Vec<ExcludedTable>,
) -> Vec<(&'t ConverterTable, SchemaNodeId)> {
    let mut seen = HashSet::new();
    let mut classified = Vec::with_capacity(tables.len());
    for table in tables {
        let reason = if !seen.insert(table.id.as_str()) {
            warn!("Excluding table {:?}: duplicate id", table.id);
            ExclusionReason::Duplicate
        } else {
            match parse_table(store, table) {
                Ok(Some(root)) => {
                    classified.push((table, root));
                    continue;
                }
                Ok(None) => {
                    info!("Excluding structurally empty table {:?}", table.id);
                    ExclusionReason::Empty
                }
                Err(err) => {
                    warn!("Excluding table {:?}: {err}", table.id);
                    ExclusionReason::Failed(err)
                }
            }
        };
        excluded.push(ExcludedTable {
            id: table.id.clone(),
            reason,
        });
    }
    classified
}

fn parse_table(
    store: &mut SchemaStore,
    table: &ConverterTable,
) -> StoreResult<Option<SchemaNodeId>> {
    let root = store.parse(&table.schema)?;
    check_refs(store, root, &mut HashSet::new())?;
    match store.is_empty(root)? {
        true => Ok(None),
        false => Ok(Some(root)),
    }
}

/// Resolve every ref reachable from `id`, so ref-only cycles surface before
/// any naming happens.
fn check_refs(
    store: &SchemaStore,
    id: SchemaNodeId,
    seen: &mut HashSet<String>,
) -> StoreResult<()> {
    let mut refs = Vec::new();
    store.traverse(id, &mut |node| {
        if let Some(reference) = node.reference() {
            refs.push((node.id, reference.to_string()));
        }
    })?;

    for (node, reference) in refs {
        store.resolve(node)?;
        if seen.insert(reference.clone()) {
            if let Some(root) = store.ref_root(&reference) {
                check_refs(store, root, seen)?;
            }
        }
    }
    Ok(())
}

/// Aux types repeat whenever a shared type is reached again; the first
/// registration wins.
fn register_aux_types(
    objects: &mut IndexMap<String, Arc<DynObjectType>>,
    inputs: &mut IndexMap<String, Arc<DynInputType>>,
    aux_types: Vec<DynAuxType>,
) {
    for aux in aux_types {
        match aux {
            DynAuxType::Object(object) => {
                objects.entry(object.name.clone()).or_insert(object);
            }
            DynAuxType::Input(input) => {
                inputs.entry(input.name.clone()).or_insert(input);
            }
        }
    }
}

/// Every named type a field, argument or input field points at must exist.
pub(crate) fn check_links(schema_type: &DynSchemaType) -> DynSchemaResult<()> {
    let mut known: HashSet<String> = BUILTIN_SCALARS.iter().map(ToString::to_string).collect();
    known.extend(schema_type.objects.keys().cloned());
    known.extend(schema_type.inputs.keys().cloned());
    known.extend(schema_type.enums.keys().cloned());
    known.insert(TypeRef::page_info(&schema_type.prefix));
    for table in schema_type.tables.values() {
        let type_name = &table.options.type_name;
        known.insert(TypeRef::node(type_name));
        known.insert(TypeRef::connection(type_name));
        known.insert(TypeRef::connection_edge(type_name));
    }

    let check = |owner: String, type_ref: &DynTypeRef| match known.contains(type_ref.type_name()) {
        true => Ok(()),
        false => Err(DynSchemaError::DanglingType {
            owner,
            name: type_ref.type_name().to_string(),
        }),
    };

    for object in schema_type.objects.values() {
        for field in object.fields.values() {
            check(format!("{}.{}", object.name, field.name), &field.type_ref)?;
            for arg in &field.args {
                check(
                    format!("{}.{}({})", object.name, field.name, arg.name),
                    &arg.type_ref,
                )?;
            }
        }
    }
    for input in schema_type.inputs.values() {
        for field in input.fields.values() {
            check(format!("{}.{}", input.name, field.name), &field.type_ref)?;
        }
    }
    for table in schema_type.tables.values() {
        check(
            format!("{}.data", TypeRef::node(&table.options.type_name)),
            &table.options.data_type,
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{PlainSchema, RefRegistry, StoreError};
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;

    fn builder() -> DynSchemaTypeBuilder {
        DynSchemaTypeBuilder::new("blog", RefRegistry::with_system_schemas())
    }

    #[test]
    fn test_builds_one_object_per_table_in_property_order() {
        let tables = vec![ConverterTable::new(
            "post",
            "v1",
            PlainSchema::object([
                ("title", PlainSchema::string()),
                ("views", PlainSchema::number()),
                ("draft", PlainSchema::boolean()),
            ]),
        )];
        let schema_type = builder().build(&tables).unwrap();

        assert_eq!(schema_type.prefix, "Blog");
        let object = schema_type.table_object("post").unwrap();
        assert_eq!(object.name, "BlogPost");
        assert_eq!(
            object.fields.keys().collect::<Vec<_>>(),
            vec!["title", "views", "draft"]
        );
        assert_eq!(schema_type.tables["post"].field_name, "post");
        assert_eq!(schema_type.tables["post"].list_field_name(), "posts");
        assert!(schema_type.input("BlogPostWhereInput").is_some());
        assert!(schema_type.input("BlogPostOrderByInput").is_some());
        assert!(schema_type.input("BlogStringFilter").is_some());
    }

    #[test]
    fn test_exclusions_are_recorded_with_reasons() {
        let tables = vec![
            ConverterTable::new("empty", "v1", PlainSchema::object::<&str, _>([])),
            ConverterTable::new(
                "nested",
                "v1",
                PlainSchema::object([("inner", PlainSchema::object::<&str, _>([]))]),
            ),
            ConverterTable::new(
                "broken",
                "v1",
                PlainSchema::object([("file", PlainSchema::reference("urn:missing"))]),
            ),
            ConverterTable::new("ok", "v1", PlainSchema::object([("a", PlainSchema::string())])),
            ConverterTable::new("ok", "v2", PlainSchema::object([("b", PlainSchema::string())])),
        ];
        let schema_type = builder().build(&tables).unwrap();

        assert_eq!(schema_type.tables.keys().collect::<Vec<_>>(), vec!["ok"]);
        assert_eq!(schema_type.tables["ok"].options.version_id, "v1");
        assert!(schema_type.object("BlogEmpty").is_none());
        assert!(schema_type.object("BlogNested").is_none());

        let reasons: Vec<_> = schema_type
            .excluded
            .iter()
            .map(|table| (table.id.as_str(), &table.reason))
            .collect();
        assert_matches!(
            reasons.as_slice(),
            [
                ("empty", ExclusionReason::Empty),
                ("nested", ExclusionReason::Empty),
                ("broken", ExclusionReason::Failed(StoreError::Resolution { reference, path })),
                ("ok", ExclusionReason::Duplicate),
            ] if reference == "urn:missing" && path == "/properties/file"
        );
    }

    #[test]
    fn test_relation_to_excluded_table_degrades_to_string() {
        let tables = vec![
            ConverterTable::new("ghost", "v1", PlainSchema::object::<&str, _>([])),
            ConverterTable::new("user", "v1", PlainSchema::object([("name", PlainSchema::string())])),
            ConverterTable::new(
                "post",
                "v1",
                PlainSchema::object([
                    ("author", PlainSchema::foreign_key("user")),
                    ("haunt", PlainSchema::foreign_key("ghost")),
                    ("haunts", PlainSchema::array(PlainSchema::foreign_key("ghost"))),
                ]),
            ),
        ];
        let schema_type = builder().build(&tables).unwrap();
        let post = schema_type.table_object("post").unwrap();

        assert!(post.fields["author"].is_relation());
        assert_eq!(post.fields["author"].type_ref.to_string(), "BlogUserConnection!");
        assert!(!post.fields["haunt"].is_relation());
        assert_eq!(post.fields["haunt"].type_ref.to_string(), "String!");
        assert_eq!(post.fields["haunts"].type_ref.to_string(), "[String!]!");
    }

    #[test]
    fn test_colliding_table_names_abort_the_build() {
        let tables = vec![
            ConverterTable::new("user", "v1", PlainSchema::object([("a", PlainSchema::string())])),
            ConverterTable::new("User", "v1", PlainSchema::object([("a", PlainSchema::string())])),
        ];
        assert_matches!(builder().build(&tables), Err(DynSchemaError::Naming(_)));
    }

    #[test]
    fn test_nested_types_step_aside_for_table_types() {
        let tables = vec![
            ConverterTable::new(
                "post",
                "v1",
                PlainSchema::object([
                    ("meta", PlainSchema::object([("a", PlainSchema::string())])),
                    ("node", PlainSchema::object([("b", PlainSchema::string())])),
                ]),
            ),
            ConverterTable::new(
                "postMeta",
                "v1",
                PlainSchema::object([("c", PlainSchema::string())]),
            ),
        ];
        let schema_type = builder().build(&tables).unwrap();

        let post_meta = schema_type.table_object("postMeta").unwrap();
        assert_eq!(post_meta.name, "BlogPostMeta");
        assert_eq!(post_meta.fields.keys().collect::<Vec<_>>(), vec!["c"]);

        let post = schema_type.table_object("post").unwrap();
        assert_eq!(post.fields["meta"].type_ref.to_string(), "BlogPostMeta2!");
        assert_eq!(post.fields["node"].type_ref.to_string(), "BlogPostNode2!");
        let meta = schema_type.object("BlogPostMeta2").unwrap();
        assert_eq!(meta.fields.keys().collect::<Vec<_>>(), vec!["a"]);
        assert!(schema_type.object("BlogPostNode2").is_some());
    }

    #[test]
    fn test_reserved_names_get_the_fallback_prefix() {
        let tables = vec![
            ConverterTable::new("__x", "v1", PlainSchema::object([("a", PlainSchema::string())])),
            ConverterTable::new(
                "post",
                "v1",
                PlainSchema::object([("__meta", PlainSchema::string())]),
            ),
        ];
        let schema_type = builder().build(&tables).unwrap();

        let table = &schema_type.tables["__x"];
        assert_eq!(table.options.type_name, "BlogTable___x");
        assert_eq!(table.field_name, "table___x");
        assert!(!table.list_field_name().starts_with("__"));

        let post = schema_type.table_object("post").unwrap();
        assert_eq!(post.fields.keys().collect::<Vec<_>>(), vec!["field___meta"]);
        assert_eq!(
            post.fields["field___meta"].resolver,
            Some(DynFieldResolver::Property {
                property: "__meta".to_string()
            })
        );
    }

    #[test]
    fn test_non_object_tables_expose_json() {
        let tables = vec![
            ConverterTable::new("tag", "v1", PlainSchema::string()),
            ConverterTable::new("tags", "v1", PlainSchema::array(PlainSchema::string())),
        ];
        let schema_type = builder().build(&tables).unwrap();

        assert_eq!(schema_type.tables["tag"].options.data_type.to_string(), "JSON");
        assert_eq!(schema_type.tables["tags"].options.data_type.to_string(), "JSON");
        assert!(schema_type.table_object("tag").is_none());
    }

    #[test]
    fn test_where_inputs_are_shared_across_tables() {
        let tables = vec![
            ConverterTable::new("user", "v1", PlainSchema::object([("name", PlainSchema::string())])),
            ConverterTable::new(
                "post",
                "v1",
                PlainSchema::object([("readers", PlainSchema::array(PlainSchema::foreign_key("user")))]),
            ),
            ConverterTable::new(
                "team",
                "v1",
                PlainSchema::object([("members", PlainSchema::array(PlainSchema::foreign_key("user")))]),
            ),
        ];
        let schema_type = builder().build(&tables).unwrap();

        let where_input = |table: &str, field: &str| {
            let object = schema_type.table_object(table).unwrap();
            let arg = object.fields[field]
                .args
                .iter()
                .find(|arg| arg.name == "where")
                .unwrap();
            arg.input.clone().unwrap()
        };
        let readers = where_input("post", "readers");
        let members = where_input("team", "members");
        let registered = schema_type.input("BlogUserWhereInput").unwrap();

        assert_eq!(readers.name, "BlogUserWhereInput");
        assert!(Arc::ptr_eq(&readers, &members));
        assert!(Arc::ptr_eq(&readers, registered));
    }

    #[test]
    fn test_dangling_types_are_reported() {
        let tables = vec![ConverterTable::new(
            "post",
            "v1",
            PlainSchema::object([("title", PlainSchema::string())]),
        )];
        let mut schema_type = builder().build(&tables).unwrap();
        schema_type.tables["post"].options.data_type = DynTypeRef::named_nn("Nowhere");

        assert_matches!(
            check_links(&schema_type),
            Err(DynSchemaError::DanglingType { owner, name })
                if owner == "BlogPostNode.data" && name == "Nowhere"
        );
    }
}
