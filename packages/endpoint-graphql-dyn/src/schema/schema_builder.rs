use super::error::*;
use super::resolver::*;
use super::schema_type::*;
use super::self_prelude::*;
use endpoint_graphql_lib::config::GraphQLLimitsConfig;
use std::sync::OnceLock;
use store::RowSource;

/// Registers a [`DynSchemaType`] with `async_graphql` and wires up its
/// resolvers.
pub struct DynSchemaBuilder {
    schema: SchemaBuilder,
    query: Object,
    sdl: Arc<OnceLock<String>>,
}

impl DynSchemaBuilder {
    pub fn new(schema_type: Arc<DynSchemaType>, source: Arc<dyn RowSource>) -> Self {
        let resolver = DynResolver::new(schema_type.clone(), source);
        let sdl = resolver.sdl_cell();
        let prefix = schema_type.prefix.as_str();

        let mut schema = Schema::build(TypeRef::QUERY, None, None)
            .register(
                Scalar::new(TypeRef::DATE_TIME)
                    .description("ISO 8601 timestamp, as stored by the row service."),
            )
            .register(Scalar::new(TypeRef::JSON).description("Arbitrary JSON value."))
            .register(Object::new_page_info::<DynResolver>(prefix))
            .register(Object::new_service::<DynResolver>());

        for item in schema_type.enums.values() {
            let mut r#enum = Enum::new(&item.name);
            for value in &item.items {
                r#enum = r#enum.item(EnumItem::new(value));
            }
            schema = schema.register(r#enum);
        }

        for input in schema_type.inputs.values() {
            let mut object = InputObject::new(&input.name);
            for field in input.fields.values() {
                object = object.field(InputValue::new(&field.name, TypeRef::from(&field.type_ref)));
            }
            schema = schema.register(object);
        }

        for object_type in schema_type.objects.values() {
            let mut object = Object::new(&object_type.name);
            for field_type in object_type.fields.values() {
                object = object.field(data_field(field_type));
            }
            schema = schema.register(object);
        }

        let mut query = Object::new_query();
        for table in schema_type.tables.values() {
            let type_name = table.options.type_name.as_str();
            schema = schema
                .register(Object::new_node::<DynResolver>(
                    type_name,
                    TypeRef::from(&table.options.data_type),
                ))
                .register(Object::new_connection::<DynResolver>(type_name, prefix))
                .register(Object::new_connection_edge::<DynResolver>(type_name));

            let table_id = table.id.clone();
            query = query.field(
                Field::new(
                    table.list_field_name(),
                    TypeRef::named_nn(TypeRef::connection(type_name)),
                    move |ctx| DynResolver::resolve_list(table_id.clone(), ctx),
                )
                .connection_arguments(type_name),
            );

            let table_id = table.id.clone();
            query = query.field(
                Field::new(
                    &table.field_name,
                    TypeRef::named(TypeRef::node(type_name)),
                    move |ctx| DynResolver::resolve_by_id(table_id.clone(), ctx),
                )
                .by_id_arguments(),
            );
        }
        let query = query.service_field::<DynResolver>();

        debug!(
            "Registered {} tables of project {:?}",
            schema_type.tables.len(),
            schema_type.project
        );
        schema = schema.data(resolver);
        Self { schema, query, sdl }
    }

    pub fn limits(mut self, limits: &GraphQLLimitsConfig) -> Self {
        if let Some(max_depth) = limits.max_depth {
            self.schema = self.schema.limit_depth(max_depth);
        }
        if let Some(max_complexity) = limits.max_complexity {
            self.schema = self.schema.limit_complexity(max_complexity);
        }
        self
    }

    pub fn finish(self) -> DynSchemaResult<Schema> {
        let Self { schema, query, sdl } = self;
        let schema = schema.register(query).finish()?;
        let _ = sdl.set(schema.sdl());
        Ok(schema)
    }
}

fn data_field(field_type: &DynFieldType) -> Field {
    let resolver = field_type.resolver.clone();
    let mut field = Field::new(
        &field_type.name,
        TypeRef::from(&field_type.type_ref),
        move |ctx| DynResolver::resolve_field(resolver.clone(), ctx),
    );
    for arg in &field_type.args {
        let mut input = InputValue::new(&arg.name, TypeRef::from(&arg.type_ref));
        if let Some(description) = &arg.description {
            input = input.description(description);
        }
        field = field.argument(input);
    }
    field
}
