use super::self_prelude::*;
use super::source::*;
use super::tables::*;
use crate::schema::*;
use async_graphql::dynamic::Schema;
use graphql_parser::schema::{parse_schema, Definition, TypeDefinition};
use graphql_parser::Style;

pub trait TestSchema {
    fn pretty_sdl(&self) -> anyhow::Result<String>;
    /// One type definition of the printed schema, formatted on its own.
    fn pretty_type(&self, name: &str) -> anyhow::Result<Option<String>>;
}

impl TestSchema for Schema {
    fn pretty_sdl(&self) -> anyhow::Result<String> {
        let sdl = self.sdl();
        let document = parse_schema::<&str>(&sdl)?;
        Ok(document.format(&Style::default()))
    }

    fn pretty_type(&self, name: &str) -> anyhow::Result<Option<String>> {
        let sdl = self.sdl();
        let document = parse_schema::<&str>(&sdl)?;
        let found = document.definitions.iter().find_map(|definition| {
            let Definition::TypeDefinition(type_definition) = definition else {
                return None;
            };
            let type_name = match type_definition {
                TypeDefinition::Scalar(scalar) => scalar.name,
                TypeDefinition::Object(object) => object.name,
                TypeDefinition::Interface(interface) => interface.name,
                TypeDefinition::Union(union) => union.name,
                TypeDefinition::Enum(r#enum) => r#enum.name,
                TypeDefinition::InputObject(input) => input.name,
            };
            (type_name == name).then(|| type_definition.to_string())
        });
        Ok(found)
    }
}

pub fn new_test_converter() -> Converter {
    Converter::new(TEST_PROJECT, RefRegistry::with_system_schemas())
}

/// The blog schema, served from [`blog_rows`].
pub fn new_test_schema() -> DynSchemaResult<ConvertedSchema> {
    new_test_converter().build(&blog_tables(), Arc::new(MemoryRowSource::new(blog_rows())))
}
