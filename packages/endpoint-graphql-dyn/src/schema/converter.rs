use super::error::*;
use super::schema_builder::*;
use super::schema_type::*;
use super::schema_type_builder::*;
use super::self_prelude::*;
use endpoint_graphql_lib::config::{ConverterConfig, EndpointConfigResult, GraphQLLimitsConfig};
use store::{load_refs, ConverterTable, RefRegistry, RowSource};

/// An executable schema together with what it was built from.
pub struct ConvertedSchema {
    schema: Schema,
    schema_type: Arc<DynSchemaType>,
    sdl: String,
}

impl ConvertedSchema {
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn schema_type(&self) -> &DynSchemaType {
        &self.schema_type
    }

    pub fn sdl(&self) -> &str {
        &self.sdl
    }

    pub fn project(&self) -> &str {
        &self.schema_type.project
    }

    /// Tables left out of this schema, with the reason.
    pub fn excluded(&self) -> &[ExcludedTable] {
        &self.schema_type.excluded
    }

    pub async fn execute(
        &self,
        request: impl Into<async_graphql::Request>,
    ) -> async_graphql::Response {
        self.schema.execute(request.into()).await
    }
}

impl fmt::Debug for ConvertedSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConvertedSchema")
            .field("project", &self.schema_type.project)
            .field("tables", &self.schema_type.tables.keys().collect::<Vec<_>>())
            .field("excluded", &self.schema_type.excluded)
            .finish()
    }
}

/// Entry point of a conversion: tables in, executable schema out.
#[derive(Clone, Debug)]
pub struct Converter {
    builder: DynSchemaTypeBuilder,
    limits: GraphQLLimitsConfig,
}

impl Converter {
    pub fn new(project: impl Into<String>, refs: RefRegistry) -> Self {
        Self {
            builder: DynSchemaTypeBuilder::new(project, refs),
            limits: GraphQLLimitsConfig::default(),
        }
    }

    /// Converter for `config`, with its ref schema files loaded.
    pub fn from_config(config: &ConverterConfig) -> EndpointConfigResult<Self> {
        let mut refs = match config.system_schemas {
            true => RefRegistry::with_system_schemas(),
            false => RefRegistry::new(),
        };
        for path in &config.refs {
            refs.extend(load_refs(path)?);
        }
        debug!("Loaded {} ref schemas", refs.len());

        Ok(Self::new(&config.project, refs).with_limits(config.graphql_limits.clone()))
    }

    pub fn with_limits(mut self, limits: GraphQLLimitsConfig) -> Self {
        self.limits = limits;
        self
    }

    pub fn prefix(&self) -> &str {
        self.builder.prefix()
    }

    pub fn build_schema_type(&self, tables: &[ConverterTable]) -> DynSchemaResult<DynSchemaType> {
        self.builder.build(tables)
    }

    pub fn build(
        &self,
        tables: &[ConverterTable],
        source: Arc<dyn RowSource>,
    ) -> DynSchemaResult<ConvertedSchema> {
        let schema_type = Arc::new(self.build_schema_type(tables)?);
        for table in &schema_type.excluded {
            info!("Table {:?} excluded: {}", table.id, table.reason);
        }

        let schema = DynSchemaBuilder::new(schema_type.clone(), source)
            .limits(&self.limits)
            .finish()?;
        let sdl = schema.sdl();
        Ok(ConvertedSchema {
            schema,
            schema_type,
            sdl,
        })
    }
}
