use super::plain::*;
use super::refs::*;
use super::self_prelude::*;
use endpoint_graphql_lib::{config::EndpointConfigResult, utils::load_document};
use std::path::Path;

/// One table of a build batch.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConverterTable {
    pub id: String,
    pub version_id: String,
    pub schema: PlainSchema,
}

impl ConverterTable {
    pub fn new(
        id: impl Into<String>,
        version_id: impl Into<String>,
        schema: PlainSchema,
    ) -> Self {
        Self {
            id: id.into(),
            version_id: version_id.into(),
            schema,
        }
    }
}

/// Read a table batch from a JSON or YAML file.
pub fn load_tables(path: impl AsRef<Path>) -> EndpointConfigResult<Vec<ConverterTable>> {
    load_document(path)
}

/// Read extra ref schemas (`id -> { name?, schema }`) from a JSON or YAML file.
pub fn load_refs(
    path: impl AsRef<Path>,
) -> EndpointConfigResult<IndexMap<String, RefSchemaEntry>> {
    load_document(path)
}
