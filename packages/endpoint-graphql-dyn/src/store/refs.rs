//! Registry of named schemas reachable through `$ref`.

use super::plain::*;
use super::self_prelude::*;
use crate::naming::safe_name;

pub const ROW_ID_SCHEMA: &str = "urn:jsonschema:io:revisium:row-id-schema:1.0.0";
pub const ROW_CREATED_ID_SCHEMA: &str =
    "urn:jsonschema:io:revisium:row-created-id-schema:1.0.0";
pub const ROW_VERSION_ID_SCHEMA: &str =
    "urn:jsonschema:io:revisium:row-version-id-schema:1.0.0";
pub const ROW_CREATED_AT_SCHEMA: &str =
    "urn:jsonschema:io:revisium:row-created-at-schema:1.0.0";
pub const ROW_PUBLISHED_AT_SCHEMA: &str =
    "urn:jsonschema:io:revisium:row-published-at-schema:1.0.0";
pub const ROW_UPDATED_AT_SCHEMA: &str =
    "urn:jsonschema:io:revisium:row-updated-at-schema:1.0.0";
pub const ROW_HASH_SCHEMA: &str = "urn:jsonschema:io:revisium:row-hash-schema:1.0.0";
pub const FILE_SCHEMA: &str = "urn:jsonschema:io:revisium:file-schema:1.0.0";

/// A schema registered under a well-known id.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RefSchema {
    /// Base name of the shared GraphQL type synthesized for this schema.
    pub name: String,
    pub schema: PlainSchema,
}

/// Mapping from ref id to its schema, supplied before parsing.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RefRegistry {
    entries: IndexMap<String, RefSchema>,
}

/// On-disk shape of a ref registry file; `name` is optional there.
#[derive(Clone, Debug, Deserialize)]
pub struct RefSchemaEntry {
    #[serde(default)]
    pub name: Option<String>,
    pub schema: PlainSchema,
}

impl RefRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry pre-populated with the row system schemas and the file schema.
    pub fn with_system_schemas() -> Self {
        let mut registry = Self::new();
        registry.register_named(ROW_ID_SCHEMA, "RowId", PlainSchema::read_only_string());
        registry.register_named(
            ROW_CREATED_ID_SCHEMA,
            "RowCreatedId",
            PlainSchema::read_only_string(),
        );
        registry.register_named(
            ROW_VERSION_ID_SCHEMA,
            "RowVersionId",
            PlainSchema::read_only_string(),
        );
        registry.register_named(
            ROW_CREATED_AT_SCHEMA,
            "RowCreatedAt",
            PlainSchema::read_only_string(),
        );
        registry.register_named(
            ROW_PUBLISHED_AT_SCHEMA,
            "RowPublishedAt",
            PlainSchema::read_only_string(),
        );
        registry.register_named(
            ROW_UPDATED_AT_SCHEMA,
            "RowUpdatedAt",
            PlainSchema::read_only_string(),
        );
        registry.register_named(ROW_HASH_SCHEMA, "RowHash", PlainSchema::read_only_string());
        registry.register_named(FILE_SCHEMA, "File", file_schema());
        registry
    }

    /// Register a schema, deriving its type name from the id.
    pub fn register(&mut self, id: impl Into<String>, schema: PlainSchema) -> &mut Self {
        let id = id.into();
        let name = default_ref_name(&id);
        self.register_named(id, name, schema)
    }

    pub fn register_named(
        &mut self,
        id: impl Into<String>,
        name: impl Into<String>,
        schema: PlainSchema,
    ) -> &mut Self {
        self.entries.insert(
            id.into(),
            RefSchema {
                name: name.into(),
                schema,
            },
        );
        self
    }

    /// Merge entries loaded from a registry file.
    pub fn extend(&mut self, entries: IndexMap<String, RefSchemaEntry>) -> &mut Self {
        for (id, entry) in entries {
            match entry.name {
                Some(name) => self.register_named(id, name, entry.schema),
                None => self.register(id, entry.schema),
            };
        }
        self
    }

    pub fn get(&self, id: &str) -> Option<&RefSchema> {
        self.entries.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &RefSchema)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Last meaningful segment of an id (`urn:...:file-schema:1.0.0` -> `file-schema`).
fn default_ref_name(id: &str) -> String {
    let segment = id
        .split([':', '/', '#'])
        .filter(|segment| !segment.is_empty())
        .filter(|segment| !segment.chars().all(|c| c.is_ascii_digit() || c == '.'))
        .last()
        .unwrap_or(id);
    safe_name(segment, "ref")
}

fn file_schema() -> PlainSchema {
    PlainSchema::object([
        ("status", PlainSchema::read_only_string()),
        ("fileId", PlainSchema::read_only_string()),
        ("url", PlainSchema::read_only_string()),
        ("fileName", PlainSchema::string()),
        ("hash", PlainSchema::read_only_string()),
        ("extension", PlainSchema::read_only_string()),
        ("mimeType", PlainSchema::read_only_string()),
        ("size", PlainSchema::number()),
        ("width", PlainSchema::number()),
        ("height", PlainSchema::number()),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ref_name() {
        assert_eq!(default_ref_name(FILE_SCHEMA), "file_schema");
        assert_eq!(default_ref_name("#/definitions/address"), "address");
        assert_eq!(default_ref_name("1.0.0"), "ref_1_0_0");
    }

    #[test]
    fn test_system_schemas_are_registered() {
        let registry = RefRegistry::with_system_schemas();
        assert!(registry.contains(ROW_ID_SCHEMA));
        assert_eq!(registry.get(FILE_SCHEMA).map(|r| r.name.as_str()), Some("File"));
        assert_eq!(registry.len(), 8);
    }
}
