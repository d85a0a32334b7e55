//! Plain (serialized) schema model exchanged at the system boundary.

use super::self_prelude::*;

/// A structural schema tree as persisted by the row-storage service.
///
/// Either a `{ "$ref": id }` indirection or a `"type"`-tagged shape. Keys that
/// carry no shape (`additionalProperties`, `title`, ...) are ignored.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PlainSchema {
    Ref(PlainRefSchema),
    Typed(PlainTypedSchema),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlainRefSchema {
    #[serde(rename = "$ref")]
    pub reference: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PlainTypedSchema {
    Object {
        #[serde(default)]
        required: Vec<String>,
        #[serde(default)]
        properties: IndexMap<String, PlainSchema>,
    },
    Array {
        items: Box<PlainSchema>,
    },
    String {
        #[serde(default)]
        default: String,
        #[serde(
            rename = "foreignKey",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        foreign_key: Option<String>,
        #[serde(
            rename = "readOnly",
            default,
            skip_serializing_if = "std::ops::Not::not"
        )]
        read_only: bool,
    },
    Number {
        #[serde(default)]
        default: f64,
        #[serde(
            rename = "readOnly",
            default,
            skip_serializing_if = "std::ops::Not::not"
        )]
        read_only: bool,
    },
    Boolean {
        #[serde(default)]
        default: bool,
        #[serde(
            rename = "readOnly",
            default,
            skip_serializing_if = "std::ops::Not::not"
        )]
        read_only: bool,
    },
}

impl PlainSchema {
    pub fn reference(id: impl Into<String>) -> Self {
        Self::Ref(PlainRefSchema {
            reference: id.into(),
        })
    }

    pub fn object<K, I>(properties: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, PlainSchema)>,
    {
        let properties: IndexMap<String, PlainSchema> = properties
            .into_iter()
            .map(|(name, schema)| (name.into(), schema))
            .collect();
        Self::Typed(PlainTypedSchema::Object {
            required: properties.keys().cloned().collect(),
            properties,
        })
    }

    pub fn array(items: PlainSchema) -> Self {
        Self::Typed(PlainTypedSchema::Array {
            items: Box::new(items),
        })
    }

    pub fn string() -> Self {
        Self::Typed(PlainTypedSchema::String {
            default: String::new(),
            foreign_key: None,
            read_only: false,
        })
    }

    pub fn foreign_key(table_id: impl Into<String>) -> Self {
        Self::Typed(PlainTypedSchema::String {
            default: String::new(),
            foreign_key: Some(table_id.into()),
            read_only: false,
        })
    }

    pub fn read_only_string() -> Self {
        Self::Typed(PlainTypedSchema::String {
            default: String::new(),
            foreign_key: None,
            read_only: true,
        })
    }

    pub fn number() -> Self {
        Self::Typed(PlainTypedSchema::Number {
            default: 0.0,
            read_only: false,
        })
    }

    pub fn boolean() -> Self {
        Self::Typed(PlainTypedSchema::Boolean {
            default: false,
            read_only: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    #[test]
    fn test_deserialize_keeps_property_order() {
        let schema: PlainSchema = serde_json::from_value(json!({
            "type": "object",
            "additionalProperties": false,
            "required": ["title", "author", "tags"],
            "properties": {
                "title": { "type": "string", "default": "" },
                "author": { "type": "string", "default": "", "foreignKey": "users" },
                "tags": { "type": "array", "items": { "type": "string", "default": "" } },
            }
        }))
        .unwrap();

        assert_matches!(&schema, PlainSchema::Typed(PlainTypedSchema::Object { properties, .. }) => {
            let keys: Vec<_> = properties.keys().map(String::as_str).collect();
            assert_eq!(keys, vec!["title", "author", "tags"]);
            assert_matches!(
                properties.get("author"),
                Some(PlainSchema::Typed(PlainTypedSchema::String { foreign_key: Some(fk), .. })) if fk == "users"
            );
        });
    }

    #[test]
    fn test_ref_takes_precedence() {
        let schema: PlainSchema =
            serde_json::from_value(json!({ "$ref": "file-schema" })).unwrap();
        assert_eq!(schema, PlainSchema::reference("file-schema"));
    }

    #[test]
    fn test_primitive_defaults() {
        let schema: PlainSchema = serde_json::from_value(json!({ "type": "number" })).unwrap();
        assert_eq!(schema, PlainSchema::number());

        let schema: PlainSchema =
            serde_json::from_value(json!({ "type": "boolean", "default": true })).unwrap();
        assert_matches!(
            schema,
            PlainSchema::Typed(PlainTypedSchema::Boolean { default: true, .. })
        );
    }
}
