use super::self_prelude::*;
use serde_json::Value as JsonValue;

pub const TEST_PROJECT: &str = "blog";

/// Users, posts pointing at users, and two tables that never make it into a
/// schema: one without any shape and one with a dangling `$ref`.
pub fn blog_tables() -> Vec<ConverterTable> {
    vec![
        ConverterTable::new(
            "user",
            "user-v1",
            PlainSchema::object([
                ("name", PlainSchema::string()),
                ("age", PlainSchema::number()),
                ("active", PlainSchema::boolean()),
            ]),
        ),
        ConverterTable::new(
            "post",
            "post-v1",
            PlainSchema::object([
                ("title", PlainSchema::string()),
                ("author", PlainSchema::foreign_key("user")),
                ("readers", PlainSchema::array(PlainSchema::foreign_key("user"))),
                (
                    "meta",
                    PlainSchema::object([
                        ("tags", PlainSchema::array(PlainSchema::string())),
                        ("rating", PlainSchema::number()),
                    ]),
                ),
                ("cover", PlainSchema::reference(FILE_SCHEMA)),
            ]),
        ),
        ConverterTable::new("draft", "draft-v1", PlainSchema::object::<&str, _>([])),
        ConverterTable::new(
            "broken",
            "broken-v1",
            PlainSchema::object([("file", PlainSchema::reference("urn:missing"))]),
        ),
    ]
}

/// A stored row with fixed system columns; `day` orders rows by time.
pub fn test_row(id: &str, day: u32, data: JsonValue) -> Row {
    let timestamp = format!("2024-01-{day:02}T00:00:00.000Z");
    Row {
        id: id.to_string(),
        version_id: format!("{id}-version"),
        created_id: format!("{id}-created"),
        created_at: timestamp.clone(),
        updated_at: timestamp.clone(),
        published_at: timestamp,
        readonly: false,
        data,
    }
}

pub fn blog_rows() -> IndexMap<String, Vec<Row>> {
    IndexMap::from([
        (
            "user".to_string(),
            vec![
                test_row("u1", 1, json!({ "name": "Ada", "age": 36, "active": true })),
                test_row("u2", 2, json!({ "name": "Linus", "age": 28, "active": false })),
                test_row("u3", 3, json!({ "name": "Grace", "age": 45 })),
            ],
        ),
        (
            "post".to_string(),
            vec![
                test_row(
                    "p1",
                    4,
                    json!({
                        "title": "Hello",
                        "author": "u1",
                        "readers": ["u2", "u3"],
                        "meta": { "tags": ["intro", "news"], "rating": 4.5 }
                    }),
                ),
                test_row("p2", 5, json!({ "title": "Second", "author": "u9" })),
            ],
        ),
    ])
}
