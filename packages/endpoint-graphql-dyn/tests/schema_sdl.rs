use assert_matches::*;
use endpoint_graphql_dyn::testing::prelude::*;
use insta::*;
use pretty_assertions::assert_eq;

#[test]
fn test_sdl_is_stable_across_builds() {
    let first = new_test_schema().unwrap();
    let second = new_test_schema().unwrap();
    assert_eq!(first.sdl(), second.sdl());
    assert_eq!(first.sdl(), first.schema().sdl());
}

#[test]
fn test_excluded_tables_stay_out_of_the_schema() {
    let schema = new_test_schema().unwrap();

    let excluded: Vec<_> = schema.excluded().iter().map(|table| table.id.as_str()).collect();
    assert_eq!(excluded, vec!["draft", "broken"]);
    assert_matches!(schema.excluded()[0].reason, ExclusionReason::Empty);
    assert_matches!(
        &schema.excluded()[1].reason,
        ExclusionReason::Failed(StoreError::Resolution { reference, .. }) if reference == "urn:missing"
    );

    let sdl = schema.schema().pretty_sdl().unwrap();
    assert!(!sdl.contains("BlogDraft"));
    assert!(!sdl.contains("BlogBroken"));
    assert!(sdl.contains("BlogUserNode"));
    assert!(sdl.contains("BlogPostNode"));
}

#[test]
fn test_table_data_types_follow_property_order() {
    let schema = new_test_schema().unwrap();
    let user = schema.schema().pretty_type("BlogUser").unwrap().unwrap();
    assert_snapshot!(user, @r###"
    type BlogUser {
      name: String!
      age: Float!
      active: Boolean!
    }
    "###);

    let meta = schema.schema().pretty_type("BlogPostMeta").unwrap().unwrap();
    assert_snapshot!(meta, @r###"
    type BlogPostMeta {
      tags: [String!]!
      rating: Float!
    }
    "###);
}

#[test]
fn test_foreign_keys_become_connections() {
    let schema = new_test_schema().unwrap();
    let post = schema.schema().pretty_type("BlogPost").unwrap().unwrap();

    assert!(post.contains("author: BlogUserConnection!"));
    assert!(post.contains("readers("));
    assert!(post.contains("where: BlogUserWhereInput"));
    assert!(post.contains("orderBy: [BlogUserOrderByInput!]"));
    assert!(post.contains("meta: BlogPostMeta!"));
    assert!(post.contains("cover: BlogFile"));
}

#[test]
fn test_root_query_has_list_by_id_and_service_fields() {
    let schema = new_test_schema().unwrap();
    let query = schema.schema().pretty_type("Query").unwrap().unwrap();

    assert!(query.contains("users("));
    assert!(query.contains("): BlogUserConnection!"));
    assert!(query.contains("user("));
    assert!(query.contains("id: String!"));
    assert!(query.contains("): BlogUserNode"));
    assert!(!query.contains("): BlogUserNode!"));
    assert!(query.contains("posts("));
    assert!(query.contains("): BlogPostNode"));
    assert!(query.contains("_service: _Service!"));
    assert!(!query.contains("draft"));
}

#[test]
fn test_where_inputs_compose_themselves() {
    let schema = new_test_schema().unwrap();
    let where_input = schema
        .schema()
        .pretty_type("BlogUserWhereInput")
        .unwrap()
        .unwrap();

    assert!(where_input.contains("AND: [BlogUserWhereInput!]"));
    assert!(where_input.contains("NOT: [BlogUserWhereInput!]"));
    assert!(where_input.contains("id: BlogStringFilter"));
    assert!(where_input.contains("data: BlogJsonFilter"));

    let order_field = schema
        .schema()
        .pretty_type("BlogOrderByField")
        .unwrap()
        .unwrap();
    assert!(order_field.contains("createdAt"));
    assert!(order_field.contains("id"));
}

#[test]
fn test_relation_to_missing_table_degrades_to_scalar() {
    let tables = vec![
        ConverterTable::new(
            "post",
            "post-v1",
            PlainSchema::object([("author", PlainSchema::foreign_key("user"))]),
        ),
        ConverterTable::new("user", "user-v1", PlainSchema::object::<&str, _>([])),
    ];
    let schema = new_test_converter()
        .build(&tables, std::sync::Arc::new(MemoryRowSource::default()))
        .unwrap();

    let post = schema.schema().pretty_type("BlogPost").unwrap().unwrap();
    assert!(post.contains("author: String!"));
    assert!(schema.schema().pretty_type("BlogUserConnection").unwrap().is_none());
}

#[test]
fn test_colliding_names_fail_the_whole_build() {
    let tables = vec![
        ConverterTable::new(
            "post",
            "post-v1",
            PlainSchema::object([
                ("first-name", PlainSchema::string()),
                ("first_name", PlainSchema::string()),
            ]),
        ),
        ConverterTable::new("user", "user-v1", PlainSchema::object([("a", PlainSchema::string())])),
    ];
    assert_matches!(
        new_test_converter().build(&tables, std::sync::Arc::new(MemoryRowSource::default())),
        Err(DynSchemaError::Naming(_))
    );
}

#[test]
fn test_tables_read_from_json_keep_property_order() {
    let tables: Vec<ConverterTable> = serde_json::from_value(serde_json::json!([{
        "id": "doc",
        "versionId": "doc-v1",
        "schema": {
            "type": "object",
            "required": ["zeta", "alpha", "mid"],
            "properties": {
                "zeta": { "type": "string", "default": "" },
                "alpha": { "type": "string", "default": "" },
                "mid": { "type": "number", "default": 0 }
            }
        }
    }]))
    .unwrap();
    let schema = new_test_converter()
        .build(&tables, std::sync::Arc::new(MemoryRowSource::default()))
        .unwrap();

    let doc = schema.schema().pretty_type("BlogDoc").unwrap().unwrap();
    assert_snapshot!(doc, @r###"
    type BlogDoc {
      zeta: String!
      alpha: String!
      mid: Float!
    }
    "###);
}

#[test]
fn test_reserved_names_do_not_break_the_build() {
    let tables = vec![
        ConverterTable::new(
            "post",
            "post-v1",
            PlainSchema::object([
                ("__meta", PlainSchema::string()),
                ("title", PlainSchema::string()),
            ]),
        ),
        ConverterTable::new("__x", "x-v1", PlainSchema::object([("a", PlainSchema::string())])),
    ];
    let schema = new_test_converter()
        .build(&tables, std::sync::Arc::new(MemoryRowSource::default()))
        .unwrap();

    let post = schema.schema().pretty_type("BlogPost").unwrap().unwrap();
    assert!(post.contains("field___meta: String!"));
    assert!(schema.schema().pretty_type("BlogTable___x").unwrap().is_some());

    let query = schema.schema().pretty_type("Query").unwrap().unwrap();
    assert!(query.contains("table___xes("));
    assert!(!query.contains(" __"));
}

#[test]
fn test_nested_type_next_to_same_named_table() {
    let tables = vec![
        ConverterTable::new(
            "post",
            "post-v1",
            PlainSchema::object([("meta", PlainSchema::object([("a", PlainSchema::string())]))]),
        ),
        ConverterTable::new(
            "postMeta",
            "post-meta-v1",
            PlainSchema::object([("b", PlainSchema::string())]),
        ),
    ];
    let schema = new_test_converter()
        .build(&tables, std::sync::Arc::new(MemoryRowSource::default()))
        .unwrap();

    let post = schema.schema().pretty_type("BlogPost").unwrap().unwrap();
    assert!(post.contains("meta: BlogPostMeta2!"));
    let post_meta = schema.schema().pretty_type("BlogPostMeta").unwrap().unwrap();
    assert!(post_meta.contains("b: String!"));
    assert!(schema.schema().pretty_type("BlogPostMetaNode").unwrap().is_some());
}
