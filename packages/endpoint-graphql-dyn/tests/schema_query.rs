use async_graphql::Request;
use endpoint_graphql_dyn::testing::prelude::*;
use pretty_assertions::assert_eq;
use serde_json::{json, Value as JsonValue};

async fn execute(query: &str) -> JsonValue {
    let schema = new_test_schema().unwrap();
    let response = schema.execute(Request::new(query)).await;
    assert!(response.errors.is_empty(), "{:?}", response.errors);
    response.data.into_json().unwrap()
}

#[tokio::test]
async fn test_list_field_pages_through_rows() {
    let data = execute(
        r#"
        query {
            users(first: 2) {
                totalCount
                pageInfo { startCursor endCursor hasNextPage hasPreviousPage }
                edges {
                    cursor
                    node { id versionId createdAt data { name age active } }
                }
            }
        }
        "#,
    )
    .await;

    assert_eq!(
        data,
        json!({
            "users": {
                "totalCount": 3,
                "pageInfo": {
                    "startCursor": "u1",
                    "endCursor": "u2",
                    "hasNextPage": true,
                    "hasPreviousPage": false
                },
                "edges": [
                    {
                        "cursor": "u1",
                        "node": {
                            "id": "u1",
                            "versionId": "u1-version",
                            "createdAt": "2024-01-01T00:00:00.000Z",
                            "data": { "name": "Ada", "age": 36.0, "active": true }
                        }
                    },
                    {
                        "cursor": "u2",
                        "node": {
                            "id": "u2",
                            "versionId": "u2-version",
                            "createdAt": "2024-01-02T00:00:00.000Z",
                            "data": { "name": "Linus", "age": 28.0, "active": false }
                        }
                    }
                ]
            }
        })
    );
}

#[tokio::test]
async fn test_after_cursor_continues_the_list() {
    let data = execute(
        r#"
        query {
            users(first: 1, after: "u1") {
                pageInfo { hasNextPage hasPreviousPage }
                edges { node { id } }
            }
        }
        "#,
    )
    .await;

    assert_eq!(
        data,
        json!({
            "users": {
                "pageInfo": { "hasNextPage": true, "hasPreviousPage": true },
                "edges": [{ "node": { "id": "u2" } }]
            }
        })
    );
}

#[tokio::test]
async fn test_by_id_field_returns_null_for_missing_rows() {
    let data = execute(
        r#"
        query {
            user(id: "u3") { id data { name active } }
            missing: user(id: "nope") { id }
        }
        "#,
    )
    .await;

    assert_eq!(
        data,
        json!({
            "user": { "id": "u3", "data": { "name": "Grace", "active": false } },
            "missing": null
        })
    );
}

#[tokio::test]
async fn test_relations_follow_foreign_keys() {
    let data = execute(
        r#"
        query {
            post(id: "p1") {
                data {
                    title
                    author {
                        totalCount
                        edges { node { id data { name } } }
                    }
                    readers(first: 1) {
                        totalCount
                        pageInfo { hasNextPage endCursor }
                        edges { node { id } }
                    }
                    meta { tags rating }
                }
            }
        }
        "#,
    )
    .await;

    assert_eq!(
        data,
        json!({
            "post": {
                "data": {
                    "title": "Hello",
                    "author": {
                        "totalCount": 1,
                        "edges": [{ "node": { "id": "u1", "data": { "name": "Ada" } } }]
                    },
                    "readers": {
                        "totalCount": 2,
                        "pageInfo": { "hasNextPage": true, "endCursor": "u2" },
                        "edges": [{ "node": { "id": "u2" } }]
                    },
                    "meta": { "tags": ["intro", "news"], "rating": 4.5 }
                }
            }
        })
    );
}

#[tokio::test]
async fn test_absent_values_fall_back_to_defaults() {
    let data = execute(
        r#"
        query {
            post(id: "p2") {
                data {
                    author { totalCount edges { cursor } }
                    readers { totalCount }
                    meta { tags rating }
                }
            }
        }
        "#,
    )
    .await;

    assert_eq!(
        data,
        json!({
            "post": {
                "data": {
                    "author": { "totalCount": 0, "edges": [] },
                    "readers": { "totalCount": 0 },
                    "meta": { "tags": [], "rating": 0.0 }
                }
            }
        })
    );
}

#[tokio::test]
async fn test_where_and_order_by_arguments() {
    let data = execute(
        r#"
        query {
            users(
                where: { id: { in: ["u1", "u3"] } }
                orderBy: [{ field: id, direction: desc }]
            ) {
                edges { node { id } }
            }
            active: users(where: { data: { path: ["active"], equals: true } }) {
                totalCount
                edges { node { id } }
            }
        }
        "#,
    )
    .await;

    assert_eq!(
        data,
        json!({
            "users": { "edges": [{ "node": { "id": "u3" } }, { "node": { "id": "u1" } }] },
            "active": { "totalCount": 1, "edges": [{ "node": { "id": "u1" } }] }
        })
    );
}

#[tokio::test]
async fn test_service_field_prints_the_schema() {
    let schema = new_test_schema().unwrap();
    let response = schema.execute("query { _service { sdl } }").await;
    assert!(response.errors.is_empty(), "{:?}", response.errors);

    let data = response.data.into_json().unwrap();
    assert_eq!(data["_service"]["sdl"], json!(schema.sdl()));
}

#[tokio::test]
async fn test_bad_cursor_is_reported_as_field_error() {
    let schema = new_test_schema().unwrap();
    let response = schema
        .execute(r#"query { users(after: "gone") { totalCount } }"#)
        .await;

    assert_eq!(response.errors.len(), 1);
    assert!(response.errors[0].message.contains("Invalid cursor"));
}
