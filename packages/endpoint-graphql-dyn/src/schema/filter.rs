//! Builders for the filter, ordering and paging scaffolding of a project.

use super::schema_type::*;
use super::self_prelude::*;
use crate::store::{RowOrderField, SortOrder};

/// `{Type}WhereInput`: boolean composition plus one filter per system column.
pub fn where_input_type(prefix: &str, type_name: &str) -> DynInputType {
    let name = TypeRef::where_input(type_name);
    let string_filter = TypeRef::string_filter(prefix);
    let date_time_filter = TypeRef::date_time_filter(prefix);
    DynInputType::new(name.clone())
        .field("AND", DynTypeRef::named_nn_list(name.clone()))
        .field("OR", DynTypeRef::named_nn_list(name.clone()))
        .field("NOT", DynTypeRef::named_nn_list(name))
        .field("id", DynTypeRef::named(string_filter.clone()))
        .field("versionId", DynTypeRef::named(string_filter))
        .field("createdAt", DynTypeRef::named(date_time_filter.clone()))
        .field("publishedAt", DynTypeRef::named(date_time_filter.clone()))
        .field("updatedAt", DynTypeRef::named(date_time_filter))
        .field("readonly", DynTypeRef::named(TypeRef::bool_filter(prefix)))
        .field("data", DynTypeRef::named(TypeRef::json_filter(prefix)))
}

/// `{Type}OrderByInput`: one sortable system column with a direction.
pub fn order_by_input_type(prefix: &str, type_name: &str) -> DynInputType {
    DynInputType::new(TypeRef::order_by_input(type_name))
        .field("field", DynTypeRef::named_nn(TypeRef::order_by_field(prefix)))
        .field("direction", DynTypeRef::named_nn(TypeRef::sort_order(prefix)))
}

/// Column filters referenced by every `WhereInput` of a project.
pub fn shared_filter_inputs(prefix: &str) -> Vec<DynInputType> {
    let string_filter = [
        "equals",
        "in",
        "notIn",
        "lt",
        "lte",
        "gt",
        "gte",
        "contains",
        "startsWith",
        "endsWith",
        "not",
    ]
    .into_iter()
    .fold(
        DynInputType::new(TypeRef::string_filter(prefix)),
        |input, field| match field {
            "in" | "notIn" => input.field(field, DynTypeRef::named_nn_list(TypeRef::STRING)),
            _ => input.field(field, DynTypeRef::named(TypeRef::STRING)),
        },
    );

    let date_time_filter = ["equals", "in", "notIn", "lt", "lte", "gt", "gte"]
        .into_iter()
        .fold(
            DynInputType::new(TypeRef::date_time_filter(prefix)),
            |input, field| match field {
                "in" | "notIn" => {
                    input.field(field, DynTypeRef::named_nn_list(TypeRef::DATE_TIME))
                }
                _ => input.field(field, DynTypeRef::named(TypeRef::DATE_TIME)),
            },
        );

    let bool_filter = DynInputType::new(TypeRef::bool_filter(prefix))
        .field("equals", DynTypeRef::named(TypeRef::BOOLEAN))
        .field("not", DynTypeRef::named(TypeRef::BOOLEAN));

    let json_filter = DynInputType::new(TypeRef::json_filter(prefix))
        .field("path", DynTypeRef::named_nn_list(TypeRef::STRING))
        .field("equals", DynTypeRef::named(TypeRef::JSON))
        .field("stringContains", DynTypeRef::named(TypeRef::STRING))
        .field("stringStartsWith", DynTypeRef::named(TypeRef::STRING))
        .field("stringEndsWith", DynTypeRef::named(TypeRef::STRING))
        .field("arrayContains", DynTypeRef::named_nn_list(TypeRef::JSON))
        .field("lt", DynTypeRef::named(TypeRef::FLOAT))
        .field("lte", DynTypeRef::named(TypeRef::FLOAT))
        .field("gt", DynTypeRef::named(TypeRef::FLOAT))
        .field("gte", DynTypeRef::named(TypeRef::FLOAT));

    vec![string_filter, date_time_filter, bool_filter, json_filter]
}

pub fn shared_enums(prefix: &str) -> Vec<DynEnumType> {
    vec![
        DynEnumType {
            name: TypeRef::sort_order(prefix),
            items: SortOrder::ALL.iter().map(|o| o.as_str().to_string()).collect(),
        },
        DynEnumType {
            name: TypeRef::order_by_field(prefix),
            items: RowOrderField::ALL
                .iter()
                .map(|f| f.as_str().to_string())
                .collect(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_where_input_composes_itself() {
        let input = where_input_type("Blog", "BlogPost");
        assert_eq!(input.name, "BlogPostWhereInput");

        let keys: Vec<_> = input.fields.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec![
                "AND",
                "OR",
                "NOT",
                "id",
                "versionId",
                "createdAt",
                "publishedAt",
                "updatedAt",
                "readonly",
                "data"
            ]
        );
        for field in ["AND", "OR", "NOT"] {
            assert_eq!(input.fields[field].type_ref.to_string(), "[BlogPostWhereInput!]");
        }
    }

    #[test]
    fn test_order_by_is_restricted_to_sortable_columns() {
        let enums = shared_enums("Blog");
        assert_eq!(enums[0].name, "BlogSortOrder");
        assert_eq!(enums[0].items, vec!["asc", "desc"]);
        assert_eq!(enums[1].name, "BlogOrderByField");
        assert_eq!(
            enums[1].items,
            vec!["createdAt", "updatedAt", "publishedAt", "id"]
        );

        let input = order_by_input_type("Blog", "BlogPost");
        assert_eq!(input.fields["field"].type_ref.to_string(), "BlogOrderByField!");
        assert_eq!(input.fields["direction"].type_ref.to_string(), "BlogSortOrder!");
    }
}
