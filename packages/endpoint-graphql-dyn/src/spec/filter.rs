//! `async_graphql::dynamic` extensions for filtering and ordering lists.

use super::self_prelude::*;

#[extension_trait]
pub impl FilterTypeRef for TypeRef {
    fn where_input(type_name: &str) -> String {
        format!("{type_name}WhereInput")
    }
    fn order_by_input(type_name: &str) -> String {
        format!("{type_name}OrderByInput")
    }
    fn order_by_field(prefix: &str) -> String {
        format!("{prefix}OrderByField")
    }
    fn sort_order(prefix: &str) -> String {
        format!("{prefix}SortOrder")
    }
    fn string_filter(prefix: &str) -> String {
        format!("{prefix}StringFilter")
    }
    fn date_time_filter(prefix: &str) -> String {
        format!("{prefix}DateTimeFilter")
    }
    fn bool_filter(prefix: &str) -> String {
        format!("{prefix}BoolFilter")
    }
    fn json_filter(prefix: &str) -> String {
        format!("{prefix}JsonFilter")
    }
}

#[extension_trait]
pub impl FilterField for Field {
    fn filter_arguments(self, type_name: &str) -> Self {
        self.argument(
            InputValue::new("where", TypeRef::named(TypeRef::where_input(type_name)))
                .description("Only return rows matching the filter."),
        )
        .argument(
            InputValue::new(
                "orderBy",
                TypeRef::named_nn_list(TypeRef::order_by_input(type_name)),
            )
            .description("Sort rows by the given fields, in order."),
        )
    }
}
