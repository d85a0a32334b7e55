//! `async_graphql::dynamic` extensions for handling pagination.
//! See: https://graphql.org/learn/pagination/

use super::self_prelude::*;

pub type Cursor = String;

#[extension_trait]
pub impl PagingTypeRef for TypeRef {
    const CURSOR: &'static str = "String";

    fn page_info(prefix: &str) -> String {
        format!("{prefix}PageInfo")
    }
}

#[extension_trait]
pub impl PagingField for Field {
    /// Add forward pagination arguments to a field.
    /// See: https://relay.dev/graphql/connections.htm#sec-Forward-pagination-arguments
    fn forward_pagination_arguments(self) -> Self {
        self.argument(
            InputValue::new("first", TypeRef::named(TypeRef::INT)).description(
                "Paginate forward, returning the given amount of edges at most.",
            ),
        )
        .argument(
            InputValue::new("after", TypeRef::named(TypeRef::CURSOR))
                .description("Return edges after the given cursor."),
        )
    }
}

/// See: https://relay.dev/graphql/connections.htm#sec-PageInfo
#[extension_trait]
pub impl PageInfoObject for Object {
    fn new_page_info<Resolver: PageInfoResolver>(prefix: &str) -> Self {
        Self::new(TypeRef::page_info(prefix))
            .field(Field::new(
                "startCursor",
                TypeRef::named(TypeRef::CURSOR),
                Resolver::resolve_start_cursor,
            ))
            .field(Field::new(
                "endCursor",
                TypeRef::named(TypeRef::CURSOR),
                Resolver::resolve_end_cursor,
            ))
            .field(Field::new(
                "hasNextPage",
                TypeRef::named_nn(TypeRef::BOOLEAN),
                Resolver::resolve_has_next_page,
            ))
            .field(Field::new(
                "hasPreviousPage",
                TypeRef::named_nn(TypeRef::BOOLEAN),
                Resolver::resolve_has_previous_page,
            ))
    }
}

pub trait PageInfoResolver: Send + Sync + 'static {
    fn resolve_start_cursor(ctx: ResolverContext) -> FieldFuture;
    fn resolve_end_cursor(ctx: ResolverContext) -> FieldFuture;
    fn resolve_has_next_page(ctx: ResolverContext) -> FieldFuture;
    fn resolve_has_previous_page(ctx: ResolverContext) -> FieldFuture;
}
