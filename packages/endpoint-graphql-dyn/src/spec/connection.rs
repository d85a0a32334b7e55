//! `async_graphql::dynamic` extensions for handling GraphQL connections.
//! See: https://graphql.org/learn/pagination/#end-of-list-counts-and-connections
//! See: https://relay.dev/graphql/connections.htm#sec-Connection-Types

use super::filter::*;
use super::node::*;
use super::paging::*;
use super::self_prelude::*;

#[extension_trait]
pub impl ConnectionTypeRef for TypeRef {
    fn connection(type_name: &str) -> String {
        format!("{type_name}Connection")
    }
    fn connection_edge(type_name: &str) -> String {
        format!("{type_name}Edge")
    }
}

#[extension_trait]
pub impl ConnectionObject for Object {
    fn new_connection<Resolver: ConnectionResolver>(type_name: &str, prefix: &str) -> Self {
        Self::new(TypeRef::connection(type_name))
            .field(Field::new(
                "edges",
                TypeRef::named_nn_list_nn(TypeRef::connection_edge(type_name)),
                Resolver::resolve_edges,
            ))
            .field(Field::new(
                "pageInfo",
                TypeRef::named_nn(TypeRef::page_info(prefix)),
                Resolver::resolve_page_info,
            ))
            .field(Field::new(
                "totalCount",
                TypeRef::named_nn(TypeRef::INT),
                Resolver::resolve_total_count,
            ))
    }

    fn new_connection_edge<Resolver: ConnectionEdgeResolver>(type_name: &str) -> Self {
        Self::new(TypeRef::connection_edge(type_name))
            .field(Field::new(
                "node",
                TypeRef::named_nn(TypeRef::node(type_name)),
                Resolver::resolve_node,
            ))
            .field(Field::new(
                "cursor",
                TypeRef::named_nn(TypeRef::CURSOR),
                Resolver::resolve_cursor,
            ))
    }
}

pub trait ConnectionResolver: Send + Sync + 'static {
    fn resolve_edges(ctx: ResolverContext) -> FieldFuture;
    fn resolve_page_info(ctx: ResolverContext) -> FieldFuture;
    fn resolve_total_count(ctx: ResolverContext) -> FieldFuture;
}

pub trait ConnectionEdgeResolver: Send + Sync + 'static {
    fn resolve_node(ctx: ResolverContext) -> FieldFuture;
    fn resolve_cursor(ctx: ResolverContext) -> FieldFuture;
}

#[extension_trait]
pub impl ConnectionField for Field {
    /// Add paging, filter and ordering arguments to a field.
    /// See: https://relay.dev/graphql/connections.htm#sec-Arguments
    fn connection_arguments(self, type_name: &str) -> Self {
        self.forward_pagination_arguments().filter_arguments(type_name)
    }
}
