//! `async_graphql::dynamic` extensions for row nodes: the stored row with its
//! system columns around the table's own data.

use super::self_prelude::*;

#[extension_trait]
pub impl NodeTypeRef for TypeRef {
    const DATE_TIME: &'static str = "DateTime";
    const JSON: &'static str = "JSON";

    fn node(type_name: &str) -> String {
        format!("{type_name}Node")
    }
}

#[extension_trait]
pub impl NodeObject for Object {
    fn new_node<Resolver: NodeResolver>(type_name: &str, data: TypeRef) -> Self {
        Self::new(TypeRef::node(type_name))
            .field(Field::new(
                "id",
                TypeRef::named_nn(TypeRef::STRING),
                Resolver::resolve_id,
            ))
            .field(Field::new(
                "versionId",
                TypeRef::named_nn(TypeRef::STRING),
                Resolver::resolve_version_id,
            ))
            .field(Field::new(
                "createdId",
                TypeRef::named_nn(TypeRef::STRING),
                Resolver::resolve_created_id,
            ))
            .field(Field::new(
                "createdAt",
                TypeRef::named_nn(TypeRef::DATE_TIME),
                Resolver::resolve_created_at,
            ))
            .field(Field::new(
                "updatedAt",
                TypeRef::named_nn(TypeRef::DATE_TIME),
                Resolver::resolve_updated_at,
            ))
            .field(Field::new(
                "publishedAt",
                TypeRef::named_nn(TypeRef::DATE_TIME),
                Resolver::resolve_published_at,
            ))
            .field(Field::new(
                "readonly",
                TypeRef::named_nn(TypeRef::BOOLEAN),
                Resolver::resolve_readonly,
            ))
            .field(Field::new("data", data, Resolver::resolve_data))
    }
}

pub trait NodeResolver: Send + Sync + 'static {
    fn resolve_id(ctx: ResolverContext) -> FieldFuture;
    fn resolve_version_id(ctx: ResolverContext) -> FieldFuture;
    fn resolve_created_id(ctx: ResolverContext) -> FieldFuture;
    fn resolve_created_at(ctx: ResolverContext) -> FieldFuture;
    fn resolve_updated_at(ctx: ResolverContext) -> FieldFuture;
    fn resolve_published_at(ctx: ResolverContext) -> FieldFuture;
    fn resolve_readonly(ctx: ResolverContext) -> FieldFuture;
    fn resolve_data(ctx: ResolverContext) -> FieldFuture;
}
