//! `async_graphql::dynamic` extensions for the root query.

use super::self_prelude::*;

#[extension_trait]
pub impl QueryTypeRef for TypeRef {
    const QUERY: &'static str = "Query";
    const SERVICE: &'static str = "_Service";
}

#[extension_trait]
pub impl QueryObject for Object {
    fn new_query() -> Self {
        Self::new(TypeRef::QUERY)
    }

    /// Expose the printed SDL of the schema under `_service { sdl }`.
    fn service_field<Resolver: ServiceResolver>(self) -> Self {
        self.field(Field::new(
            "_service",
            TypeRef::named_nn(TypeRef::SERVICE),
            Resolver::resolve_service,
        ))
    }
}

#[extension_trait]
pub impl ServiceObject for Object {
    fn new_service<Resolver: ServiceResolver>() -> Self {
        Self::new(TypeRef::SERVICE).field(Field::new(
            "sdl",
            TypeRef::named_nn(TypeRef::STRING),
            Resolver::resolve_sdl,
        ))
    }
}

pub trait ServiceResolver: Send + Sync + 'static {
    fn resolve_service(ctx: ResolverContext) -> FieldFuture;
    fn resolve_sdl(ctx: ResolverContext) -> FieldFuture;
}

#[extension_trait]
pub impl QueryField for Field {
    /// Add the identifying argument of a by-id root field.
    fn by_id_arguments(self) -> Self {
        self.argument(
            InputValue::new("id", TypeRef::named_nn(TypeRef::STRING))
                .description("ID of the row."),
        )
    }
}
