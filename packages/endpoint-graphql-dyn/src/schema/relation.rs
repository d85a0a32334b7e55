//! Foreign-key properties surfaced as connections over the target table.

use super::context::*;
use super::error::*;
use super::handler::*;
use super::schema_type::*;
use super::self_prelude::*;

/// Shape a relation from the field at `site` to the rows of `target`.
///
/// Returns `None` when `target` is not part of the build, in which case the
/// caller falls back to a scalar.
pub fn build_relation(
    target: &str,
    many: bool,
    site: &FieldSite,
    ctx: &mut DynBuildContext,
) -> DynSchemaResult<Option<FieldContribution>> {
    let Some(table) = ctx.tables.get(target) else {
        debug!(
            "Foreign key {:?} of {} points at {target:?}, which is not in the schema",
            site.property, site.owner
        );
        return Ok(None);
    };
    let type_name = table.options.type_name.clone();

    let mut relation = FieldContribution {
        type_ref: DynTypeRef::named_nn(TypeRef::connection(&type_name)),
        resolver: Some(DynFieldResolver::Relation {
            property: site.property.clone(),
            target: target.to_string(),
            many,
        }),
        args: Vec::new(),
        aux_types: Vec::new(),
    };
    if !many {
        return Ok(Some(relation));
    }

    let where_input = ctx.where_input(&type_name)?;
    let order_by_input = ctx.order_by_input(&type_name)?;
    relation.args = vec![
        DynArgType {
            name: "first".to_string(),
            type_ref: DynTypeRef::named(TypeRef::INT),
            input: None,
            description: Some("Return the given amount of related rows at most.".to_string()),
        },
        DynArgType {
            name: "after".to_string(),
            type_ref: DynTypeRef::named(TypeRef::CURSOR),
            input: None,
            description: Some("Return related rows after the given cursor.".to_string()),
        },
        DynArgType {
            name: "where".to_string(),
            type_ref: DynTypeRef::named(&where_input.name),
            input: Some(where_input.clone()),
            description: Some("Only return related rows matching the filter.".to_string()),
        },
        DynArgType {
            name: "orderBy".to_string(),
            type_ref: DynTypeRef::named_nn_list(&order_by_input.name),
            input: Some(order_by_input.clone()),
            description: None,
        },
    ];
    relation.aux_types = vec![
        DynAuxType::Input(where_input),
        DynAuxType::Input(order_by_input),
    ];
    Ok(Some(relation))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::naming::{NameRegistry, TableTypeNames};
    use crate::store::{PlainSchema, RefRegistry, SchemaStore};
    use assert_matches::assert_matches;

    #[test]
    fn test_to_many_relations_share_filter_inputs() {
        let mut store = SchemaStore::new(RefRegistry::new());
        let root = store
            .parse(&PlainSchema::object([("name", PlainSchema::string())]))
            .unwrap();
        let type_names = TableTypeNames::new("user");
        let user = ValidTableType {
            id: "user".to_string(),
            field_name: "user".to_string(),
            options: ValidTableOptions {
                version_id: "user-v1".to_string(),
                type_name: "BlogUser".to_string(),
                root,
                data_type: DynTypeRef::named_nn("BlogUser"),
            },
            type_names,
        };
        let tables = IndexMap::from([("user".to_string(), user)]);
        let mut ctx = DynBuildContext::new("blog", "Blog", &store, &tables, NameRegistry::new());

        let site = |property: &str| FieldSite {
            property: property.to_string(),
            type_name: String::new(),
            owner: "table \"post\"".to_string(),
            relations: true,
            claimed: false,
        };
        let readers = build_relation("user", true, &site("readers"), &mut ctx)
            .unwrap()
            .unwrap();
        let editors = build_relation("user", true, &site("editors"), &mut ctx)
            .unwrap()
            .unwrap();
        assert_eq!(readers.type_ref.to_string(), "BlogUserConnection!");

        let readers_where = assert_matches!(&readers.args[2].input, Some(input) => input);
        let editors_where = assert_matches!(&editors.args[2].input, Some(input) => input);
        assert!(Arc::ptr_eq(readers_where, editors_where));

        let author = build_relation("user", false, &site("author"), &mut ctx)
            .unwrap()
            .unwrap();
        assert!(author.args.is_empty());
        assert_eq!(
            author.resolver,
            Some(DynFieldResolver::Relation {
                property: "author".to_string(),
                target: "user".to_string(),
                many: false,
            })
        );

        assert_matches!(build_relation("gone", false, &site("x"), &mut ctx), Ok(None));
    }
}
