use super::connection::*;
use super::loader::*;
use super::node::*;
use super::paging::*;
use super::resolver_context::*;
use super::schema_type::*;
use super::self_prelude::*;
use async_graphql::Value;
use std::sync::OnceLock;
use store::{RowQuery, RowSource, ValueKind, ValueNode};

/// Query-time half of a generated schema, registered as schema data.
pub struct DynResolver {
    schema_type: Arc<DynSchemaType>,
    loader: DynLoader,
    sdl: Arc<OnceLock<String>>,
}

#[derive(thiserror::Error, Debug)]
pub enum DynResolverError {
    #[error(transparent)]
    ResolverContext(#[from] DynResolverContextError),
    #[error(transparent)]
    Loader(#[from] DynLoaderError),
    #[error("Table {0:?} is not part of the schema")]
    UnknownTable(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type DynResolverResult<T> = Result<T, DynResolverError>;

/// Marker parent of the `_service` object.
#[derive(Clone, Copy, Debug)]
pub struct DynService;

impl DynResolver {
    pub fn new(schema_type: Arc<DynSchemaType>, source: Arc<dyn RowSource>) -> Self {
        let loader = DynLoader::new(&schema_type, source);
        Self {
            schema_type,
            loader,
            sdl: Arc::new(OnceLock::new()),
        }
    }

    pub fn schema_type(&self) -> &DynSchemaType {
        &self.schema_type
    }

    pub fn loader(&self) -> &DynLoader {
        &self.loader
    }

    /// Printed SDL, available once the schema is finished.
    pub fn sdl(&self) -> Option<&str> {
        self.sdl.get().map(String::as_str)
    }

    pub(crate) fn sdl_cell(&self) -> Arc<OnceLock<String>> {
        self.sdl.clone()
    }

    fn table(&self, table_id: &str) -> DynResolverResult<&ValidTableType> {
        self.schema_type
            .table(table_id)
            .ok_or_else(|| DynResolverError::UnknownTable(table_id.to_string()))
    }

    /// Root list field of a table.
    pub fn resolve_list(table_id: String, ctx: ResolverContext) -> FieldFuture {
        FieldFuture::new(async move {
            let query = ctx.get_row_query()?;
            let resolver = ctx.resolver()?;
            let connection = resolver.loader.load_page(&table_id, query).await?;
            Ok(Some(FieldValue::owned_any(connection)))
        })
    }

    /// Root by-id field of a table.
    pub fn resolve_by_id(table_id: String, ctx: ResolverContext) -> FieldFuture {
        FieldFuture::new(async move {
            let id = ctx.get_arg_string_nn("id")?;
            let resolver = ctx.resolver()?;
            let node = resolver.loader.load_node(&table_id, &id).await?;
            Ok(node.map(FieldValue::owned_any))
        })
    }

    /// Field of a generated data object; the parent is the object's value.
    pub fn resolve_field(field: Option<DynFieldResolver>, ctx: ResolverContext) -> FieldFuture {
        FieldFuture::new(async move {
            let parent = ctx.parent::<Arc<ValueNode>>()?;
            match field {
                None => Ok(None),
                Some(DynFieldResolver::Property { property }) => {
                    Ok(parent.property(&property).map(to_field_value))
                }
                Some(DynFieldResolver::Relation {
                    property,
                    target,
                    many,
                }) => {
                    let ids = foreign_keys(parent.property(&property).map(Arc::as_ref), many);
                    let query = match many {
                        true => ctx.get_row_query()?,
                        false => DynPaging::from(DynPagingArgs::default()).row_query(),
                    };
                    let query = RowQuery {
                        ids: Some(ids),
                        ..query
                    };

                    let resolver = ctx.resolver()?;
                    let connection = resolver.loader.load_page(&target, query).await?;
                    Ok(Some(FieldValue::owned_any(connection)))
                }
            }
        })
    }
}

/// Foreign key value(s) of a relation property; empty keys point nowhere.
fn foreign_keys(value: Option<&ValueNode>, many: bool) -> Vec<String> {
    let Some(value) = value else {
        return Vec::new();
    };
    let keys: Vec<&ValueNode> = match many {
        true => value.items().iter().map(Arc::as_ref).collect(),
        false => vec![value],
    };
    keys.into_iter()
        .filter_map(ValueNode::string)
        .filter(|id| !id.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Objects stay values so their own fields can resolve against them.
fn to_field_value(value: &Arc<ValueNode>) -> FieldValue<'static> {
    match &value.kind {
        ValueKind::String { .. } => {
            FieldValue::value(value.string().unwrap_or_default().to_string())
        }
        ValueKind::Number { .. } => FieldValue::value(value.number().unwrap_or_default()),
        ValueKind::Boolean { .. } => FieldValue::value(value.boolean().unwrap_or_default()),
        ValueKind::Object(_) => FieldValue::owned_any(value.clone()),
        ValueKind::Array(items) => FieldValue::list(items.iter().map(to_field_value)),
    }
}

impl NodeResolver for DynResolver {
    fn resolve_id(ctx: ResolverContext) -> FieldFuture {
        FieldFuture::new(async move {
            let node = ctx.parent::<DynNode>()?;
            Ok(Some(FieldValue::value(node.row.id.clone())))
        })
    }
    fn resolve_version_id(ctx: ResolverContext) -> FieldFuture {
        FieldFuture::new(async move {
            let node = ctx.parent::<DynNode>()?;
            Ok(Some(FieldValue::value(node.row.version_id.clone())))
        })
    }
    fn resolve_created_id(ctx: ResolverContext) -> FieldFuture {
        FieldFuture::new(async move {
            let node = ctx.parent::<DynNode>()?;
            Ok(Some(FieldValue::value(node.row.created_id.clone())))
        })
    }
    fn resolve_created_at(ctx: ResolverContext) -> FieldFuture {
        FieldFuture::new(async move {
            let node = ctx.parent::<DynNode>()?;
            Ok(Some(FieldValue::value(node.row.created_at.clone())))
        })
    }
    fn resolve_updated_at(ctx: ResolverContext) -> FieldFuture {
        FieldFuture::new(async move {
            let node = ctx.parent::<DynNode>()?;
            Ok(Some(FieldValue::value(node.row.updated_at.clone())))
        })
    }
    fn resolve_published_at(ctx: ResolverContext) -> FieldFuture {
        FieldFuture::new(async move {
            let node = ctx.parent::<DynNode>()?;
            Ok(Some(FieldValue::value(node.row.published_at.clone())))
        })
    }
    fn resolve_readonly(ctx: ResolverContext) -> FieldFuture {
        FieldFuture::new(async move {
            let node = ctx.parent::<DynNode>()?;
            Ok(Some(FieldValue::value(node.row.readonly)))
        })
    }
    fn resolve_data(ctx: ResolverContext) -> FieldFuture {
        FieldFuture::new(async move {
            let node = ctx.parent::<DynNode>()?;
            let resolver = ctx.resolver()?;
            let table = resolver.table(&node.table_id)?;

            // Tables without representable fields expose the raw document.
            if table.options.data_type.type_name() == TypeRef::JSON {
                let data = Value::from_json(node.row.data.clone())?;
                return Ok(Some(FieldValue::value(data)));
            }
            Ok(node.data().as_ref().map(to_field_value))
        })
    }
}

impl ConnectionResolver for DynResolver {
    fn resolve_edges(ctx: ResolverContext) -> FieldFuture {
        FieldFuture::new(async move {
            let connection = ctx.parent::<DynConnection>()?;
            let edges = connection
                .edges
                .iter()
                .map(|edge| FieldValue::owned_any(edge.clone()));
            Ok(Some(FieldValue::list(edges)))
        })
    }
    fn resolve_page_info(ctx: ResolverContext) -> FieldFuture {
        FieldFuture::new(async move {
            let connection = ctx.parent::<DynConnection>()?;
            Ok(Some(FieldValue::owned_any(connection.page_info.clone())))
        })
    }
    fn resolve_total_count(ctx: ResolverContext) -> FieldFuture {
        FieldFuture::new(async move {
            let connection = ctx.parent::<DynConnection>()?;
            Ok(Some(FieldValue::value(connection.total_count)))
        })
    }
}

impl ConnectionEdgeResolver for DynResolver {
    fn resolve_node(ctx: ResolverContext) -> FieldFuture {
        FieldFuture::new(async move {
            let edge = ctx.parent::<DynConnectionEdge>()?;
            Ok(Some(FieldValue::owned_any(edge.node.clone())))
        })
    }
    fn resolve_cursor(ctx: ResolverContext) -> FieldFuture {
        FieldFuture::new(async move {
            let edge = ctx.parent::<DynConnectionEdge>()?;
            Ok(Some(FieldValue::value(edge.cursor.clone())))
        })
    }
}

impl PageInfoResolver for DynResolver {
    fn resolve_start_cursor(ctx: ResolverContext) -> FieldFuture {
        FieldFuture::new(async move {
            let page_info = ctx.parent::<DynPageInfo>()?;
            Ok(page_info.start_cursor.clone().map(FieldValue::value))
        })
    }
    fn resolve_end_cursor(ctx: ResolverContext) -> FieldFuture {
        FieldFuture::new(async move {
            let page_info = ctx.parent::<DynPageInfo>()?;
            Ok(page_info.end_cursor.clone().map(FieldValue::value))
        })
    }
    fn resolve_has_next_page(ctx: ResolverContext) -> FieldFuture {
        FieldFuture::new(async move {
            let page_info = ctx.parent::<DynPageInfo>()?;
            Ok(Some(FieldValue::value(page_info.has_next_page)))
        })
    }
    fn resolve_has_previous_page(ctx: ResolverContext) -> FieldFuture {
        FieldFuture::new(async move {
            let page_info = ctx.parent::<DynPageInfo>()?;
            Ok(Some(FieldValue::value(page_info.has_previous_page)))
        })
    }
}

impl ServiceResolver for DynResolver {
    fn resolve_service(_ctx: ResolverContext) -> FieldFuture {
        FieldFuture::new(async move { Ok(Some(FieldValue::owned_any(DynService))) })
    }
    fn resolve_sdl(ctx: ResolverContext) -> FieldFuture {
        FieldFuture::new(async move {
            let resolver = ctx.resolver()?;
            Ok(resolver.sdl().map(|sdl| FieldValue::value(sdl.to_string())))
        })
    }
}
