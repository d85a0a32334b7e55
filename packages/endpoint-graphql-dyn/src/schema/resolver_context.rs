use super::paging::*;
use super::resolver::*;
use super::self_prelude::*;
use serde::de::DeserializeOwned;
use store::{RowOrderBy, RowQuery, RowWhere};

#[derive(thiserror::Error, Debug)]
pub enum DynResolverContextError {
    #[error("Missing argument: {0}")]
    MissingArgument(String),
    #[error("Invalid argument {0}: {1}")]
    InvalidArgument(String, String),
    #[error("Unexpected parent value, expected {0}")]
    Parent(&'static str),
    #[error("Resolver is not registered with the schema")]
    MissingResolver,
}

pub type DynResolverContextResult<T> = anyhow::Result<T, DynResolverContextError>;

type Error = DynResolverContextError;
type Result<T> = DynResolverContextResult<T>;

/// Typed access to what a dynamic resolver gets handed.
#[extension_trait]
pub impl<'a> DynResolverContext<'a> for ResolverContext<'a> {
    fn resolver(&self) -> Result<&DynResolver> {
        self.data::<DynResolver>().map_err(|_| Error::MissingResolver)
    }

    fn parent<T: std::any::Any>(&self) -> Result<&T> {
        self.parent_value
            .try_downcast_ref::<T>()
            .map_err(|_| Error::Parent(std::any::type_name::<T>()))
    }

    fn get_arg_string(&self, name: &str) -> Result<Option<String>> {
        match self.args.get(name) {
            Some(arg) if !arg.is_null() => arg
                .string()
                .map(|value| Some(value.to_string()))
                .map_err(|err| Error::InvalidArgument(name.to_string(), err.message)),
            _ => Ok(None),
        }
    }

    fn get_arg_string_nn(&self, name: &str) -> Result<String> {
        self.get_arg_string(name)?
            .ok_or_else(|| Error::MissingArgument(name.to_string()))
    }

    fn get_arg_u64(&self, name: &str) -> Result<Option<u64>> {
        match self.args.get(name) {
            Some(arg) if !arg.is_null() => arg
                .u64()
                .map(Some)
                .map_err(|err| Error::InvalidArgument(name.to_string(), err.message)),
            _ => Ok(None),
        }
    }

    fn get_arg_deserialized<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>> {
        match self.args.get(name) {
            Some(arg) if !arg.is_null() => async_graphql::from_value(arg.as_value().clone())
                .map(Some)
                .map_err(|err| Error::InvalidArgument(name.to_string(), err.to_string())),
            _ => Ok(None),
        }
    }

    fn get_paging(&self) -> Result<DynPaging> {
        let args = DynPagingArgs {
            first: self.get_arg_u64("first")?,
            after: self.get_arg_string("after")?,
        };
        Ok(args.into())
    }

    /// Paging, `where` and `orderBy` arguments as one row query.
    fn get_row_query(&self) -> Result<RowQuery> {
        Ok(RowQuery {
            where_: self.get_arg_deserialized::<RowWhere>("where")?,
            order_by: self
                .get_arg_deserialized::<Vec<RowOrderBy>>("orderBy")?
                .unwrap_or_default(),
            ..self.get_paging()?.row_query()
        })
    }
}
