pub mod connection;
pub mod context;
pub mod converter;
pub mod error;
pub mod filter;
pub mod handler;
pub mod loader;
pub mod node;
pub mod paging;
pub mod relation;
pub mod resolver;
pub mod resolver_context;
pub mod schema_builder;
pub mod schema_type;
pub mod schema_type_builder;
pub mod snapshot;

pub(self) mod self_prelude {
    pub use super::super::self_prelude::*;
    pub use crate::spec::*;
    pub use crate::store;
    pub use async_graphql::dynamic::*;
    pub use indexmap::IndexMap;
    pub use std::collections::{HashMap, HashSet};
    pub use std::fmt;
    pub use std::sync::Arc;
}

pub use connection::*;
pub use context::*;
pub use converter::*;
pub use error::*;
pub use filter::*;
pub use handler::*;
pub use loader::*;
pub use node::*;
pub use paging::*;
pub use relation::*;
pub use resolver::*;
pub use resolver_context::*;
pub use schema_builder::*;
pub use schema_type::*;
pub use schema_type_builder::*;
pub use snapshot::*;
