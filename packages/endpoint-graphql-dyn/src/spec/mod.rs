//! `async_graphql::dynamic` extensions for the GraphQL shapes shared by every
//! generated endpoint schema.
//!
//! GraphQL Spec: https://spec.graphql.org/draft/
//! GraphQL Docs: https://graphql.org/learn/
//! GraphQL Cursor Connections Spec: https://relay.dev/graphql/connections.htm

pub mod connection;
pub mod filter;
pub mod node;
pub mod paging;
pub mod query;

pub(self) mod self_prelude {
    pub use super::super::self_prelude::*;
    pub use async_graphql::dynamic::*;
}

pub use connection::*;
pub use filter::*;
pub use node::*;
pub use paging::*;
pub use query::*;
