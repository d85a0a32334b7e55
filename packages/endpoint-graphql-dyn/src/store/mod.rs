pub mod plain;
pub mod refs;
pub mod row;
pub mod row_where;
pub mod schema_node;
pub mod schema_store;
pub mod table;
pub mod value;

pub(self) mod self_prelude {
    pub use super::super::self_prelude::*;
    pub use indexmap::IndexMap;
    pub use serde::{Deserialize, Serialize};
    pub use std::collections::{HashMap, HashSet};
    pub use std::fmt;
    pub use std::sync::Arc;
}

pub use plain::*;
pub use refs::*;
pub use row::*;
pub use row_where::*;
pub use schema_node::*;
pub use schema_store::*;
pub use table::*;
pub use value::*;
