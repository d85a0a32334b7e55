//! Fixtures for exercising generated schemas without a row service.

pub mod schema;
pub mod source;
pub mod tables;

pub(self) mod self_prelude {
    pub use super::super::self_prelude::*;
    pub use crate::store::*;
    pub use indexmap::IndexMap;
    pub use serde_json::json;
    pub use std::sync::Arc;
}

pub use schema::*;
pub use source::*;
pub use tables::*;

pub mod prelude {
    pub use super::*;
    pub use crate::schema::*;
    pub use crate::store::*;
}
