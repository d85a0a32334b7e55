use super::self_prelude::*;
use crate::naming::NamingError;

/// Errors that abort a whole build.
///
/// Per-table parse failures never show up here: they exclude the table and
/// are reported through [`DynSchemaType::excluded`](super::DynSchemaType).
#[derive(thiserror::Error, Debug)]
pub enum DynSchemaError {
    #[error(transparent)]
    Store(#[from] store::StoreError),
    #[error(transparent)]
    Naming(#[from] NamingError),
    #[error("{owner} references type {name:?}, which is never defined")]
    DanglingType { owner: String, name: String },
    #[error("Failed to build schema: {0}")]
    Build(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<SchemaError> for DynSchemaError {
    fn from(err: SchemaError) -> Self {
        Self::Build(err.0)
    }
}

pub type DynSchemaResult<T> = Result<T, DynSchemaError>;
