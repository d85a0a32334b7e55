//! # endpoint-graphql-lib
//!
//! `endpoint-graphql-lib` is a collection of utilities used by the various `endpoint-graphql-*` crates.

#![deny(unused_crate_dependencies)]

pub mod config;
pub mod defaults;
pub mod utils;
