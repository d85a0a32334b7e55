pub mod cli;
pub(crate) mod commands;
