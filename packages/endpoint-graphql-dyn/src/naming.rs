//! Identifier synthesis for generated GraphQL types and fields.
//!
//! Every output name must match `[_A-Za-z][_A-Za-z0-9]*`.
//! See: https://spec.graphql.org/draft/#sec-Names

use crate::self_prelude::*;
use endpoint_graphql_lib::defaults;
use indexmap::IndexMap;

fn is_name_start(c: char) -> bool {
    c == '_' || c.is_ascii_alphabetic()
}

fn is_name_continue(c: char) -> bool {
    c == '_' || c.is_ascii_alphanumeric()
}

/// Names starting with `__` are reserved for introspection.
fn is_reserved(name: &str) -> bool {
    name.starts_with("__")
}

pub fn is_safe_name(name: &str) -> bool {
    let mut chars = name.chars();
    !is_reserved(name) && chars.next().is_some_and(is_name_start) && chars.all(is_name_continue)
}

/// Turn an arbitrary string into a valid GraphQL name.
///
/// A bad first character or a leading `__` gets `{prefix}_` prepended, any
/// other bad character becomes `_`, and the result is checked again.
pub fn safe_name(raw: &str, prefix: &str) -> String {
    safe_name_at(raw, prefix, 0)
}

fn safe_name_at(raw: &str, prefix: &str, depth: usize) -> String {
    if depth >= defaults::MAX_SAFE_NAME_DEPTH {
        trace!("Giving up on {raw:?} after {depth} rounds");
        return format!("_{}", sanitize(raw).trim_start_matches('_'));
    }

    match raw.chars().next() {
        Some(c) if is_name_start(c) && !is_reserved(raw) => {}
        _ => return safe_name_at(&format!("{prefix}_{raw}"), prefix, depth + 1),
    }

    if raw.chars().all(is_name_continue) {
        raw.to_string()
    } else {
        safe_name_at(&sanitize(raw), prefix, depth + 1)
    }
}

fn sanitize(raw: &str) -> String {
    raw.chars()
        .map(|c| if is_name_continue(c) { c } else { '_' })
        .collect()
}

pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn decapitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// English plural of a type name: `bus -> buses`, `city -> cities`, `cat -> cats`.
pub fn pluralize(name: &str) -> String {
    let lower = name.to_ascii_lowercase();
    if ["s", "x", "z", "ch", "sh"]
        .iter()
        .any(|suffix| lower.ends_with(suffix))
    {
        return format!("{name}es");
    }

    let mut tail = lower.chars().rev();
    if let (Some('y'), Some(before)) = (tail.next(), tail.next()) {
        if before.is_ascii_alphabetic() && !"aeiou".contains(before) {
            return format!("{}ies", &name[..name.len() - 1]);
        }
    }

    format!("{name}s")
}

/// Singular and plural type names of a table.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TableTypeNames {
    pub singular: String,
    pub plural: String,
}

impl TableTypeNames {
    pub fn new(table_id: &str) -> Self {
        let singular = capitalize(&safe_name(table_id, defaults::TABLE_NAME_PREFIX));
        let plural = pluralize(&singular);
        Self { singular, plural }
    }
}

/// Type prefix shared by every generated type of one project.
pub fn project_prefix(project: &str) -> String {
    capitalize(&safe_name(project, defaults::PROJECT_NAME_PREFIX))
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum NamingError {
    #[error("Name {name:?} is generated for both {first} and {second}")]
    Collision {
        name: String,
        first: String,
        second: String,
    },
}

pub type NamingResult<T> = Result<T, NamingError>;

/// Claimed names of one scope, each with the owner that claimed it.
#[derive(Clone, Debug, Default)]
pub struct NameRegistry {
    claimed: IndexMap<String, String>,
}

impl NameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `name` for `owner`. Claiming again for the same owner is a no-op.
    pub fn claim(&mut self, name: impl Into<String>, owner: impl Into<String>) -> NamingResult<()> {
        let name = name.into();
        let owner = owner.into();
        match self.claimed.get(&name) {
            Some(first) if *first != owner => Err(NamingError::Collision {
                name,
                first: first.clone(),
                second: owner,
            }),
            Some(_) => Ok(()),
            None => {
                self.claimed.insert(name, owner);
                Ok(())
            }
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.claimed.contains_key(name)
    }

    pub fn owner(&self, name: &str) -> Option<&str> {
        self.claimed.get(name).map(String::as_str)
    }
}
