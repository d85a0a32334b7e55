pub const PROJECT_NAME: &str = "project";

pub const LOG_LEVEL: &str = "info";

/// Register the well-known row and file schemas before parsing any table.
pub const SYSTEM_SCHEMAS: bool = true;

/// Page size used by list and relation fields when no `first` argument is given.
pub const DEFAULT_PAGE_SIZE: u64 = 100;

/// Bound on `safe_name` retries. Each retry either prefixes or sanitizes, so
/// well-formed prefixes converge in two steps.
pub const MAX_SAFE_NAME_DEPTH: usize = 8;

/// Prefix used when a raw name does not start with a legal identifier character.
pub const FIELD_NAME_PREFIX: &str = "field";

/// Prefix used when a table id does not start with a legal identifier character.
pub const TABLE_NAME_PREFIX: &str = "table";

/// Prefix used when a project name does not start with a legal identifier character.
pub const PROJECT_NAME_PREFIX: &str = "project";
