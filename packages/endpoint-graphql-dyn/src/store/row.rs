use super::row_where::*;
use super::self_prelude::*;

/// A stored row as handed out by the row-storage service.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Row {
    pub id: String,
    pub version_id: String,
    pub created_id: String,
    pub created_at: String,
    pub updated_at: String,
    pub published_at: String,
    #[serde(default)]
    pub readonly: bool,
    #[serde(default)]
    pub data: serde_json::Value,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RowOrderField {
    CreatedAt,
    UpdatedAt,
    PublishedAt,
    Id,
}

impl RowOrderField {
    pub const ALL: [RowOrderField; 4] = [
        RowOrderField::CreatedAt,
        RowOrderField::UpdatedAt,
        RowOrderField::PublishedAt,
        RowOrderField::Id,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RowOrderField::CreatedAt => "createdAt",
            RowOrderField::UpdatedAt => "updatedAt",
            RowOrderField::PublishedAt => "publishedAt",
            RowOrderField::Id => "id",
        }
    }

    pub fn value<'a>(&self, row: &'a Row) -> &'a str {
        match self {
            RowOrderField::CreatedAt => &row.created_at,
            RowOrderField::UpdatedAt => &row.updated_at,
            RowOrderField::PublishedAt => &row.published_at,
            RowOrderField::Id => &row.id,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub const ALL: [SortOrder; 2] = [SortOrder::Asc, SortOrder::Desc];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowOrderBy {
    pub field: RowOrderField,
    #[serde(default)]
    pub direction: SortOrder,
}

/// Arguments of one page request against a table.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RowQuery {
    pub first: Option<u64>,
    pub after: Option<String>,
    pub where_: Option<RowWhere>,
    pub order_by: Vec<RowOrderBy>,
    /// Restrict the page to these row ids; used by relation fields.
    pub ids: Option<Vec<String>>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RowEdge {
    pub cursor: String,
    pub row: Row,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub start_cursor: Option<String>,
    pub end_cursor: Option<String>,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowPage {
    pub edges: Vec<RowEdge>,
    pub total_count: u64,
    pub page_info: PageInfo,
}

#[derive(thiserror::Error, Debug)]
pub enum RowSourceError {
    #[error("Unknown table: {0}")]
    UnknownTable(String),
    #[error("Invalid cursor: {0}")]
    InvalidCursor(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type RowSourceResult<T> = Result<T, RowSourceError>;

/// Row-fetch capability injected by the data layer.
#[async_trait]
pub trait RowSource: Send + Sync {
    async fn list_rows(&self, table_id: &str, query: RowQuery) -> RowSourceResult<RowPage>;

    async fn get_row(&self, table_id: &str, row_id: &str) -> RowSourceResult<Option<Row>>;
}

/// A source without any rows, for schemas that are only printed.
#[derive(Clone, Copy, Debug, Default)]
pub struct EmptyRowSource;

#[async_trait]
impl RowSource for EmptyRowSource {
    async fn list_rows(&self, _table_id: &str, _query: RowQuery) -> RowSourceResult<RowPage> {
        Ok(RowPage::default())
    }

    async fn get_row(&self, _table_id: &str, _row_id: &str) -> RowSourceResult<Option<Row>> {
        Ok(None)
    }
}
