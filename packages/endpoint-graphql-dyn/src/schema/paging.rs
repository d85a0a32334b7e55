use super::self_prelude::*;
use endpoint_graphql_lib::defaults;

pub type DynPageInfo = store::PageInfo;

/// Forward paging arguments of a list or relation field.
/// See: https://relay.dev/graphql/connections.htm#sec-Forward-pagination-arguments
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DynPagingArgs {
    pub first: Option<u64>,
    pub after: Option<Cursor>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DynPaging {
    pub count: u64,
    pub after: Option<Cursor>,
}

impl From<DynPagingArgs> for DynPaging {
    fn from(args: DynPagingArgs) -> Self {
        Self {
            count: args.first.unwrap_or(defaults::DEFAULT_PAGE_SIZE),
            after: args.after,
        }
    }
}

impl DynPaging {
    /// Row query for this page, before filters and ordering are added.
    pub fn row_query(self) -> store::RowQuery {
        store::RowQuery {
            first: Some(self.count),
            after: self.after,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paging_defaults_to_page_size() {
        let paging = DynPaging::from(DynPagingArgs::default());
        assert_eq!(paging.count, defaults::DEFAULT_PAGE_SIZE);

        let query = DynPaging::from(DynPagingArgs {
            first: Some(2),
            after: Some("b".to_string()),
        })
        .row_query();
        assert_eq!(query.first, Some(2));
        assert_eq!(query.after.as_deref(), Some("b"));
        assert!(query.ids.is_none());
    }
}
