/// Page request for a paginated listing endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedQuery {
    pub page: u32,
    pub limit: usize,
    pub sort: String,
}

impl FeedQuery {
    pub fn new(page: u32, limit: usize, sort: impl Into<String>) -> Self {
        Self {
            page: page.max(1),
            limit: limit.max(1),
            sort: sort.into(),
        }
    }

    /// Render as `page=..&limit=..&sort=..`, URL-encoding the sort key.
    pub fn to_query_string(&self) -> String {
        format!(
            "page={}&limit={}&sort={}",
            self.page,
            self.limit,
            urlencoding::encode(&self.sort)
        )
    }
}
