/// Default page when the query does not carry a usable `page`.
pub const DEFAULT_PAGE: u32 = 1;
/// Default page size when the query does not carry a usable `limit`.
pub const DEFAULT_LIMIT: u32 = 3;
/// Largest accepted page size.
pub const MAX_LIMIT: u32 = 50;

/// A validated page request: `page >= 1` and `1 <= limit <= 50`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pagination {
    page: u32,
    limit: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl Pagination {
    /// Builds a pagination, flooring `page` at 1 and clamping `limit` to [1, 50].
    pub fn new(page: i64, limit: i64) -> Self {
        Self {
            page: page.clamp(1, u32::MAX as i64) as u32,
            limit: limit.clamp(1, MAX_LIMIT as i64) as u32,
        }
    }

    /// Builds a pagination from raw query string values.
    ///
    /// Missing or non-numeric values fall back to the defaults (page 1,
    /// limit 3) before flooring and clamping.
    pub fn from_query(page: Option<&str>, limit: Option<&str>) -> Self {
        let page = parse_or(page, DEFAULT_PAGE);
        let limit = parse_or(limit, DEFAULT_LIMIT);
        Self::new(page, limit)
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of rows skipped before this page: `(page - 1) * limit`.
    pub fn offset(&self) -> u64 {
        (self.page as u64 - 1) * self.limit as u64
    }
}

fn parse_or(raw: Option<&str>, default: u32) -> i64 {
    raw.and_then(|value| value.trim().parse::<i64>().ok())
        .unwrap_or(default as i64)
}
