//! This modules defines the common functionality for paging data.

/// The config for pagination
#[derive(Debug, Clone)]
pub struct PaginationConfig {
    /// The page number to default to when not specified in a request.
    pub default_page: u64,
    /// The number of items per page when not specified in a request.
    pub default_page_size: u64,
    /// The largest page size a client may request.
    pub max_page_size: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page: 1,
            default_page_size: 12,
            max_page_size: 100,
        }
    }
}

/// A 1-based page number and a page size, both at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u64,
    limit: u64,
}

impl PageRequest {
    /// Create a page request, raising `page` and `limit` to one if they are zero.
    pub fn new(page: u64, limit: u64) -> Self {
        Self {
            page: page.max(1),
            limit: limit.max(1),
        }
    }

    /// Create a page request from raw query string values.
    ///
    /// Missing or non-numeric values fall back to the defaults in `config`.
    /// Values below one are raised to one and `limit` is capped at
    /// [PaginationConfig::max_page_size].
    pub fn from_query(page: Option<&str>, limit: Option<&str>, config: &PaginationConfig) -> Self {
        let page = parse_or_default(page, config.default_page);
        let limit = parse_or_default(limit, config.default_page_size).min(config.max_page_size);

        Self::new(page, limit)
    }

    /// The 1-based page number.
    pub fn page(&self) -> u64 {
        self.page
    }

    /// The maximum number of items on the page.
    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// The number of items on the pages before this one.
    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// The number of pages needed to show `total_items` items.
    pub fn page_count(&self, total_items: u64) -> u64 {
        total_items.div_ceil(self.limit)
    }

    /// Take this page's items from `items`.
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = usize::try_from(self.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(self.limit).unwrap_or(usize::MAX);

        let rest = items.get(start..).unwrap_or(&[]);

        &rest[..rest.len().min(limit)]
    }
}

fn parse_or_default(raw: Option<&str>, default: u64) -> u64 {
    match raw.map(str::trim) {
        None | Some("") => default,
        Some(raw) => match raw.parse::<i64>() {
            Ok(value) => u64::try_from(value).unwrap_or(0),
            Err(_) => {
                tracing::debug!("Ignoring non-numeric pagination value {raw:?}");
                default
            }
        },
    }
}
