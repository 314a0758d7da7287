//! The category listing endpoint.
//!
//! Listing never fails at the transport level: when the database is missing
//! the demo categories are served, and when the database fails the page is
//! empty and carries an error message.

use axum::{
    Json,
    extract::{FromRef, Query, State, rejection::QueryRejection},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    category::{
        Category, count_active_categories, demo::query_demo_categories, get_active_categories,
    },
    db::DbConnector,
    pagination::{PageRequest, PaginationConfig},
    product::ProductCounter,
};

/// The message sent to clients when the category page could not be read.
pub const CONNECTION_FAILED_MESSAGE: &str = "Database connection failed";

/// The fields categories can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    /// Sort by name.
    Name,
    /// Sort by description.
    Description,
    /// Sort by creation time.
    #[default]
    CreatedAt,
    /// Sort by the time of the last change.
    UpdatedAt,
}

impl SortField {
    /// Parse the `sortBy` query parameter, which uses the JSON field names.
    pub fn from_param(param: &str) -> Option<Self> {
        match param {
            "name" => Some(Self::Name),
            "description" => Some(Self::Description),
            "createdAt" => Some(Self::CreatedAt),
            "updatedAt" => Some(Self::UpdatedAt),
            _ => None,
        }
    }

    /// The database column for the field.
    pub(crate) fn column(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Description => "description",
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
        }
    }
}

/// The direction of a sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Smallest first.
    Ascending,
    /// Largest first.
    #[default]
    Descending,
}

impl SortOrder {
    /// Parse the `sortOrder` query parameter. Anything other than "asc" is descending.
    pub fn from_param(param: &str) -> Self {
        if param == "asc" {
            Self::Ascending
        } else {
            Self::Descending
        }
    }

    pub(crate) fn keyword(&self) -> &'static str {
        match self {
            Self::Ascending => "ASC",
            Self::Descending => "DESC",
        }
    }
}

/// The raw query string of a category listing request.
///
/// Every value is kept as a string so that malformed values fall back to
/// defaults instead of rejecting the request.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryQueryParams {
    /// The 1-based page number.
    pub page: Option<String>,
    /// The page size.
    pub limit: Option<String>,
    /// Text to look for in the name or description.
    pub search: Option<String>,
    /// The JSON field name to sort by.
    pub sort_by: Option<String>,
    /// "asc" or "desc".
    pub sort_order: Option<String>,
}

/// A validated category listing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryQuery {
    /// The page to return.
    pub page: PageRequest,
    /// Case-insensitive text to match in the name or description, empty to match all.
    pub search: String,
    /// The field to sort by.
    pub sort_field: SortField,
    /// The direction to sort in.
    pub sort_order: SortOrder,
}

impl CategoryQuery {
    /// Validate the query string values, falling back to defaults.
    pub fn from_params(params: &CategoryQueryParams, config: &PaginationConfig) -> Self {
        let sort_field = match params.sort_by.as_deref() {
            None => SortField::default(),
            Some(sort_by) => SortField::from_param(sort_by).unwrap_or_else(|| {
                tracing::warn!("Unknown category sort field {sort_by:?}, sorting by createdAt");
                SortField::default()
            }),
        };

        Self {
            page: PageRequest::from_query(
                params.page.as_deref(),
                params.limit.as_deref(),
                config,
            ),
            search: params.search.as_deref().unwrap_or_default().trim().to_owned(),
            sort_field,
            sort_order: params
                .sort_order
                .as_deref()
                .map(SortOrder::from_param)
                .unwrap_or_default(),
        }
    }
}

/// A page of categories as sent to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPage {
    /// The categories on this page, at most the requested limit.
    pub categories: Vec<Category>,
    /// The requested page number.
    pub current_page: u64,
    /// The number of pages for the current search and page size.
    pub total_pages: u64,
    /// The number of categories matching the search.
    pub total_categories: u64,
    /// Whether the categories are demo data because there is no database.
    pub is_demo: bool,
    /// Set when the database could not be read.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CategoryPage {
    /// An empty page reporting that the database could not be read.
    pub fn connection_failed(current_page: u64) -> Self {
        Self {
            categories: Vec::new(),
            current_page,
            total_pages: 0,
            total_categories: 0,
            is_demo: false,
            error: Some(CONNECTION_FAILED_MESSAGE.to_owned()),
        }
    }
}

/// Get a page of categories with their product counts.
///
/// Serves demo categories if `db` is disconnected. Errors are reported in
/// [CategoryPage::error] rather than returned.
pub fn query_categories(db: &DbConnector, query: &CategoryQuery) -> CategoryPage {
    let connection = match db.connect() {
        Ok(Some(connection)) => connection,
        Ok(None) => {
            tracing::info!("Database not connected, returning demo categories");
            return query_demo_categories(query);
        }
        Err(error) => {
            tracing::error!("Could not connect to the database: {error}");
            return CategoryPage::connection_failed(query.page.page());
        }
    };

    match query_category_store(query, &connection, &*connection) {
        Ok(page) => page,
        Err(error) => {
            tracing::error!("Could not query categories: {error}");
            CategoryPage::connection_failed(query.page.page())
        }
    }
}

/// Read a page of categories from the database and fill in their product counts.
///
/// A failed product count is logged and reported as zero for that category only.
///
/// # Errors
///
/// Returns an error if the page or the total count could not be read.
pub fn query_category_store(
    query: &CategoryQuery,
    connection: &Connection,
    product_counter: &impl ProductCounter,
) -> Result<CategoryPage, Error> {
    let mut categories = get_active_categories(query, connection)?;
    let total_categories = count_active_categories(&query.search, connection)?;

    tracing::debug!(
        "Database query returned {} categories out of {total_categories} total",
        categories.len()
    );

    for category in &mut categories {
        category.product_count = product_counter
            .count_products_in_category(category.name.as_ref())
            .unwrap_or_else(|error| {
                tracing::warn!(
                    "Could not count products for category {:?}: {error}",
                    category.name.as_ref()
                );
                0
            });
    }

    Ok(CategoryPage {
        categories,
        current_page: query.page.page(),
        total_pages: query.page.page_count(total_categories),
        total_categories,
        is_demo: false,
        error: None,
    })
}

/// The state needed for listing categories.
#[derive(Debug, Clone)]
pub struct CategoryListState {
    /// The catalog database.
    pub db: DbConnector,
    /// The default and maximum page sizes.
    pub pagination_config: PaginationConfig,
}

impl FromRef<AppState> for CategoryListState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db: state.db.clone(),
            pagination_config: state.pagination_config.clone(),
        }
    }
}

/// Handler for listing categories.
///
/// Always responds with 200, clients must check `error` and `isDemo` in the body.
pub async fn get_categories_endpoint(
    State(state): State<CategoryListState>,
    params: Result<Query<CategoryQueryParams>, QueryRejection>,
) -> Json<CategoryPage> {
    let params = params.map(|Query(params)| params).unwrap_or_else(|rejection| {
        tracing::warn!("Could not parse category query string, using defaults: {rejection}");
        CategoryQueryParams::default()
    });
    let query = CategoryQuery::from_params(&params, &state.pagination_config);

    Json(query_categories(&state.db, &query))
}
