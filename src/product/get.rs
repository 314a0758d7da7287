//! Fetching a single product for the edit form.

use axum::{
    Json,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};

use crate::{
    AppState, Error,
    db::DbConnector,
    product::{ProductId, get_product},
};

/// The state needed to read products.
#[derive(Debug, Clone)]
pub struct ProductState {
    /// The catalog database.
    pub db: DbConnector,
}

impl FromRef<AppState> for ProductState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db: state.db.clone(),
        }
    }
}

/// Parse the product ID from the URL path.
///
/// IDs that are not integers cannot refer to a product.
pub(crate) fn parse_product_id(raw_id: &str) -> Result<ProductId, Error> {
    raw_id
        .trim()
        .parse()
        .map(ProductId::new)
        .map_err(|_| Error::ProductNotFound)
}

/// Handler for reading one product.
pub async fn get_product_endpoint(
    State(state): State<ProductState>,
    Path(raw_id): Path<String>,
) -> Response {
    let result = parse_product_id(&raw_id).and_then(|product_id| {
        let connection = state.db.require()?;
        get_product(product_id, &connection)
    });

    match result {
        Ok(product) => Json(product).into_response(),
        Err(error) => error.into_api_response("Failed to get product"),
    }
}
