//! The product update endpoint.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    response::{IntoResponse, Response},
};

use crate::{
    Error,
    auth::AdminSession,
    product::{
        ProductFields, ProductForm,
        get::{ProductState, parse_product_id},
        update_product,
    },
};

/// Handler for replacing a product's fields, restricted to admins.
pub async fn update_product_endpoint(
    _session: AdminSession,
    State(state): State<ProductState>,
    Path(raw_id): Path<String>,
    body: Result<Json<ProductForm>, JsonRejection>,
) -> Response {
    let form = match body {
        Ok(Json(form)) => form,
        Err(rejection) => {
            tracing::warn!("Could not parse product body: {rejection}");
            return Error::InvalidBody(rejection.body_text()).into_response();
        }
    };

    let result = parse_product_id(&raw_id).and_then(|product_id| {
        let fields = ProductFields::try_from(form)?;
        let connection = state.db.require()?;
        update_product(product_id, fields, &connection)
    });

    match result {
        Ok(product) => {
            tracing::info!("Updated product {}", product.id);
            Json(product).into_response()
        }
        Err(error) => error.into_api_response("Failed to save product"),
    }
}
