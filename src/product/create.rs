//! The product creation endpoint.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header::LOCATION},
    response::{IntoResponse, Response},
};

use crate::{
    Error,
    auth::AdminSession,
    endpoints::{self, format_endpoint},
    product::{ProductFields, ProductForm, create_product, get::ProductState},
};

/// Handler for adding a product to the catalog, restricted to admins.
///
/// Responds with 201, the new product and its URL in the `Location` header.
pub async fn create_product_endpoint(
    _session: AdminSession,
    State(state): State<ProductState>,
    body: Result<Json<ProductForm>, JsonRejection>,
) -> Response {
    let form = match body {
        Ok(Json(form)) => form,
        Err(rejection) => {
            tracing::warn!("Could not parse product body: {rejection}");
            return Error::InvalidBody(rejection.body_text()).into_response();
        }
    };

    let result = ProductFields::try_from(form).and_then(|fields| {
        let connection = state.db.require()?;
        create_product(fields, &connection)
    });

    match result {
        Ok(product) => {
            tracing::info!("Created product {:?} with ID {}", product.fields.name, product.id);
            let location = format_endpoint(endpoints::PRODUCT, product.id);
            (StatusCode::CREATED, [(LOCATION, location)], Json(product)).into_response()
        }
        Err(error) => error.into_api_response("Failed to save product"),
    }
}
