//! Application router configuration.

use axum::{
    Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};

use crate::{
    AppState,
    auth::{post_log_in, post_log_out},
    category::{create_category_endpoint, get_categories_endpoint},
    endpoints,
    not_found::get_404_not_found,
    product::{create_product_endpoint, get_product_endpoint, update_product_endpoint},
};

/// Return a router with all the app's routes.
///
/// Admin-only routes check the session in the handler's `AdminSession`
/// extractor rather than in a middleware layer.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::COFFEE, get(get_coffee))
        .route(endpoints::LOG_IN, post(post_log_in))
        .route(endpoints::LOG_OUT, post(post_log_out))
        .route(
            endpoints::CATEGORIES,
            get(get_categories_endpoint).post(create_category_endpoint),
        )
        .route(endpoints::PRODUCTS, post(create_product_endpoint))
        .route(
            endpoints::PRODUCT,
            get(get_product_endpoint).put(update_product_endpoint),
        )
        .fallback(get_404_not_found)
        .with_state(state)
}

/// Attempt to get a cup of coffee from the server.
async fn get_coffee() -> Response {
    (StatusCode::IM_A_TEAPOT, "I'm a teapot").into_response()
}
