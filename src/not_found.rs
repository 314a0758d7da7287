//! The fallback for requests that do not match a route.

use axum::{http::StatusCode, response::Response};

use crate::json_error;

/// Respond with 404 and `{"error": "Not found"}`.
pub async fn get_404_not_found() -> Response {
    json_error(StatusCode::NOT_FOUND, "Not found")
}
