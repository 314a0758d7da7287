//! Log-out handler that drops the session cookie.

use axum::{
    Json,
    response::{IntoResponse, Response},
};
use axum_extra::extract::PrivateCookieJar;
use serde_json::json;

use crate::auth::cookie::invalidate_session_cookie;

/// Invalidate the session cookie.
///
/// Always succeeds, also for clients without a session.
pub async fn post_log_out(jar: PrivateCookieJar) -> Response {
    (invalidate_session_cookie(jar), Json(json!({}))).into_response()
}
