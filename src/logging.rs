//! Middleware for logging requests and responses.

use axum::{
    body::{Body, Bytes, to_bytes},
    extract::Request,
    http::{HeaderMap, header::CONTENT_TYPE},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::Value;

/// The number of bytes of a body that are logged at the `info` level.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// Fields whose values are never written to the logs.
const REDACTED_FIELDS: [&str; 2] = ["password", "confirm_password"];

const REDACTED: &str = "********";

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level.
/// If a body is longer than [LOG_BODY_LENGTH_LIMIT] bytes, it is
/// truncated and the full body is logged at the `debug` level.
/// Password fields in JSON and form bodies are redacted.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let body_bytes = match to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(error) => {
            tracing::error!("Could not read request body: {error}");
            return axum::http::StatusCode::BAD_REQUEST.into_response();
        }
    };

    let display_text = redact_body(&parts.headers, &body_bytes);
    log_body(
        &format!("Received request: {} {}", parts.method, parts.uri),
        &display_text,
    );
    tracing::debug!("Request headers: {:#?}", parts.headers);

    let request = Request::from_parts(parts, Body::from(body_bytes));
    let response = next.run(request).await;

    let (parts, body) = response.into_parts();
    let body_bytes = match to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(error) => {
            tracing::error!("Could not read response body: {error}");
            return Response::from_parts(parts, Body::empty());
        }
    };

    let display_text = redact_body(&parts.headers, &body_bytes);
    log_body(&format!("Sending response: {}", parts.status), &display_text);

    Response::from_parts(parts, Body::from(body_bytes))
}

fn redact_body(headers: &HeaderMap, body: &Bytes) -> String {
    let text = String::from_utf8_lossy(body);
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    if content_type.starts_with("application/json") {
        redact_json(&text)
    } else if content_type.starts_with("application/x-www-form-urlencoded") {
        REDACTED_FIELDS
            .iter()
            .fold(text.into_owned(), |text, field| redact_form_field(&text, field))
    } else {
        text.into_owned()
    }
}

fn redact_json(text: &str) -> String {
    let Ok(mut value) = serde_json::from_str::<Value>(text) else {
        return text.to_owned();
    };

    if let Value::Object(map) = &mut value {
        for field in REDACTED_FIELDS {
            if let Some(secret) = map.get_mut(field) {
                *secret = Value::String(REDACTED.to_owned());
            }
        }
    }

    value.to_string()
}

fn redact_form_field(form_text: &str, field_name: &str) -> String {
    form_text
        .split('&')
        .map(|pair| match pair.split_once('=') {
            Some((key, _)) if key == field_name => format!("{key}={REDACTED}"),
            _ => pair.to_owned(),
        })
        .collect::<Vec<_>>()
        .join("&")
}

fn log_body(message: &str, body: &str) {
    if body.len() > LOG_BODY_LENGTH_LIMIT {
        let mut end = LOG_BODY_LENGTH_LIMIT;
        while !body.is_char_boundary(end) {
            end -= 1;
        }

        tracing::info!("{message}\nbody: {}...", &body[..end]);
        tracing::debug!("Full body: {body:?}");
    } else {
        tracing::info!("{message}\nbody: {body:?}");
    }
}

#[cfg(test)]
mod logging_tests {
    use axum::{
        Json, Router,
        http::{HeaderMap, HeaderValue, header::CONTENT_TYPE},
        middleware,
        routing::post,
    };
    use axum_test::TestServer;
    use serde_json::{Value, json};

    use super::{logging_middleware, redact_body, redact_form_field, redact_json};

    #[test]
    fn redacts_json_password() {
        let got = redact_json(r#"{"email":"a@b.c","password":"hunter2"}"#);

        let got: Value = serde_json::from_str(&got).unwrap();
        assert_eq!(got, json!({ "email": "a@b.c", "password": "********" }));
    }

    #[test]
    fn leaves_invalid_json_alone() {
        assert_eq!(redact_json("{not json"), "{not json");
    }

    #[test]
    fn redacts_form_password() {
        let got = redact_form_field("email=a%40b.c&password=hunter2&remember_me=on", "password");

        assert_eq!(got, "email=a%40b.c&password=********&remember_me=on");
    }

    #[test]
    fn form_redaction_matches_whole_field_name() {
        let got = redact_form_field("password=a&confirm_password=b", "password");

        assert_eq!(got, "password=********&confirm_password=b");
    }

    #[test]
    fn other_content_is_not_redacted() {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/plain"));

        let got = redact_body(&headers, &"password=hunter2".into());

        assert_eq!(got, "password=hunter2");
    }

    #[tokio::test]
    async fn passes_bodies_through_unchanged() {
        let app = Router::new()
            .route("/echo", post(|Json(body): Json<Value>| async move { Json(body) }))
            .layer(middleware::from_fn(logging_middleware));
        let server = TestServer::new(app).expect("Could not create test server.");
        let body = json!({ "email": "a@b.c", "password": "hunter2", "note": "é".repeat(100) });

        let response = server.post("/echo").json(&body).await;

        response.assert_status_ok();
        response.assert_json(&body);
    }
}
