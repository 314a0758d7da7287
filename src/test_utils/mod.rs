#![allow(missing_docs)]

use axum::{
    body::to_bytes,
    http::header::SET_COOKIE,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Cookie};
use serde::de::DeserializeOwned;

use crate::{
    AppState,
    auth::{DEFAULT_COOKIE_DURATION, Role, UserID, set_session_cookie},
    db::DbConnector,
    pagination::PaginationConfig,
    product::ProductFields,
};

/// Read a response body as JSON.
pub(crate) async fn parse_json_body<T: DeserializeOwned>(response: Response) -> T {
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Could not read response body");

    serde_json::from_slice(&body).expect("Response body is not valid JSON")
}

/// A valid product in `category`.
pub(crate) fn product_fields(name: &str, category: &str) -> ProductFields {
    ProductFields {
        name: name.to_owned(),
        description: format!("{name} description"),
        price: 150_000,
        original_price: None,
        category: category.to_owned(),
        subcategory: None,
        fabric: "Katun".to_owned(),
        sizes: vec!["M".to_owned(), "L".to_owned()],
        colors: vec!["Biru".to_owned()],
        images: vec![format!("https://cdn.toko.id/{name}.jpg")],
        stock: 10,
        featured: false,
        tags: Vec::new(),
    }
}

/// App state for handlers that need a cookie key.
pub(crate) struct TestAuth {
    pub state: AppState,
}

impl TestAuth {
    pub fn new(db: DbConnector) -> Self {
        Self {
            state: AppState::new(db, "42", PaginationConfig::default()),
        }
    }
}

/// An encrypted session cookie for user 1 with `role`.
pub(crate) fn session_cookie(auth: &TestAuth, role: Role) -> Cookie<'static> {
    let jar = PrivateCookieJar::new(auth.state.cookie_key.clone());
    let jar = set_session_cookie(jar, UserID::new(1), role, DEFAULT_COOKIE_DURATION)
        .expect("Could not set session cookie");
    let response = jar.into_response();

    let header = response
        .headers()
        .get(SET_COOKIE)
        .expect("Response is missing the session cookie")
        .to_str()
        .expect("Could not convert cookie header to str")
        .to_owned();

    Cookie::parse(header)
        .expect("Could not parse session cookie")
        .into_owned()
}
