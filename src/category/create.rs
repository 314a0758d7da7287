//! The category creation endpoint.

use axum::{
    Json,
    extract::{FromRef, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    AppState, Error,
    auth::AdminSession,
    category::{Category, CategoryForm, NewCategory, create_category, find_active_category_by_name},
    db::DbConnector,
};

/// The state needed for creating a category.
#[derive(Debug, Clone)]
pub struct CreateCategoryState {
    /// The catalog database.
    pub db: DbConnector,
}

impl FromRef<AppState> for CreateCategoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db: state.db.clone(),
        }
    }
}

/// Validate `form` and insert it as a new active category.
///
/// # Errors
///
/// Checked in this order:
/// - [Error::MissingFields] if the name or description is missing or blank.
/// - [Error::DatabaseNotConnected] if there is no database, there is no
///   demo fallback for writes.
/// - [Error::DuplicateCategoryName] if an active category with the same name,
///   ignoring case, exists.
pub fn create_category_in_store(form: CategoryForm, db: &DbConnector) -> Result<Category, Error> {
    let new_category = NewCategory::try_from(form)?;
    let connection = db.require()?;

    if find_active_category_by_name(&new_category.name, &connection)?.is_some() {
        return Err(Error::DuplicateCategoryName);
    }

    // The unique index still guards against a concurrent insert from another
    // connection, which surfaces as the same duplicate name error.
    create_category(new_category, &connection)
}

/// Handler for creating a category, restricted to admins.
///
/// Responds with 201 and the new category on success.
pub async fn create_category_endpoint(
    _session: AdminSession,
    State(state): State<CreateCategoryState>,
    body: Result<Json<CategoryForm>, JsonRejection>,
) -> Response {
    let form = match body {
        Ok(Json(form)) => form,
        Err(rejection) => {
            tracing::warn!("Could not parse category body: {rejection}");
            return Error::InvalidBody(rejection.body_text()).into_response();
        }
    };

    match create_category_in_store(form, &state.db) {
        Ok(category) => {
            tracing::info!("Created category {:?} with ID {}", category.name.as_ref(), category.id);
            (StatusCode::CREATED, Json(category)).into_response()
        }
        Err(error) => error.into_api_response("Failed to create category"),
    }
}


#[cfg(test)]
mod create_category_endpoint_tests {
    use axum::{Router, http::StatusCode, routing::post};
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::{Value, json};

    use crate::{
        auth::Role,
        category::Category,
        db::{DbConnector, initialize},
        endpoints,
        test_utils::{TestAuth, session_cookie},
    };

    use super::create_category_endpoint;

    fn get_test_server(db: DbConnector) -> (TestServer, TestAuth) {
        let auth = TestAuth::new(db);
        let app = Router::new()
            .route(endpoints::CATEGORIES, post(create_category_endpoint))
            .with_state(auth.state.clone());

        (
            TestServer::new(app).expect("Could not create test server."),
            auth,
        )
    }

    fn get_test_db() -> DbConnector {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).expect("Could not initialize test database");
        DbConnector::connected(connection)
    }

    fn count_categories(db: &DbConnector) -> i64 {
        db.require()
            .unwrap()
            .query_row("SELECT COUNT(*) FROM category", [], |row| row.get(0))
            .unwrap()
    }

    #[tokio::test]
    async fn admin_can_create_category() {
        let (server, auth) = get_test_server(get_test_db());

        let response = server
            .post(endpoints::CATEGORIES)
            .add_cookie(session_cookie(&auth, Role::Admin))
            .json(&json!({
                "name": "Shoes",
                "description": "Footwear",
                "subcategories": ["Sneakers", "Boots"]
            }))
            .await;

        response.assert_status(StatusCode::CREATED);
        let category: Category = response.json();
        assert_eq!(category.name.as_ref(), "Shoes");
        assert_eq!(category.subcategories, ["Sneakers", "Boots"]);
        assert_eq!(category.product_count, 0);
        assert_eq!(count_categories(&auth.state.db), 1);
    }

    #[tokio::test]
    async fn missing_session_is_unauthorized_and_writes_nothing() {
        let (server, auth) = get_test_server(get_test_db());

        let response = server
            .post(endpoints::CATEGORIES)
            .json(&json!({ "name": "Shoes", "description": "Footwear" }))
            .await;

        response.assert_status(StatusCode::UNAUTHORIZED);
        response.assert_json(&json!({ "error": "Unauthorized" }));
        assert_eq!(count_categories(&auth.state.db), 0);
    }

    #[tokio::test]
    async fn customer_session_is_unauthorized_and_writes_nothing() {
        let (server, auth) = get_test_server(get_test_db());

        let response = server
            .post(endpoints::CATEGORIES)
            .add_cookie(session_cookie(&auth, Role::Customer))
            .json(&json!({ "name": "Shoes", "description": "Footwear" }))
            .await;

        response.assert_status(StatusCode::UNAUTHORIZED);
        assert_eq!(count_categories(&auth.state.db), 0);
    }

    #[tokio::test]
    async fn authorization_is_checked_before_validation() {
        let (server, _auth) = get_test_server(get_test_db());

        let response = server.post(endpoints::CATEGORIES).json(&json!({})).await;

        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn missing_fields_are_bad_request() {
        let (server, auth) = get_test_server(get_test_db());

        let response = server
            .post(endpoints::CATEGORIES)
            .add_cookie(session_cookie(&auth, Role::Admin))
            .json(&json!({ "name": "Shoes" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        response.assert_json(&json!({ "error": "Missing required fields" }));
    }

    #[tokio::test]
    async fn disconnected_store_is_service_unavailable() {
        let (server, auth) = get_test_server(DbConnector::disconnected());

        let response = server
            .post(endpoints::CATEGORIES)
            .add_cookie(session_cookie(&auth, Role::Admin))
            .json(&json!({ "name": "Shoes", "description": "Footwear" }))
            .await;

        response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
        response.assert_json(&json!({ "error": "Database not connected" }));
    }

    #[tokio::test]
    async fn duplicate_name_is_bad_request() {
        let (server, auth) = get_test_server(get_test_db());
        let cookie = session_cookie(&auth, Role::Admin);
        server
            .post(endpoints::CATEGORIES)
            .add_cookie(cookie.clone())
            .json(&json!({ "name": "Shoes", "description": "Footwear" }))
            .await
            .assert_status(StatusCode::CREATED);

        let response = server
            .post(endpoints::CATEGORIES)
            .add_cookie(cookie)
            .json(&json!({ "name": "shoes", "description": "Also footwear" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        response.assert_json(&json!({ "error": "Category with this name already exists" }));
        assert_eq!(count_categories(&auth.state.db), 1);
    }

    #[tokio::test]
    async fn invalid_json_is_bad_request() {
        let (server, auth) = get_test_server(get_test_db());

        let response = server
            .post(endpoints::CATEGORIES)
            .add_cookie(session_cookie(&auth, Role::Admin))
            .text("{not json")
            .content_type("application/json")
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["error"], "Invalid request body");
    }
}
