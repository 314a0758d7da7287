//! Storefront is the backend for an online clothing store and its admin console.
//!
//! This library provides a JSON API for browsing the category taxonomy,
//! managing categories and editing products in the catalog.
//!
//! The catalog lives in a SQLite database. When the server is started without
//! a database, the category listing keeps working from a fixed set of demo
//! categories while every write is rejected.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use tokio::signal;

mod app_state;
mod auth;
mod category;
mod db;
mod endpoints;
mod logging;
mod not_found;
mod pagination;
mod product;
mod routing;
mod timestamp;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use auth::{PasswordHash, Role, User, UserID, ValidatedPassword, create_user};
pub use category::{Category, CategoryName, NewCategory, create_category};
pub use db::{DbConnector, initialize as initialize_db};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use pagination::PaginationConfig;
pub use product::{Product, ProductFields, create_product};
pub use routing::build_router;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The request has no valid session, or the session's role is not
    /// allowed to perform the operation.
    #[error("Unauthorized")]
    Unauthorized,

    /// The email and password did not match a registered user.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// A required field was missing or blank in the request body.
    #[error("Missing required fields")]
    MissingFields,

    /// A numeric field held a value outside of its allowed range, e.g. a
    /// negative price.
    #[error("Invalid numeric value")]
    InvalidNumber,

    /// The request body could not be parsed.
    ///
    /// The string holds the parser's message and is only logged.
    #[error("Invalid request body")]
    InvalidBody(String),

    /// An active category with the same name, ignoring case, already exists.
    #[error("Category with this name already exists")]
    DuplicateCategoryName,

    /// A user with the same email, ignoring case, already exists.
    #[error("a user with this email already exists")]
    DuplicateEmail,

    /// The user provided a password that is too easy to guess.
    #[error("password is too weak: {0}")]
    TooWeak(String),

    /// The server is running without a database.
    ///
    /// Reads may fall back to demo data, writes must fail with this error.
    #[error("Database not connected")]
    DatabaseNotConnected,

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("Not found")]
    NotFound,

    /// The product ID does not refer to a product in the catalog.
    #[error("Product not found")]
    ProductNotFound,

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// A date-time could not be formatted or parsed.
    #[error("could not format date-time: {0}")]
    InvalidDateFormat(String),

    /// An error occurred while serializing a value as JSON.
    #[error("could not serialize as JSON: {0}")]
    JSONSerializationError(String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.ends_with("category.name_normalized") =>
            {
                Error::DuplicateCategoryName
            }
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.ends_with("user.email") =>
            {
                Error::DuplicateEmail
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl Error {
    /// The status code the error is reported with, or `None` for errors that
    /// are internal to the server.
    fn client_status(&self) -> Option<StatusCode> {
        match self {
            Error::Unauthorized | Error::InvalidCredentials => Some(StatusCode::UNAUTHORIZED),
            Error::MissingFields
            | Error::InvalidNumber
            | Error::InvalidBody(_)
            | Error::DuplicateCategoryName
            | Error::DuplicateEmail
            | Error::TooWeak(_) => Some(StatusCode::BAD_REQUEST),
            Error::DatabaseNotConnected | Error::DatabaseLockError => {
                Some(StatusCode::SERVICE_UNAVAILABLE)
            }
            Error::NotFound | Error::ProductNotFound => Some(StatusCode::NOT_FOUND),
            Error::HashingError(_)
            | Error::InvalidDateFormat(_)
            | Error::JSONSerializationError(_)
            | Error::SqlError(_) => None,
        }
    }

    /// Render the error as a JSON response, using `failure_message` for errors
    /// that are not meant to be shown to the client.
    pub(crate) fn into_api_response(self, failure_message: &str) -> Response {
        match self.client_status() {
            // A poisoned lock means the store is unusable for this request.
            Some(status) if self == Error::DatabaseLockError => {
                tracing::error!("{self}");
                json_error(status, &Error::DatabaseNotConnected.to_string())
            }
            Some(status) => json_error(status, &self.to_string()),
            None => {
                tracing::error!("An unexpected error occurred: {self}");
                json_error(StatusCode::INTERNAL_SERVER_ERROR, failure_message)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        self.into_api_response("An unexpected error occurred")
    }
}

/// Create a response with the JSON body `{"error": message}`.
pub(crate) fn json_error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}
