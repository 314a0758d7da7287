//! Implements a struct that holds the state of the REST server.

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use sha2::{Digest, Sha512};
use time::Duration;

use crate::{auth::DEFAULT_COOKIE_DURATION, db::DbConnector, pagination::PaginationConfig};

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,

    /// The duration for which session cookies are valid.
    pub cookie_duration: Duration,

    /// The config that controls how to page the category listing.
    pub pagination_config: PaginationConfig,

    /// The catalog database, possibly disconnected.
    pub db: DbConnector,
}

impl AppState {
    /// Create a new [AppState].
    ///
    /// The schema of a connected `db` should already have been created, see
    /// [DbConnector::open].
    pub fn new(db: DbConnector, cookie_secret: &str, pagination_config: PaginationConfig) -> Self {
        Self {
            cookie_key: create_cookie_key(cookie_secret),
            cookie_duration: DEFAULT_COOKIE_DURATION,
            pagination_config,
            db,
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

/// Create a signing key for cookies from a `secret`s string.
pub fn create_cookie_key(secret: &str) -> Key {
    let hash = Sha512::digest(secret);

    Key::from(&hash)
}
