//! The log-in endpoint.

use axum::{
    Json,
    extract::{FromRef, State, rejection::JsonRejection},
    response::{IntoResponse, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use serde::{Deserialize, Serialize};
use time::Duration;

use crate::{
    AppState, Error,
    auth::{Role, User, cookie::set_session_cookie, get_user_by_email},
    db::DbConnector,
};

/// How long the session cookie should last if the user selects "remember me" at log-in.
const REMEMBER_ME_COOKIE_DURATION: Duration = Duration::days(7);

/// The state needed to perform a login.
#[derive(Debug, Clone)]
pub struct LogInState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The duration for which session cookies are valid.
    pub cookie_duration: Duration,
    /// The catalog database, which also holds the users.
    pub db: DbConnector,
}

impl FromRef<AppState> for LogInState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
            db: state.db.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<LogInState> for Key {
    fn from_ref(state: &LogInState) -> Self {
        state.cookie_key.clone()
    }
}

/// The JSON body of a log-in request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogInData {
    /// Email entered during log-in.
    #[serde(default)]
    pub email: String,
    /// Password entered during log-in.
    #[serde(default)]
    pub password: String,
    /// Whether to keep the session for a week instead of the default duration.
    #[serde(default)]
    pub remember_me: bool,
}

/// The body of a successful log-in response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogInResponse {
    /// The email of the logged in user.
    pub email: String,
    /// The role stored in the session.
    pub role: Role,
}

/// Check the credentials in `data` against the user table.
///
/// # Errors
///
/// Returns:
/// - [Error::MissingFields] if the email or password is empty.
/// - [Error::DatabaseNotConnected] if there is no database.
/// - [Error::InvalidCredentials] if the email is not registered or the password is wrong.
pub fn verify_credentials(data: &LogInData, db: &DbConnector) -> Result<User, Error> {
    if data.email.trim().is_empty() || data.password.is_empty() {
        return Err(Error::MissingFields);
    }

    let connection = db.require()?;

    let user = match get_user_by_email(&data.email, &connection) {
        Ok(user) => user,
        Err(Error::NotFound) => return Err(Error::InvalidCredentials),
        Err(error) => return Err(error),
    };

    match user.password_hash.verify(&data.password) {
        Ok(true) => Ok(user),
        Ok(false) => Err(Error::InvalidCredentials),
        Err(error) => Err(Error::HashingError(error.to_string())),
    }
}

/// Handler for log-in requests.
///
/// On success the session cookie is set and the user's email and role are
/// returned.
pub async fn post_log_in(
    State(state): State<LogInState>,
    jar: PrivateCookieJar,
    body: Result<Json<LogInData>, JsonRejection>,
) -> Response {
    let data = match body {
        Ok(Json(data)) => data,
        Err(rejection) => {
            tracing::warn!("Could not parse log-in body: {rejection}");
            return Error::InvalidBody(rejection.body_text()).into_response();
        }
    };

    let user = match verify_credentials(&data, &state.db) {
        Ok(user) => user,
        Err(error) => {
            if error == Error::InvalidCredentials {
                tracing::info!("Failed log-in attempt for {:?}", data.email);
            }
            return error.into_api_response("Failed to log in");
        }
    };

    let cookie_duration = if data.remember_me {
        REMEMBER_ME_COOKIE_DURATION
    } else {
        state.cookie_duration
    };

    match set_session_cookie(jar, user.id, user.role, cookie_duration) {
        Ok(jar) => {
            tracing::info!("User {} logged in as {}", user.id, user.role);
            (
                jar,
                Json(LogInResponse {
                    email: user.email,
                    role: user.role,
                }),
            )
                .into_response()
        }
        Err(error) => error.into_api_response("Failed to log in"),
    }
}
