//! Extractor that only lets admins through.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};

use crate::{
    Error,
    auth::{Role, Token, cookie::get_token_from_cookies},
};

/// A valid, unexpired session belonging to an admin.
///
/// Handlers that take this extractor reject the request with 401 before any
/// other extractor or the handler body runs. Only the encrypted cookie is
/// read, the database is not consulted.
#[derive(Debug, Clone, PartialEq)]
pub struct AdminSession(pub Token);

impl<S> FromRequestParts<S> for AdminSession
where
    S: Send + Sync,
    Key: FromRef<S>,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Ok(jar) = PrivateCookieJar::<Key>::from_request_parts(parts, state).await;

        let token = get_token_from_cookies(&jar)?;

        if token.role != Role::Admin {
            tracing::warn!(
                "User {} with role {} tried to access {}",
                token.user_id,
                token.role,
                parts.uri.path()
            );
            return Err(Error::Unauthorized);
        }

        Ok(Self(token))
    }
}
