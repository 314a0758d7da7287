//! Reading and writing the private session cookie.

use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, SameSite},
};
use time::{Duration, OffsetDateTime};

use crate::{
    Error,
    auth::{Role, Token, UserID},
};

/// The name of the cookie holding the serialized [Token].
pub(crate) const COOKIE_TOKEN: &str = "token";
/// How long a session lasts unless the user asks to be remembered.
pub(crate) const DEFAULT_COOKIE_DURATION: Duration = Duration::hours(1);

/// Add the session cookie for `user_id` to `jar`, valid for `duration` from now.
///
/// # Errors
///
/// Returns [Error::JSONSerializationError] if the token cannot be serialized.
pub(crate) fn set_session_cookie(
    jar: PrivateCookieJar,
    user_id: UserID,
    role: Role,
    duration: Duration,
) -> Result<PrivateCookieJar, Error> {
    let expires_at = OffsetDateTime::now_utc() + duration;
    let token = Token {
        user_id,
        role,
        expires_at,
    };
    let token_string = serde_json::to_string(&token)
        .map_err(|error| Error::JSONSerializationError(error.to_string()))?;

    Ok(jar.add(
        Cookie::build((COOKIE_TOKEN, token_string))
            .path("/")
            .expires(expires_at)
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true),
    ))
}

/// Overwrite the session cookie with an expired one so that the client drops it.
pub(crate) fn invalidate_session_cookie(jar: PrivateCookieJar) -> PrivateCookieJar {
    jar.add(
        Cookie::build((COOKIE_TOKEN, "deleted"))
            .path("/")
            .expires(OffsetDateTime::UNIX_EPOCH)
            .max_age(Duration::ZERO)
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true),
    )
}

/// Read the session token from `jar`.
///
/// # Errors
///
/// Returns [Error::Unauthorized] if the cookie is missing, could not be
/// decrypted, does not hold a token or the token has expired.
pub(crate) fn get_token_from_cookies(jar: &PrivateCookieJar) -> Result<Token, Error> {
    let cookie = jar.get(COOKIE_TOKEN).ok_or(Error::Unauthorized)?;

    let token: Token = serde_json::from_str(cookie.value_trimmed()).map_err(|error| {
        tracing::debug!("Could not parse session token: {error}");
        Error::Unauthorized
    })?;

    if token.is_expired(OffsetDateTime::now_utc()) {
        tracing::debug!("Session for user {} expired at {}", token.user_id, token.expires_at);
        return Err(Error::Unauthorized);
    }

    Ok(token)
}

#[cfg(test)]
mod cookie_tests {
    use axum_extra::extract::{
        PrivateCookieJar,
        cookie::{Cookie, Key},
    };
    use sha2::{Digest, Sha512};
    use time::{Duration, OffsetDateTime};

    use crate::{
        Error,
        auth::{Role, UserID},
    };

    use super::{
        COOKIE_TOKEN, DEFAULT_COOKIE_DURATION, get_token_from_cookies, invalidate_session_cookie,
        set_session_cookie,
    };

    fn get_jar() -> PrivateCookieJar {
        let hash = Sha512::digest(b"foobar");
        let key = Key::from(&hash);

        PrivateCookieJar::new(key)
    }

    #[test]
    fn can_read_back_token() {
        let jar = set_session_cookie(get_jar(), UserID::new(7), Role::Admin, DEFAULT_COOKIE_DURATION)
            .unwrap();

        let token = get_token_from_cookies(&jar).unwrap();

        assert_eq!(token.user_id, UserID::new(7));
        assert_eq!(token.role, Role::Admin);
        let want_expiry = OffsetDateTime::now_utc() + DEFAULT_COOKIE_DURATION;
        assert!((token.expires_at - want_expiry).abs() < Duration::seconds(1));
    }

    #[test]
    fn missing_cookie_is_unauthorized() {
        assert_eq!(get_token_from_cookies(&get_jar()), Err(Error::Unauthorized));
    }

    #[test]
    fn expired_token_is_unauthorized() {
        let jar = set_session_cookie(
            get_jar(),
            UserID::new(7),
            Role::Admin,
            Duration::seconds(-1),
        )
        .unwrap();

        assert_eq!(get_token_from_cookies(&jar), Err(Error::Unauthorized));
    }

    #[test]
    fn garbage_token_is_unauthorized() {
        let jar = get_jar().add(Cookie::new(COOKIE_TOKEN, "not a token"));

        assert_eq!(get_token_from_cookies(&jar), Err(Error::Unauthorized));
    }

    #[test]
    fn invalidated_cookie_is_expired() {
        let jar = set_session_cookie(get_jar(), UserID::new(7), Role::Admin, DEFAULT_COOKIE_DURATION)
            .unwrap();

        let jar = invalidate_session_cookie(jar);
        let cookie = jar.get(COOKIE_TOKEN).unwrap();

        assert_eq!(cookie.max_age(), Some(Duration::ZERO));
        assert_eq!(cookie.expires_datetime(), Some(OffsetDateTime::UNIX_EPOCH));
        assert_eq!(get_token_from_cookies(&jar), Err(Error::Unauthorized));
    }
}
