//! The token stored in the session cookie.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::auth::{Role, UserID};

/// Who the session belongs to and until when it is valid.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Token {
    /// The logged in user.
    pub user_id: UserID,
    /// The user's role when they logged in.
    pub role: Role,
    /// When the session ends.
    #[serde(with = "time::serde::rfc3339")]
    pub expires_at: OffsetDateTime,
}

impl Token {
    /// Whether the session has ended at `now`.
    pub fn is_expired(&self, now: OffsetDateTime) -> bool {
        self.expires_at <= now
    }
}
