//! Users, log in and log out, and the session check used by admin endpoints.

mod cookie;
mod log_in;
mod log_out;
mod password;
mod session;
mod token;
mod user;

pub(crate) use cookie::DEFAULT_COOKIE_DURATION;
pub use log_in::post_log_in;
pub use log_out::post_log_out;
pub use password::{PasswordHash, ValidatedPassword};
pub use session::AdminSession;
pub use token::Token;
pub use user::{Role, User, UserID, create_user, create_user_table, get_user_by_email};

#[cfg(test)]
pub(crate) use cookie::{COOKIE_TOKEN, set_session_cookie};
