//! Users, their roles, and the user table.

use std::{fmt::Display, str::FromStr};

use rusqlite::{
    Connection, ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};

use crate::{Error, auth::PasswordHash};

/// A newtype wrapper for integer user IDs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct UserID(i64);

impl UserID {
    /// Create a new user ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Cast the user ID to a 64 bit integer.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for UserID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// What a user is allowed to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Store staff, may change the catalog.
    Admin,
    /// A shopper.
    Customer,
}

impl Role {
    /// The role's name as stored in the database and shown in the API.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Customer => "customer",
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "customer" => Ok(Role::Customer),
            other => Err(format!("unknown role {other:?}")),
        }
    }
}

impl ToSql for Role {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Role {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error: String| FromSqlError::Other(error.into()))
    }
}

/// A registered user.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    /// The user's ID in the application database.
    pub id: UserID,
    /// The email the user logs in with.
    pub email: String,
    /// The user's password hash.
    pub password_hash: PasswordHash,
    /// What the user is allowed to do.
    pub role: Role,
}

/// Create the user table.
///
/// Emails are unique ignoring ASCII case.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_user_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS user (
                id INTEGER PRIMARY KEY,
                email TEXT NOT NULL UNIQUE COLLATE NOCASE,
                password TEXT NOT NULL,
                role TEXT NOT NULL DEFAULT 'customer'
                )",
        (),
    )?;

    Ok(())
}

/// Create and insert a new user into the database.
///
/// The email is trimmed before it is stored.
///
/// # Errors
///
/// Returns:
/// - [Error::DuplicateEmail] if the email is already registered.
/// - [Error::SqlError] if an SQL related error occurred.
pub fn create_user(
    email: &str,
    password_hash: PasswordHash,
    role: Role,
    connection: &Connection,
) -> Result<User, Error> {
    let email = email.trim();

    connection.execute(
        "INSERT INTO user (email, password, role) VALUES (?1, ?2, ?3)",
        (email, password_hash.as_ref(), role),
    )?;

    let id = UserID::new(connection.last_insert_rowid());

    Ok(User {
        id,
        email: email.to_owned(),
        password_hash,
        role,
    })
}

/// Get the user registered with `email`, ignoring ASCII case.
///
/// # Errors
///
/// Returns:
/// - [Error::NotFound] if no user has the email.
/// - [Error::SqlError] if an SQL related error occurred.
pub fn get_user_by_email(email: &str, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare("SELECT id, email, password, role FROM user WHERE email = :email")?
        .query_row(&[(":email", email.trim())], |row| {
            let raw_password_hash: String = row.get(2)?;

            Ok(User {
                id: UserID::new(row.get(0)?),
                email: row.get(1)?,
                password_hash: PasswordHash::new_unchecked(&raw_password_hash),
                role: row.get(3)?,
            })
        })
        .map_err(|error| error.into())
}

#[cfg(test)]
mod user_tests {
    use rusqlite::Connection;

    use crate::{
        Error,
        auth::{PasswordHash, Role, create_user, get_user_by_email},
    };

    use super::create_user_table;

    fn get_test_db_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        create_user_table(&connection).expect("Could not create user table");
        connection
    }

    fn hash() -> PasswordHash {
        PasswordHash::new_unchecked("$2b$04$notarealhashbutgoodenoughforthesetests")
    }

    #[test]
    fn create_then_get_user() {
        let connection = get_test_db_connection();

        let created = create_user(" admin@toko.id ", hash(), Role::Admin, &connection).unwrap();
        let got = get_user_by_email("admin@toko.id", &connection).unwrap();

        assert_eq!(created.email, "admin@toko.id");
        assert_eq!(got, created);
    }

    #[test]
    fn email_lookup_ignores_case() {
        let connection = get_test_db_connection();
        let created = create_user("Admin@Toko.id", hash(), Role::Admin, &connection).unwrap();

        let got = get_user_by_email("admin@toko.ID", &connection);

        assert_eq!(got, Ok(created));
    }

    #[test]
    fn duplicate_email_is_rejected() {
        let connection = get_test_db_connection();
        create_user("admin@toko.id", hash(), Role::Admin, &connection).unwrap();

        let got = create_user("ADMIN@toko.id", hash(), Role::Customer, &connection);

        assert_eq!(got, Err(Error::DuplicateEmail));
    }

    #[test]
    fn unknown_email_is_not_found() {
        let connection = get_test_db_connection();

        let got = get_user_by_email("nobody@toko.id", &connection);

        assert_eq!(got, Err(Error::NotFound));
    }

    #[test]
    fn role_round_trips_through_text() {
        for role in [Role::Admin, Role::Customer] {
            assert_eq!(role.as_str().parse::<Role>(), Ok(role));
        }
        assert!("owner".parse::<Role>().is_err());
    }
}
