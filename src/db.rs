//! Access to the shared database connection and creation of the schema.

use std::{
    path::Path,
    sync::{Arc, Mutex, MutexGuard},
};

use rusqlite::{Connection, Row, types::Type};

use crate::{
    Error, auth::create_user_table, category::create_category_table,
    product::create_product_table,
};

/// Hands out the shared connection to the catalog database.
///
/// A connector may be disconnected, which means the server was started
/// without a usable database. Callers decide whether that is an error
/// (writes) or a reason to serve fallback data (category listing).
#[derive(Debug, Clone, Default)]
pub struct DbConnector {
    connection: Option<Arc<Mutex<Connection>>>,
}

impl DbConnector {
    /// Create a connector around an open connection.
    ///
    /// The caller should ensure that the schema has been created with [initialize].
    pub fn connected(connection: Connection) -> Self {
        Self {
            connection: Some(Arc::new(Mutex::new(connection))),
        }
    }

    /// Create a connector with no database behind it.
    pub fn disconnected() -> Self {
        Self { connection: None }
    }

    /// Open the SQLite database at `db_path` and create any missing tables.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened as a database or the
    /// schema cannot be created.
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self, Error> {
        let connection = Connection::open(db_path)?;
        initialize(&connection)?;

        Ok(Self::connected(connection))
    }

    /// Whether there is a database behind this connector.
    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    /// Acquire the database connection.
    ///
    /// Returns `Ok(None)` if there is no database.
    ///
    /// # Errors
    ///
    /// Returns [Error::DatabaseLockError] if the lock has been poisoned.
    pub fn connect(&self) -> Result<Option<MutexGuard<'_, Connection>>, Error> {
        let Some(connection) = &self.connection else {
            return Ok(None);
        };

        match connection.lock() {
            Ok(guard) => Ok(Some(guard)),
            Err(error) => {
                tracing::error!("could not acquire database lock: {error}");
                Err(Error::DatabaseLockError)
            }
        }
    }

    /// Acquire the database connection, treating a missing database as an error.
    ///
    /// # Errors
    ///
    /// Returns [Error::DatabaseNotConnected] if there is no database, or
    /// [Error::DatabaseLockError] if the lock has been poisoned.
    pub fn require(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.connect()?.ok_or(Error::DatabaseNotConnected)
    }
}

/// Create the tables for the domain models if they do not exist yet.
///
/// # Errors
/// Returns an error if a table could not be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction = connection.unchecked_transaction()?;

    create_user_table(&transaction)?;
    create_category_table(&transaction)?;
    create_product_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}

/// Encode a list of strings for a TEXT column.
pub(crate) fn to_json_column(values: &[String]) -> Result<String, Error> {
    serde_json::to_string(values).map_err(|error| Error::JSONSerializationError(error.to_string()))
}

/// Decode the list of strings stored in column `index` of `row`.
pub(crate) fn json_column_from_row(row: &Row, index: usize) -> Result<Vec<String>, rusqlite::Error> {
    let text: String = row.get(index)?;

    serde_json::from_str(&text)
        .map_err(|error| rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(error)))
}

/// Map the error from formatting a timestamp for the database.
pub(crate) fn timestamp_error(error: time::error::Format) -> Error {
    Error::InvalidDateFormat(error.to_string())
}
