//! Conversions between timestamps and the text stored in the database.

use rusqlite::{Row, types::Type};
use time::{
    OffsetDateTime, PrimitiveDateTime, format_description::BorrowedFormatItem,
    macros::format_description,
};

/// Fixed width UTC format so that timestamps sort correctly as text,
/// e.g. "2025-01-31T09:05:00.123456Z".
const DB_TIMESTAMP_FORMAT: &[BorrowedFormatItem] = format_description!(
    "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:6]Z"
);

/// The current UTC time truncated to the microsecond precision of the stored format.
pub fn now_utc() -> OffsetDateTime {
    let now = OffsetDateTime::now_utc();

    now.replace_microsecond(now.microsecond()).unwrap_or(now)
}

/// Format `timestamp` for storing in the database.
pub fn to_db_text(timestamp: OffsetDateTime) -> Result<String, time::error::Format> {
    timestamp
        .to_offset(time::UtcOffset::UTC)
        .format(DB_TIMESTAMP_FORMAT)
}

/// Read the timestamp stored in column `index` of `row`.
pub fn from_row(row: &Row, index: usize) -> Result<OffsetDateTime, rusqlite::Error> {
    let text: String = row.get(index)?;

    PrimitiveDateTime::parse(&text, DB_TIMESTAMP_FORMAT)
        .map(PrimitiveDateTime::assume_utc)
        .map_err(|error| rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(error)))
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use time::macros::datetime;

    use super::{from_row, now_utc, to_db_text};

    #[test]
    fn formats_with_fixed_width() {
        let timestamp = datetime!(2025-01-02 03:04:05.5 UTC);

        let text = to_db_text(timestamp).unwrap();

        assert_eq!(text, "2025-01-02T03:04:05.500000Z");
    }

    #[test]
    fn converts_to_utc_before_formatting() {
        let timestamp = datetime!(2025-01-02 13:00:00 +12:00);

        let text = to_db_text(timestamp).unwrap();

        assert_eq!(text, "2025-01-02T01:00:00.000000Z");
    }

    #[test]
    fn reads_back_what_was_written() {
        let connection = Connection::open_in_memory().unwrap();
        let want = now_utc();
        let text = to_db_text(want).unwrap();

        let got = connection
            .query_row("SELECT ?1", (text,), |row| from_row(row, 0))
            .unwrap();

        assert_eq!(want, got);
    }

    #[test]
    fn rejects_malformed_text() {
        let connection = Connection::open_in_memory().unwrap();

        let got = connection.query_row("SELECT 'yesterday'", [], |row| from_row(row, 0));

        assert!(got.is_err());
    }
}
