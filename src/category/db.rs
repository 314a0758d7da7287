//! Database operations for categories.

use rusqlite::{Connection, OptionalExtension, Row, named_params};

use crate::{
    Error,
    category::{Category, CategoryId, CategoryName, CategoryQuery, NewCategory},
    db::{json_column_from_row, timestamp_error, to_json_column},
    timestamp::{self, now_utc, to_db_text},
};

const CATEGORY_COLUMNS: &str =
    "id, name, description, subcategories, is_active, created_at, updated_at";

/// Insert an active category and return it with its generated ID.
///
/// # Errors
///
/// Returns [Error::DuplicateCategoryName] if an active category with the same
/// name, ignoring case, already exists.
pub fn create_category(new_category: NewCategory, connection: &Connection) -> Result<Category, Error> {
    let now = now_utc();
    let timestamp = to_db_text(now).map_err(timestamp_error)?;

    connection.execute(
        "INSERT INTO category (
            name, name_normalized, description, description_normalized,
            subcategories, is_active, created_at, updated_at
        )
        VALUES (:name, :name_normalized, :description, :description_normalized,
            :subcategories, 1, :timestamp, :timestamp);",
        named_params! {
            ":name": new_category.name.as_ref(),
            ":name_normalized": fold_case(new_category.name.as_ref()),
            ":description": &new_category.description,
            ":description_normalized": fold_case(&new_category.description),
            ":subcategories": to_json_column(&new_category.subcategories)?,
            ":timestamp": &timestamp,
        },
    )?;

    let id = CategoryId::new(connection.last_insert_rowid());

    Ok(Category {
        id,
        name: new_category.name,
        description: new_category.description,
        subcategories: new_category.subcategories,
        product_count: 0,
        is_active: true,
        created_at: now,
        updated_at: now,
    })
}

/// Find the active category whose name equals `name` ignoring case.
pub fn find_active_category_by_name(
    name: &CategoryName,
    connection: &Connection,
) -> Result<Option<Category>, Error> {
    connection
        .prepare(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM category
            WHERE is_active = 1 AND name_normalized = ?1;"
        ))?
        .query_row([fold_case(name.as_ref())], map_row)
        .optional()
        .map_err(|error| error.into())
}

/// Get one page of active categories matching `query.search`, ordered by the
/// query's sort field.
///
/// Equal sort keys are ordered by ID in the same direction so that pages do
/// not overlap. The returned categories have a product count of zero.
pub fn get_active_categories(
    query: &CategoryQuery,
    connection: &Connection,
) -> Result<Vec<Category>, Error> {
    let column = query.sort_field.column();
    let direction = query.sort_order.keyword();
    let limit = i64::try_from(query.page.limit()).unwrap_or(i64::MAX);
    let offset = i64::try_from(query.page.offset()).unwrap_or(i64::MAX);

    connection
        .prepare(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM category
            WHERE is_active = 1
                AND (name_normalized LIKE :pattern ESCAPE '\\'
                    OR description_normalized LIKE :pattern ESCAPE '\\')
            ORDER BY {column} {direction}, id {direction}
            LIMIT :limit OFFSET :offset;"
        ))?
        .query_map(
            named_params! {
                ":pattern": search_pattern(&query.search),
                ":limit": limit,
                ":offset": offset,
            },
            map_row,
        )?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

/// Count the active categories matching `search`.
pub fn count_active_categories(search: &str, connection: &Connection) -> Result<u64, Error> {
    let count: i64 = connection.query_row(
        "SELECT COUNT(id) FROM category
        WHERE is_active = 1
            AND (name_normalized LIKE :pattern ESCAPE '\\'
                OR description_normalized LIKE :pattern ESCAPE '\\');",
        named_params! { ":pattern": search_pattern(search) },
        |row| row.get(0),
    )?;

    Ok(u64::try_from(count).unwrap_or_default())
}

/// Initialize the category table and indexes.
///
/// The `*_normalized` columns hold the case-folded name and description. The
/// partial unique index on the folded name allows one active category per
/// name, ignoring case, and any number of inactive ones.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS category (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            name_normalized TEXT NOT NULL,
            description TEXT NOT NULL,
            description_normalized TEXT NOT NULL,
            subcategories TEXT NOT NULL DEFAULT '[]',
            is_active INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE UNIQUE INDEX IF NOT EXISTS idx_category_active_name
            ON category(name_normalized) WHERE is_active = 1;
        CREATE INDEX IF NOT EXISTS idx_category_created_at ON category(created_at);",
    )?;

    Ok(())
}

/// Fold `text` for case-insensitive comparison.
///
/// SQLite's `NOCASE` and `LIKE` only fold ASCII letters, so names and
/// descriptions are stored folded alongside the original text.
pub(crate) fn fold_case(text: &str) -> String {
    text.to_lowercase()
}

/// Build a LIKE pattern that matches the folded `search` literally anywhere in
/// a folded string.
fn search_pattern(search: &str) -> String {
    let mut pattern = String::with_capacity(search.len() + 2);
    pattern.push('%');

    for c in fold_case(search).chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }

    pattern.push('%');
    pattern
}

fn map_row(row: &Row) -> Result<Category, rusqlite::Error> {
    let raw_name: String = row.get(1)?;

    Ok(Category {
        id: CategoryId::new(row.get(0)?),
        name: CategoryName::new_unchecked(&raw_name),
        description: row.get(2)?,
        subcategories: json_column_from_row(row, 3)?,
        product_count: 0,
        is_active: row.get(4)?,
        created_at: timestamp::from_row(row, 5)?,
        updated_at: timestamp::from_row(row, 6)?,
    })
}
