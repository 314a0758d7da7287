//! Database operations for products.

use rusqlite::{Connection, Row};

use crate::{
    Error,
    db::{json_column_from_row, timestamp_error, to_json_column},
    product::{Product, ProductFields, ProductId},
    timestamp::{self, now_utc, to_db_text},
};

const PRODUCT_COLUMNS: &str = "id, name, description, price, original_price, category, \
    subcategory, fabric, sizes, colors, images, stock, featured, tags, created_at, updated_at";

/// Counts the products in a category.
///
/// This is the seam the category listing uses for its per-category counts.
pub trait ProductCounter {
    /// Count the products whose category is exactly `category_name`.
    ///
    /// # Errors
    ///
    /// Returns an error if the products could not be counted.
    fn count_products_in_category(&self, category_name: &str) -> Result<u64, Error>;
}

impl ProductCounter for Connection {
    fn count_products_in_category(&self, category_name: &str) -> Result<u64, Error> {
        let count: i64 = self.query_row(
            "SELECT COUNT(id) FROM product WHERE category = ?1;",
            [category_name],
            |row| row.get(0),
        )?;

        Ok(u64::try_from(count).unwrap_or_default())
    }
}

/// Insert a product and return it with its generated ID.
pub fn create_product(fields: ProductFields, connection: &Connection) -> Result<Product, Error> {
    let now = now_utc();
    let timestamp = to_db_text(now).map_err(timestamp_error)?;

    connection.execute(
        "INSERT INTO product (name, description, price, original_price, category, subcategory,
            fabric, sizes, colors, images, stock, featured, tags, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?14);",
        rusqlite::params![
            &fields.name,
            &fields.description,
            to_sql_integer(fields.price)?,
            fields.original_price.map(to_sql_integer).transpose()?,
            &fields.category,
            &fields.subcategory,
            &fields.fabric,
            to_json_column(&fields.sizes)?,
            to_json_column(&fields.colors)?,
            to_json_column(&fields.images)?,
            to_sql_integer(fields.stock)?,
            fields.featured,
            to_json_column(&fields.tags)?,
            &timestamp,
        ],
    )?;

    let id = ProductId::new(connection.last_insert_rowid());

    Ok(Product {
        id,
        fields,
        created_at: now,
        updated_at: now,
    })
}

/// Retrieve a single product by ID.
///
/// # Errors
///
/// Returns [Error::ProductNotFound] if there is no product with the ID.
pub fn get_product(product_id: ProductId, connection: &Connection) -> Result<Product, Error> {
    connection
        .prepare(&format!("SELECT {PRODUCT_COLUMNS} FROM product WHERE id = :id;"))?
        .query_row(&[(":id", &product_id.as_i64())], map_row)
        .map_err(|error| match Error::from(error) {
            Error::NotFound => Error::ProductNotFound,
            error => error,
        })
}

/// Replace the editable fields of a product and return the updated product.
///
/// # Errors
///
/// Returns [Error::ProductNotFound] if there is no product with the ID.
pub fn update_product(
    product_id: ProductId,
    fields: ProductFields,
    connection: &Connection,
) -> Result<Product, Error> {
    let timestamp = to_db_text(now_utc()).map_err(timestamp_error)?;

    let rows_affected = connection.execute(
        "UPDATE product SET name = ?1, description = ?2, price = ?3, original_price = ?4,
            category = ?5, subcategory = ?6, fabric = ?7, sizes = ?8, colors = ?9, images = ?10,
            stock = ?11, featured = ?12, tags = ?13, updated_at = ?14
        WHERE id = ?15;",
        rusqlite::params![
            &fields.name,
            &fields.description,
            to_sql_integer(fields.price)?,
            fields.original_price.map(to_sql_integer).transpose()?,
            &fields.category,
            &fields.subcategory,
            &fields.fabric,
            to_json_column(&fields.sizes)?,
            to_json_column(&fields.colors)?,
            to_json_column(&fields.images)?,
            to_sql_integer(fields.stock)?,
            fields.featured,
            to_json_column(&fields.tags)?,
            &timestamp,
            product_id.as_i64(),
        ],
    )?;

    if rows_affected == 0 {
        return Err(Error::ProductNotFound);
    }

    get_product(product_id, connection)
}

/// Initialize the product table and indexes.
pub fn create_product_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS product (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            description TEXT NOT NULL,
            price INTEGER NOT NULL,
            original_price INTEGER,
            category TEXT NOT NULL,
            subcategory TEXT,
            fabric TEXT NOT NULL,
            sizes TEXT NOT NULL DEFAULT '[]',
            colors TEXT NOT NULL DEFAULT '[]',
            images TEXT NOT NULL DEFAULT '[]',
            stock INTEGER NOT NULL DEFAULT 0,
            featured INTEGER NOT NULL DEFAULT 0,
            tags TEXT NOT NULL DEFAULT '[]',
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_product_category ON product(category);",
    )?;

    Ok(())
}

fn to_sql_integer(value: u64) -> Result<i64, Error> {
    i64::try_from(value).map_err(|_| Error::InvalidNumber)
}

fn map_row(row: &Row) -> Result<Product, rusqlite::Error> {
    let price: i64 = row.get(3)?;
    let original_price: Option<i64> = row.get(4)?;
    let stock: i64 = row.get(11)?;

    Ok(Product {
        id: ProductId::new(row.get(0)?),
        fields: ProductFields {
            name: row.get(1)?,
            description: row.get(2)?,
            price: u64::try_from(price).unwrap_or_default(),
            original_price: original_price.and_then(|price| u64::try_from(price).ok()),
            category: row.get(5)?,
            subcategory: row.get(6)?,
            fabric: row.get(7)?,
            sizes: json_column_from_row(row, 8)?,
            colors: json_column_from_row(row, 9)?,
            images: json_column_from_row(row, 10)?,
            stock: u64::try_from(stock).unwrap_or_default(),
            featured: row.get(12)?,
            tags: json_column_from_row(row, 13)?,
        },
        created_at: timestamp::from_row(row, 14)?,
        updated_at: timestamp::from_row(row, 15)?,
    })
}
