//! Core product domain types.

use std::fmt::Display;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::OffsetDateTime;

use crate::Error;

/// Database identifier for a product, serialized as a string.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ProductId(i64);

impl ProductId {
    /// Create a new product ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Cast the product ID to a 64 bit integer.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl Serialize for ProductId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ProductId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;

        raw.parse().map(Self).map_err(serde::de::Error::custom)
    }
}

/// An item for sale in the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// The product's ID in the application database.
    #[serde(rename = "_id")]
    pub id: ProductId,
    /// The fields an admin can edit.
    #[serde(flatten)]
    pub fields: ProductFields,
    /// When the product was inserted.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// When the product was last changed.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// The validated, editable fields of a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductFields {
    /// The display name.
    pub name: String,
    /// The long description.
    pub description: String,
    /// The price in the smallest currency unit.
    pub price: u64,
    /// The price before a discount, if the product is discounted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<u64>,
    /// The name of the category, matched against category names as is.
    pub category: String,
    /// One of the category's subcategories.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    /// What the product is made of.
    pub fabric: String,
    /// Available sizes, without duplicates.
    pub sizes: Vec<String>,
    /// Available colors, without duplicates.
    pub colors: Vec<String>,
    /// Image URLs, at least one.
    pub images: Vec<String>,
    /// The number of items in stock.
    pub stock: u64,
    /// Whether to show the product on the landing page.
    pub featured: bool,
    /// Search tags, without duplicates.
    pub tags: Vec<String>,
}

/// The JSON body for creating or updating a product.
///
/// Mirrors the admin product form, so every field is optional here and
/// checked by [ProductFields::try_from].
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductForm {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<i64>,
    pub original_price: Option<i64>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub fabric: Option<String>,
    #[serde(default)]
    pub sizes: Vec<String>,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    pub stock: Option<i64>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl TryFrom<ProductForm> for ProductFields {
    type Error = Error;

    /// # Errors
    ///
    /// - [Error::MissingFields] if the name, description, price, category or
    ///   fabric is missing or blank, or there are no images.
    /// - [Error::InvalidNumber] if the price, original price or stock is negative.
    fn try_from(form: ProductForm) -> Result<Self, Self::Error> {
        let images = normalize_list(form.images);

        let (Some(name), Some(description), Some(price), Some(category), Some(fabric)) = (
            non_blank(form.name),
            non_blank(form.description),
            form.price,
            non_blank(form.category),
            non_blank(form.fabric),
        ) else {
            return Err(Error::MissingFields);
        };

        if images.is_empty() {
            return Err(Error::MissingFields);
        }

        Ok(Self {
            name,
            description,
            price: non_negative(price)?,
            original_price: form.original_price.map(non_negative).transpose()?,
            category,
            subcategory: non_blank(form.subcategory),
            fabric,
            sizes: normalize_list(form.sizes),
            colors: normalize_list(form.colors),
            images,
            stock: form.stock.map(non_negative).transpose()?.unwrap_or_default(),
            featured: form.featured,
            tags: normalize_list(form.tags),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

fn non_negative(value: i64) -> Result<u64, Error> {
    u64::try_from(value).map_err(|_| Error::InvalidNumber)
}

/// Trim each entry and drop blank and repeated entries, keeping the first occurrence.
fn normalize_list(values: Vec<String>) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::with_capacity(values.len());

    for value in values {
        let value = value.trim();

        if !value.is_empty() && !normalized.iter().any(|existing| existing == value) {
            normalized.push(value.to_owned());
        }
    }

    normalized
}

#[cfg(test)]
mod product_fields_tests {
    use crate::{
        Error,
        product::{ProductFields, ProductForm},
    };

    fn valid_form() -> ProductForm {
        ProductForm {
            name: Some("Linen Shirt".to_owned()),
            description: Some("A breezy shirt".to_owned()),
            price: Some(250_000),
            original_price: None,
            category: Some("Fashion".to_owned()),
            subcategory: Some("Baju".to_owned()),
            fabric: Some("Linen".to_owned()),
            sizes: vec!["S".to_owned(), "M".to_owned()],
            colors: vec!["White".to_owned()],
            images: vec!["https://example.com/shirt.jpg".to_owned()],
            stock: Some(10),
            featured: false,
            tags: vec![],
        }
    }

    #[test]
    fn valid_form_converts() {
        let got = ProductFields::try_from(valid_form()).unwrap();

        assert_eq!(got.name, "Linen Shirt");
        assert_eq!(got.price, 250_000);
        assert_eq!(got.subcategory.as_deref(), Some("Baju"));
        assert_eq!(got.stock, 10);
    }

    #[test]
    fn each_required_field_is_checked() {
        let cases: [fn(&mut ProductForm); 6] = [
            |form| form.name = None,
            |form| form.description = Some(" ".to_owned()),
            |form| form.price = None,
            |form| form.category = Some(String::new()),
            |form| form.fabric = None,
            |form| form.images = vec!["  ".to_owned()],
        ];

        for (i, clear_field) in cases.iter().enumerate() {
            let mut form = valid_form();
            clear_field(&mut form);

            let got = ProductFields::try_from(form);

            assert_eq!(got, Err(Error::MissingFields), "case {i}");
        }
    }

    #[test]
    fn negative_numbers_are_rejected() {
        let cases: [fn(&mut ProductForm); 3] = [
            |form| form.price = Some(-1),
            |form| form.original_price = Some(-1),
            |form| form.stock = Some(-5),
        ];

        for (i, set_negative) in cases.iter().enumerate() {
            let mut form = valid_form();
            set_negative(&mut form);

            let got = ProductFields::try_from(form);

            assert_eq!(got, Err(Error::InvalidNumber), "case {i}");
        }
    }

    #[test]
    fn stock_defaults_to_zero() {
        let mut form = valid_form();
        form.stock = None;

        let got = ProductFields::try_from(form).unwrap();

        assert_eq!(got.stock, 0);
    }

    #[test]
    fn lists_drop_blank_and_repeated_entries() {
        let mut form = valid_form();
        form.sizes = vec!["M".to_owned(), " S ".to_owned(), "M".to_owned(), "".to_owned()];
        form.tags = vec!["sale".to_owned(), "sale".to_owned()];

        let got = ProductFields::try_from(form).unwrap();

        assert_eq!(got.sizes, ["M", "S"]);
        assert_eq!(got.tags, ["sale"]);
    }

    #[test]
    fn blank_subcategory_is_none() {
        let mut form = valid_form();
        form.subcategory = Some("   ".to_owned());

        let got = ProductFields::try_from(form).unwrap();

        assert_eq!(got.subcategory, None);
    }
}
