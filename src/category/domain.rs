//! Core category domain types.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use time::OffsetDateTime;

use crate::Error;

/// Database identifier for a category.
///
/// Serialized as a string so that clients treat it as opaque.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CategoryId(i64);

impl CategoryId {
    /// Create a new category ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Cast the category ID to a 64 bit integer.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for CategoryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl Serialize for CategoryId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for CategoryId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;

        raw.parse().map(Self).map_err(serde::de::Error::custom)
    }
}

/// A validated, non-empty category name with surrounding whitespace removed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct CategoryName(String);

impl CategoryName {
    /// Create a category name.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::MissingFields] if `name` is empty
    /// or only whitespace.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            Err(Error::MissingFields)
        } else {
            Ok(Self(name.to_string()))
        }
    }

    /// Create a category name without validation.
    ///
    /// The caller should ensure that the string is not empty.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for CategoryName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CategoryName::new(s)
    }
}

impl Display for CategoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A group of products in the catalog, e.g. 'Fashion'.
///
/// Products refer to their category by name, see [Category::product_count].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// The category's ID in the application database.
    #[serde(rename = "_id")]
    pub id: CategoryId,
    /// The unique (ignoring case) display name.
    pub name: CategoryName,
    /// A short description shown next to the name.
    pub description: String,
    /// Names of the subcategories in display order.
    pub subcategories: Vec<String>,
    /// The number of products whose category is exactly this category's name.
    ///
    /// This is computed whenever categories are read and is never stored.
    pub product_count: u64,
    /// Inactive categories are hidden from listings.
    pub is_active: bool,
    /// When the category was inserted.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// When the category was last changed.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// The validated fields needed to insert a category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCategory {
    /// The trimmed, non-empty name.
    pub name: CategoryName,
    /// The trimmed, non-empty description.
    pub description: String,
    /// Subcategory names as given by the client.
    pub subcategories: Vec<String>,
}

/// The JSON body for creating a category.
///
/// Fields are optional here so that a missing field is reported as
/// [Error::MissingFields] rather than a deserialization error.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CategoryForm {
    /// The category name.
    pub name: Option<String>,
    /// The category description.
    pub description: Option<String>,
    /// Any JSON value, only arrays are used.
    pub subcategories: Option<Value>,
}

impl TryFrom<CategoryForm> for NewCategory {
    type Error = Error;

    fn try_from(form: CategoryForm) -> Result<Self, Self::Error> {
        let name = CategoryName::new(form.name.as_deref().unwrap_or_default())?;
        let description = form.description.as_deref().map(str::trim).unwrap_or_default();

        if description.is_empty() {
            return Err(Error::MissingFields);
        }

        Ok(Self {
            name,
            description: description.to_owned(),
            subcategories: subcategories_from_json(form.subcategories),
        })
    }
}

/// Use `value` as the subcategory list if it is an array, otherwise use an empty list.
///
/// Strings are kept as is, numbers and booleans are converted to strings and
/// any other element is dropped.
fn subcategories_from_json(value: Option<Value>) -> Vec<String> {
    let Some(Value::Array(values)) = value else {
        return Vec::new();
    };

    values
        .into_iter()
        .filter_map(|value| match value {
            Value::String(string) => Some(string),
            Value::Number(number) => Some(number.to_string()),
            Value::Bool(boolean) => Some(boolean.to_string()),
            _ => None,
        })
        .collect()
}
