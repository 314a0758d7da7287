//! The category taxonomy of the catalog.

mod create;
mod db;
mod demo;
mod domain;
mod list;

pub use create::create_category_endpoint;
pub use db::{
    count_active_categories, create_category, create_category_table,
    find_active_category_by_name, get_active_categories,
};
pub use domain::{Category, CategoryForm, CategoryId, CategoryName, NewCategory};
pub use list::{CategoryPage, CategoryQuery, get_categories_endpoint};
