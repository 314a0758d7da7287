//! Products in the catalog and the endpoints behind the admin product form.

mod create;
mod db;
mod domain;
mod edit;
mod get;

pub use create::create_product_endpoint;
pub use db::{ProductCounter, create_product, create_product_table, get_product, update_product};
pub use domain::{Product, ProductFields, ProductForm, ProductId};
pub use edit::update_product_endpoint;
pub use get::get_product_endpoint;
