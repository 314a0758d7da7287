//! The fixed categories served when the server runs without a database.

use std::sync::LazyLock;

use crate::{
    category::{Category, CategoryId, CategoryName, CategoryPage, CategoryQuery, db::fold_case},
    timestamp::now_utc,
};

struct DemoCategory {
    name: &'static str,
    description: &'static str,
    subcategories: &'static [&'static str],
    product_count: u64,
}

const DEMO_CATEGORY_DATA: [DemoCategory; 3] = [
    DemoCategory {
        name: "Elektronik",
        description: "Perangkat elektronik dan gadget",
        subcategories: &["Smartphone", "Laptop", "Tablet"],
        product_count: 15,
    },
    DemoCategory {
        name: "Fashion",
        description: "Pakaian dan aksesoris fashion",
        subcategories: &["Baju", "Celana", "Sepatu", "Tas"],
        product_count: 8,
    },
    DemoCategory {
        name: "Rumah Tangga",
        description: "Peralatan dan perlengkapan rumah tangga",
        subcategories: &["Dapur", "Kamar Mandi"],
        product_count: 12,
    },
];

/// The demo categories, built once on first use and never modified.
pub static DEMO_CATEGORIES: LazyLock<Vec<Category>> = LazyLock::new(|| {
    let created_at = now_utc();

    DEMO_CATEGORY_DATA
        .iter()
        .zip(1..)
        .map(|(demo, id)| Category {
            id: CategoryId::new(id),
            name: CategoryName::new_unchecked(demo.name),
            description: demo.description.to_owned(),
            subcategories: demo.subcategories.iter().map(|&s| s.to_owned()).collect(),
            product_count: demo.product_count,
            is_active: true,
            created_at,
            updated_at: created_at,
        })
        .collect()
});

/// Filter and paginate the demo categories.
///
/// `search` matches a case-insensitive substring of the name or description.
/// Sorting is ignored, the demo categories keep their built-in order.
pub fn query_demo_categories(query: &CategoryQuery) -> CategoryPage {
    let search = fold_case(&query.search);
    let matches: Vec<Category> = DEMO_CATEGORIES
        .iter()
        .filter(|category| {
            search.is_empty()
                || fold_case(category.name.as_ref()).contains(&search)
                || fold_case(&category.description).contains(&search)
        })
        .cloned()
        .collect();

    let total_categories = matches.len() as u64;

    CategoryPage {
        categories: query.page.slice(&matches).to_vec(),
        current_page: query.page.page(),
        total_pages: query.page.page_count(total_categories),
        total_categories,
        is_demo: true,
        error: None,
    }
}
