use std::{error::Error, path::Path, process::exit};

use clap::Parser;
use rusqlite::Connection;

use storefront_rs::{
    CategoryName, NewCategory, PasswordHash, ProductFields, Role, ValidatedPassword,
    create_category, create_product, create_user, initialize_db,
};

/// A utility for creating a seeded test database for the storefront API server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

const CATEGORIES: [(&str, &str, &[&str]); 4] = [
    ("Fashion", "Pakaian pria dan wanita", &["Baju", "Celana", "Sepatu"]),
    ("Batik", "Kain dan pakaian batik", &["Kemeja", "Kain"]),
    ("Aksesoris", "Tas, topi dan perhiasan", &["Tas", "Topi"]),
    ("Rumah Tangga", "Tekstil untuk rumah", &["Sprei", "Gorden"]),
];

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        Some(extension) if !extension.is_empty() => {}
        _ => {
            eprintln!("Output path must include a file extension (e.g., 'store.db').");
            exit(1);
        }
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating test users admin@test.local and customer@test.local with password 'test'...");

    for (email, role) in [
        ("admin@test.local", Role::Admin),
        ("customer@test.local", Role::Customer),
    ] {
        let password_hash = PasswordHash::new(
            ValidatedPassword::new_unchecked("test"),
            PasswordHash::DEFAULT_COST,
        )?;
        create_user(email, password_hash, role, &conn)?;
    }

    println!("Creating categories and products...");

    for (name, description, subcategories) in CATEGORIES {
        create_category(
            NewCategory {
                name: CategoryName::new_unchecked(name),
                description: description.to_owned(),
                subcategories: subcategories.iter().map(|s| s.to_string()).collect(),
            },
            &conn,
        )?;

        for (i, subcategory) in subcategories.iter().enumerate() {
            let product_name = format!("{subcategory} {name}");
            let price = 100_000 + 25_000 * i as u64;

            create_product(
                ProductFields {
                    name: product_name.clone(),
                    description: format!("{product_name} untuk pengujian"),
                    price,
                    original_price: (i % 2 == 0).then_some(price + 50_000),
                    category: name.to_owned(),
                    subcategory: Some(subcategory.to_string()),
                    fabric: "Katun".to_owned(),
                    sizes: vec!["S".to_owned(), "M".to_owned(), "L".to_owned()],
                    colors: vec!["Hitam".to_owned(), "Putih".to_owned()],
                    images: vec![format!("https://picsum.photos/seed/{name}{i}/600/800")],
                    stock: 10 * (i as u64 + 1),
                    featured: i == 0,
                    tags: vec![name.to_lowercase()],
                },
                &conn,
            )?;
        }
    }

    println!("Success!");

    Ok(())
}
