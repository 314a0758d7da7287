use std::{error::Error, io, path::Path, process::exit};

use clap::Parser;
use rusqlite::Connection;

use storefront_rs::{PasswordHash, Role, ValidatedPassword, create_user, initialize_db};

/// A utility for registering an admin account that can edit the catalog.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long)]
    db_path: String,

    /// The email the admin logs in with.
    #[arg(long)]
    email: String,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let db_path = Path::new(&args.db_path);
    validate_db_path(db_path);

    let email = args.email.trim();
    if email.is_empty() {
        print_error("Email must not be empty.");
        exit(1);
    }

    println!("Creating admin {email} in {db_path:#?}");

    let Some(password_hash) = get_new_password_hash(email) else {
        return Ok(());
    };

    let connection = Connection::open(db_path)?;
    initialize_db(&connection)?;

    match create_user(email, password_hash, Role::Admin, &connection) {
        Ok(user) => {
            println!("Created admin with ID {}.", user.id);
            Ok(())
        }
        Err(error) => {
            print_error(&error);
            exit(1);
        }
    }
}

fn validate_db_path(db_path: &Path) {
    match db_path.extension() {
        Some(extension) if !extension.is_empty() => {}
        _ => {
            print_error("Database path must include a file extension (e.g., 'store.db').");
            exit(1);
        }
    }
}

fn prompt(message: &str) -> Option<String> {
    match rpassword::prompt_password(message) {
        Ok(password) => Some(password),
        Err(error) if error.kind() == io::ErrorKind::UnexpectedEof => None,
        Err(error) => {
            print_error(format!("Could not read password from stdin: {error}"));
            None
        }
    }
}

fn get_new_password_hash(email: &str) -> Option<PasswordHash> {
    loop {
        println!();

        let first_password = prompt("Enter a password: ")?;

        let validated_password = match ValidatedPassword::new(&first_password, &[email]) {
            Ok(password) => password,
            Err(error) => {
                print_error(error);
                continue;
            }
        };

        let second_password = prompt("Enter the same password again: ")?;

        if first_password != second_password {
            print_error("Passwords must match, try again.");
            continue;
        }

        match PasswordHash::new(validated_password, PasswordHash::DEFAULT_COST) {
            Ok(password_hash) => return Some(password_hash),
            Err(error) => {
                print_error(format!("Could not hash password: {error}. Try again."));
            }
        }
    }
}

fn print_error(error: impl ToString) {
    eprintln!(
        "\x1b[31;1m{}\x1b[0m",
        capitalise_first_char(&error.to_string())
    )
}

/// From https://crates.io/crates/capitalize
fn capitalise_first_char(string: &str) -> String {
    let mut chars = string.chars();
    let Some(first) = chars.next() else {
        return String::with_capacity(0);
    };
    first.to_uppercase().chain(chars).collect()
}
