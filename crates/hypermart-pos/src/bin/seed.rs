//! # Seed Data Generator
//!
//! Populates the database with the demo catalog, user accounts, and
//! store settings for development.
//!
//! ## Usage
//! ```bash
//! # Seed the default database (./hypermart.db)
//! cargo run -p hypermart-pos --bin seed
//!
//! # Specify database path
//! cargo run -p hypermart-pos --bin seed -- --db ./data/hypermart.db
//!
//! # Generate more demo sales history
//! cargo run -p hypermart-pos --bin seed -- --sales 100
//!
//! # Validate fixtures against an in-memory database, touching nothing
//! cargo run -p hypermart-pos --bin seed -- --dry-run
//! ```
//!
//! ## Generated Data
//! - 10 catalog products across 5 categories (one deliberately low on
//!   stock so the alert list is never empty on first run)
//! - 3 user accounts (1 admin, 2 cashiers) with Argon2-hashed demo
//!   passwords; sign in with `admin@hypermart.com` / `admin123`
//! - Store settings (name, currency symbol, receipt footer)
//! - 30 demo sales spread over the last two weeks (history only; the
//!   catalog stock is not decremented for these)

use std::env;

use chrono::{Duration, Utc};
use hypermart_core::{compute_stock_alerts, NewProduct, Product, Role, Sale, SaleItem, User};
use hypermart_db::{Database, DbConfig};
use hypermart_pos::auth;
use uuid::Uuid;

/// Demo catalog: (name, description, category, price_cents, stock, threshold, image)
const PRODUCTS: &[(&str, &str, &str, i64, i64, i64, &str)] = &[
    (
        "Smartphone X",
        "Latest smartphone with high-end features",
        "Electronics",
        89999,
        25,
        10,
        "https://placehold.co/200x200?text=Smartphone",
    ),
    (
        "Laptop Pro",
        "Professional laptop for work and gaming",
        "Electronics",
        129999,
        15,
        5,
        "https://placehold.co/200x200?text=Laptop",
    ),
    (
        "Organic Bananas",
        "Fresh organic bananas per bunch",
        "Groceries",
        299,
        150,
        30,
        "https://placehold.co/200x200?text=Bananas",
    ),
    (
        "Men's T-Shirt",
        "Cotton t-shirt for men, various sizes",
        "Clothing",
        1999,
        80,
        20,
        "https://placehold.co/200x200?text=T-Shirt",
    ),
    (
        "Coffee Maker",
        "Automatic coffee maker for home use",
        "Home & Kitchen",
        7999,
        30,
        8,
        "https://placehold.co/200x200?text=Coffee+Maker",
    ),
    (
        "Facial Cleanser",
        "Gentle facial cleanser for all skin types",
        "Beauty & Personal Care",
        1499,
        60,
        15,
        "https://placehold.co/200x200?text=Cleanser",
    ),
    (
        "Wireless Earbuds",
        "Bluetooth earbuds with noise cancellation",
        "Electronics",
        12999,
        40,
        12,
        "https://placehold.co/200x200?text=Earbuds",
    ),
    (
        "Milk",
        "Fresh whole milk, 1 gallon",
        "Groceries",
        349,
        100,
        25,
        "https://placehold.co/200x200?text=Milk",
    ),
    (
        "Women's Jeans",
        "Denim jeans for women, various sizes",
        "Clothing",
        4999,
        4,
        15,
        "https://placehold.co/200x200?text=Jeans",
    ),
    (
        "Blender",
        "High-speed blender for smoothies and more",
        "Home & Kitchen",
        5999,
        20,
        7,
        "https://placehold.co/200x200?text=Blender",
    ),
];

/// Demo accounts: (name, email, role, demo password)
const USERS: &[(&str, &str, Role, &str)] = &[
    ("Admin User", "admin@hypermart.com", Role::Admin, "admin123"),
    ("John Cashier", "john@hypermart.com", Role::Cashier, "cashier123"),
    ("Sarah Cashier", "sarah@hypermart.com", Role::Cashier, "cashier123"),
];

/// Default store settings: (key, value)
const SETTINGS: &[(&str, &str)] = &[
    ("store_name", "HyperMart"),
    ("currency_symbol", "$"),
    ("receipt_footer", "Thank you for shopping at HyperMart!"),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    hypermart_pos::init_tracing();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./hypermart.db");
    let mut sales_count: usize = 30;
    let mut dry_run = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--sales" | "-s" => {
                if i + 1 < args.len() {
                    sales_count = args[i + 1].parse().unwrap_or(30);
                    i += 1;
                }
            }
            "--dry-run" => {
                dry_run = true;
            }
            "--help" | "-h" => {
                println!("HyperMart POS Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./hypermart.db)");
                println!("  -s, --sales <N>    Number of demo sales to generate (default: 30)");
                println!("      --dry-run      Seed an in-memory database and discard it");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 HyperMart POS Seed Data Generator");
    println!("====================================");
    if dry_run {
        println!("Database: (in-memory dry run)");
    } else {
        println!("Database: {}", db_path);
    }
    println!("Demo sales: {}", sales_count);
    println!();

    // Connect to database
    let config = if dry_run {
        DbConfig::in_memory()
    } else {
        DbConfig::new(&db_path)
    };
    let db = Database::new(config).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    // Refuse to double-seed
    let existing = db.users().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} users", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let start = std::time::Instant::now();

    // Users first: demo sales reference the cashier accounts
    println!();
    println!("Creating user accounts...");

    let mut users = Vec::with_capacity(USERS.len());
    for (name, email, role, password) in USERS {
        let password_hash = auth::hash_password(password)?;
        let user = db.users().insert(name, email, *role, &password_hash).await?;
        println!("  {} <{}> ({:?})", user.name, user.email, user.role);
        users.push(user);
    }
    println!("✓ Created {} users", users.len());

    // Catalog
    println!();
    println!("Creating catalog...");

    let mut products = Vec::with_capacity(PRODUCTS.len());
    for (name, description, category, price_cents, stock, threshold, image) in PRODUCTS {
        let product = db
            .products()
            .insert(&NewProduct {
                name: name.to_string(),
                description: description.to_string(),
                category: category.to_string(),
                price_cents: *price_cents,
                stock: *stock,
                threshold: *threshold,
                image: image.to_string(),
            })
            .await?;
        products.push(product);
    }
    println!("✓ Created {} products", products.len());

    // Settings
    for (key, value) in SETTINGS {
        db.settings().set(key, value).await?;
    }
    println!("✓ Created {} settings", SETTINGS.len());

    // Demo sales history (history only; stock stays at catalog values,
    // matching the demo data this replaces)
    let cashiers: Vec<User> = users
        .iter()
        .filter(|u| u.role == Role::Cashier)
        .cloned()
        .collect();
    let sales = demo_sales(&products, &cashiers, sales_count);
    db.sales().replace_all(&sales).await?;
    println!("✓ Created {} demo sales", sales.len());

    // Alerts derived from the catalog (Women's Jeans ships low on stock)
    let alerts = compute_stock_alerts(&products);
    db.stock_alerts().replace_all(&alerts).await?;
    println!("✓ Created {} stock alerts", alerts.len());

    let elapsed = start.elapsed();
    println!();
    println!("✓ Seed complete in {:?}", elapsed);
    if !dry_run {
        println!();
        println!("Sign in with:");
        println!("  admin@hypermart.com / admin123   (admin)");
        println!("  john@hypermart.com  / cashier123 (cashier)");
    }

    Ok(())
}

/// Builds a deterministic demo sales history: 1-3 lines per sale,
/// quantities 1-4, timestamps spread over the last two weeks, cashiers
/// alternating. Same inputs, same history.
fn demo_sales(products: &[Product], cashiers: &[User], count: usize) -> Vec<Sale> {
    let now = Utc::now();
    let mut sales = Vec::with_capacity(count);

    for i in 0..count {
        let sale_id = Uuid::new_v4().to_string();
        let line_count = 1 + (i * 7 + 3) % 3;

        let mut items = Vec::with_capacity(line_count);
        for k in 0..line_count {
            let product = &products[(i * 7 + k * 3) % products.len()];
            let quantity = (1 + (i + k * 2) % 4) as i64;
            items.push(SaleItem {
                id: Uuid::new_v4().to_string(),
                sale_id: sale_id.clone(),
                product_id: product.id.clone(),
                product_name: product.name.clone(),
                quantity,
                price_cents: product.price_cents,
                total_cents: product.price_cents * quantity,
            });
        }

        let cashier = &cashiers[i % cashiers.len()];
        let total_amount_cents = items.iter().map(|item| item.total_cents).sum();

        sales.push(Sale {
            id: sale_id,
            items,
            total_amount_cents,
            cashier_id: cashier.id.clone(),
            cashier_name: cashier.name.clone(),
            timestamp: now - Duration::hours(((i * 11) % (14 * 24)) as i64),
        });
    }

    sales
}
