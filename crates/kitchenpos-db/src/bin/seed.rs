//! # Seed Data Generator
//!
//! Populates the database with a small restaurant catalog and a floor of
//! empty tables for development.
//!
//! ## Usage
//! ```bash
//! # Seed ./kitchenpos.db (or $KITCHENPOS_DATABASE_PATH) with 8 tables
//! cargo run -p kitchenpos-db --bin seed
//!
//! # Custom table count
//! cargo run -p kitchenpos-db --bin seed -- --tables 20
//!
//! # Specify database path
//! cargo run -p kitchenpos-db --bin seed -- --db ./data/kitchenpos.db
//! ```
//!
//! ## Generated Data
//! - Products: fried and seasoned chicken dishes
//! - Menu groups: single menus, double menus
//! - Menus: one per product plus a few two-item sets, each priced at or
//!   below the sum of its products
//! - Order tables: empty, zero guests
//!
//! Everything goes through the services, so seeded rows obey the same
//! rules as rows created at runtime.

use std::env;

use kitchenpos_core::{
    Id, MenuGroupRequest, MenuProductRequest, MenuRequest, Money, OrderTableRequest,
    ProductRequest,
};
use kitchenpos_db::{Database, DbConfig};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Products as (name, price in won).
const PRODUCTS: &[(&str, i64)] = &[
    ("Fried Chicken", 16_000),
    ("Seasoned Chicken", 16_000),
    ("Soy Sauce Chicken", 17_000),
    ("Garlic Chicken", 17_000),
    ("Green Onion Chicken", 17_000),
    ("Roast Chicken", 18_000),
];

/// Two-item sets as (menu name, first product, second product, discount).
const SETS: &[(&str, usize, usize, i64)] = &[
    ("Half and Half", 0, 1, 2_000),
    ("Soy and Garlic", 2, 3, 3_000),
    ("Fried Double", 0, 0, 4_000),
];

const DEFAULT_TABLES: usize = 8;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut tables = DEFAULT_TABLES;
    let mut config = DbConfig::from_env();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--tables" | "-t" => {
                if i + 1 < args.len() {
                    tables = match args[i + 1].parse() {
                        Ok(n) => n,
                        Err(e) => {
                            warn!(
                                value = %args[i + 1],
                                error = %e,
                                "Invalid --tables, using default of {}",
                                DEFAULT_TABLES
                            );
                            DEFAULT_TABLES
                        }
                    };
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    config.database_path = args[i + 1].clone().into();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("KitchenPOS Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -t, --tables <N>   Number of order tables to create (default: 8)");
                println!("  -d, --db <PATH>    Database file path (default: $KITCHENPOS_DATABASE_PATH or ./kitchenpos.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("KitchenPOS Seed Data Generator");
    println!("==============================");
    println!("Database: {}", config.database_path.display());
    println!("Tables:   {}", tables);
    println!();

    let db = Database::new(config).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.product_service().list().await?;
    if !existing.is_empty() {
        println!("⚠ Database already has {} products", existing.len());
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let start = std::time::Instant::now();

    // Catalog
    let mut product_ids: Vec<(Id, Money)> = Vec::with_capacity(PRODUCTS.len());
    for (name, price) in PRODUCTS {
        let product = db
            .product_service()
            .create(ProductRequest {
                name: name.to_string(),
                price: Money::from_minor(*price),
            })
            .await?;
        if let Some(id) = product.id {
            product_ids.push((id, product.price));
        }
    }
    println!("✓ Created {} products", product_ids.len());

    let singles = db
        .menu_group_service()
        .create(MenuGroupRequest {
            name: "Single Menus".to_string(),
        })
        .await?;
    let doubles = db
        .menu_group_service()
        .create(MenuGroupRequest {
            name: "Double Menus".to_string(),
        })
        .await?;
    let (Some(singles_id), Some(doubles_id)) = (singles.id, doubles.id) else {
        return Err("menu group was stored without an id".into());
    };

    let mut menus = 0;
    for ((name, _), (product_id, price)) in PRODUCTS.iter().zip(&product_ids) {
        let request = MenuRequest {
            name: name.to_string(),
            price: *price,
            menu_group_id: singles_id,
            menu_products: vec![MenuProductRequest {
                product_id: *product_id,
                quantity: 1,
            }],
        };
        match db.menu_service().create(request).await {
            Ok(_) => menus += 1,
            Err(e) => error!(menu = name, error = %e, "Failed to create menu"),
        }
    }

    for (name, first, second, discount) in SETS {
        let (Some((first_id, first_price)), Some((second_id, second_price))) =
            (product_ids.get(*first), product_ids.get(*second))
        else {
            continue;
        };
        let menu_products = if first_id == second_id {
            vec![MenuProductRequest {
                product_id: *first_id,
                quantity: 2,
            }]
        } else {
            vec![
                MenuProductRequest {
                    product_id: *first_id,
                    quantity: 1,
                },
                MenuProductRequest {
                    product_id: *second_id,
                    quantity: 1,
                },
            ]
        };
        let Some(price) = first_price
            .checked_add(*second_price)
            .and_then(|sum| sum.checked_add(Money::from_minor(-discount)))
        else {
            error!(menu = name, "Menu price overflows");
            continue;
        };
        let request = MenuRequest {
            name: name.to_string(),
            price,
            menu_group_id: doubles_id,
            menu_products,
        };
        match db.menu_service().create(request).await {
            Ok(_) => menus += 1,
            Err(e) => error!(menu = name, error = %e, "Failed to create menu"),
        }
    }
    println!("✓ Created {} menus", menus);

    // Floor
    for _ in 0..tables {
        db.table_service()
            .create(OrderTableRequest {
                number_of_guests: 0,
                empty: true,
            })
            .await?;
    }
    println!("✓ Created {} empty tables", tables);

    info!(elapsed = ?start.elapsed(), "Seed complete");
    println!();
    println!("✓ Seed complete in {:?}", start.elapsed());

    db.close().await;
    Ok(())
}

/// Installs the tracing subscriber.
///
/// Log level defaults to `info,kitchenpos=debug,sqlx=warn` and can be
/// overridden with `RUST_LOG`.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,kitchenpos=debug,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
