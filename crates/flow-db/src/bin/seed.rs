//! # Seed Data Generator
//!
//! Populates a database with demo sales for development.
//!
//! ## Usage
//! ```bash
//! # Seed the configured database (FLOW_DB_PATH or ./iptv_flow.db)
//! cargo run -p flow-db --bin seed
//!
//! # Specify database path
//! cargo run -p flow-db --bin seed -- --db ./data/dev.db
//! ```
//!
//! ## Generated Sales
//! Purchase dates are spread backwards from today so the dashboard shows
//! every badge: active, expiring soon, and expired. A few sales are
//! renewed so renewal labels and accumulated totals appear too.

use std::env;

use chrono::Duration;
use flow_core::{time, Money, SaleInput};
use flow_db::{AppConfig, Database, SalesStore};
use tracing_subscriber::EnvFilter;

/// (client, username, days since purchase, value, cost, renewals)
const DEMO_SALES: &[(&str, &str, i64, i64, i64, u32)] = &[
    ("Carlos Oliveira", "premium_01", 2, 30, 10, 0),
    ("Ana Souza", "ana_tv", 12, 35, 12, 1),
    ("Bruno Lima", "bruno_hd", 26, 30, 10, 0),
    ("Fernanda Costa", "fe_costa", 28, 45, 15, 2),
    ("João Pereira", "jp_4k", 40, 30, 10, 0),
    ("Mariana Alves", "mari_play", 55, 25, 8, 0),
    ("Rafael Santos", "rafa_vip", 7, 50, 20, 3),
    ("Luciana Rocha", "lu_family", 30, 40, 14, 0),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut config = AppConfig::from_env();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    config.database_path = args[i + 1].clone().into();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("IPTV Flow Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./iptv_flow.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 IPTV Flow Seed Data Generator");
    println!("================================");
    println!("Database: {}", config.database_path.display());
    println!("Key:      {}", config.storage_key);
    println!();

    let db = Database::new(config.db_config()).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let mut store = SalesStore::open_strict(&db, config.store_options()).await?;
    if !store.is_empty() {
        println!("⚠ Store already has {} sales", store.len());
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!("Generating sales...");

    let today = time::today();
    for (client, username, days_ago, value, cost, renewals) in DEMO_SALES {
        let purchase = today - Duration::days(*days_ago);

        let sale = store
            .create(SaleInput {
                client_name: client.to_string(),
                username: username.to_string(),
                password: Some(format!("{}123", username)),
                purchase_date: purchase.format("%Y-%m-%d").to_string(),
                value: Money::from_units(*value),
                cost: Money::from_units(*cost),
            })
            .await?;

        for _ in 0..*renewals {
            store.renew(&sale.id).await?;
        }
    }

    let stats = store.stats();
    println!();
    println!("✓ Generated {} sales", store.len());
    println!("  Revenue:  {}", stats.total_sales_value);
    println!("  Profit:   {}", stats.total_profit);
    println!("  Expiring: {}", stats.expiring_count);

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
