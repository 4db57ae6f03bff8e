//! Fills an empty store with the default CoffeeRun menu.
//!
//! ```sh
//! cargo run -p seed -- --redis-url redis://127.0.0.1:6379
//! ```
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use server::{
    database::{Database, RedisStore},
    menu::MenuItem,
    models::{DrinkType, MilkOption, Size},
    payloads::{DrinkTypeCreate, MilkOptionCreate, SizeCreate},
};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

const DRINK_TYPES: [&str; 10] = [
    "Flat White",
    "Long Black",
    "Cappuccino",
    "Latte",
    "Mocha",
    "Espresso",
    "Macchiato",
    "Hot Chocolate",
    "Chai Latte",
    "Piccolo",
];

const SIZES: [(&str, &str); 3] = [("Small", "Sm"), ("Regular", "Reg"), ("Large", "Lrg")];

const MILK_OPTIONS: [&str; 5] = ["Full Cream", "Skim", "Soy", "Oat", "Almond"];

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    #[arg(long, env = "REDIS_URL", default_value = "redis://127.0.0.1:6379")]
    redis_url: String,

    /// Seed even if the menu already has items.
    #[arg(long)]
    force: bool,
}

fn display_order(index: usize) -> i32 {
    index as i32 + 1
}

/// Skips a list that already has rows unless forced. Returns how many were inserted.
async fn seed_list<T: MenuItem>(db: &Database, force: bool, items: Vec<T::Create>) -> Result<usize> {
    if !force && !db.is_empty::<T>().await? {
        info!("{} list already seeded, skipping", T::LABEL);
        return Ok(0);
    }

    let count = items.len();
    for payload in items {
        db.save(&T::create(payload)).await?;
    }

    Ok(count)
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let args = Args::parse();

    let db = Database::new(Arc::new(RedisStore::connect(&args.redis_url).await?));

    let drink_types = DRINK_TYPES
        .iter()
        .enumerate()
        .map(|(i, name)| DrinkTypeCreate {
            name: name.to_string(),
            display_order: display_order(i),
        })
        .collect();

    let sizes = SIZES
        .iter()
        .enumerate()
        .map(|(i, (name, abbreviation))| SizeCreate {
            name: name.to_string(),
            abbreviation: abbreviation.to_string(),
            display_order: display_order(i),
        })
        .collect();

    let milk_options = MILK_OPTIONS
        .iter()
        .enumerate()
        .map(|(i, name)| MilkOptionCreate {
            name: name.to_string(),
            display_order: display_order(i),
        })
        .collect();

    let drink_types = seed_list::<DrinkType>(&db, args.force, drink_types).await?;
    let sizes = seed_list::<Size>(&db, args.force, sizes).await?;
    let milk_options = seed_list::<MilkOption>(&db, args.force, milk_options).await?;

    println!("Seeded {drink_types} drink types, {sizes} sizes, {milk_options} milk options");

    Ok(())
}
