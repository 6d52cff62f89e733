use anyhow::Result;
use clap::Parser;
use server::{config::Config, database::connect, seed::seed_categories};
use tracing_subscriber::{EnvFilter, fmt};

/// Replaces every stored category with the default set.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Store connection string, overrides DATABASE_URL.
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let args = Args::parse();
    let database_url = match args.database_url {
        Some(url) => url,
        None => Config::load()?.database_url,
    };

    let store = connect(&database_url).await?;
    println!("Connected to {} store", store.backend_tag());

    let categories = seed_categories(store.as_ref()).await?;
    println!("Cleared existing categories");
    println!("Successfully seeded {} categories\n", categories.len());

    println!("Inserted Categories:");
    for category in &categories {
        println!("- {} (ID: {})", category.name, category.id);
    }

    Ok(())
}
