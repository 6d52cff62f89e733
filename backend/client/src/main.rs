use std::io::{self, BufRead, Write};

use anyhow::{Result, bail};
use catalog::{Category, ProductView};
use clap::{Parser, Subcommand};
use client::{
    Action, ApiClient, ClientState, ProductForm, Session,
    api::DEFAULT_ORIGIN,
};
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser, Debug)]
#[command(name = "inventory", about = "Browse and edit the product inventory")]
struct Args {
    /// Server origin, without the /api suffix
    #[arg(long, env = "INVENTORY_URL", default_value = DEFAULT_ORIGIN)]
    server: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List products, newest first
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value = "")]
        search: String,
        /// Category name or id, repeatable
        #[arg(long = "category")]
        categories: Vec<String>,
    },
    /// List categories
    Categories,
    /// Add a product
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        quantity: String,
        /// Category name or id, repeatable
        #[arg(long = "category")]
        categories: Vec<String>,
    },
    /// Delete a product by id
    Delete {
        id: String,
        /// Page the product is listed on
        #[arg(long, default_value_t = 1)]
        page: u32,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let api = ApiClient::new(&args.server);

    match args.command {
        Command::List {
            page,
            search,
            categories,
        } => {
            let known = api.categories().await?;
            let ids = resolve(&known, &categories)?;

            let mut session = Session::with_state(api, ClientState::with_filters(&search, ids));
            session.dispatch(Action::CategoriesLoaded(known)).await;
            session.dispatch(Action::PageRequested(page)).await;
            print_listing(session.state())?;
        }
        Command::Categories => {
            for category in api.categories().await? {
                println!("{:<16} {} (ID: {})", category.name, category.description, category.id);
            }
        }
        Command::Add {
            name,
            description,
            quantity,
            categories,
        } => {
            let mut session = Session::new(api);
            session.load_categories().await?;
            let mut form = ProductForm::new();
            form.set_name(&name);
            form.set_description(&description);
            form.set_quantity(&quantity);
            for id in resolve(&session.state().categories, &categories)? {
                form.toggle_category(&id);
            }

            let Some(product) = session.submit(&mut form).await else {
                for (field, message) in &form.errors {
                    eprintln!("{field}: {message}");
                }
                bail!("product was not added");
            };

            println!("Added {} (ID: {})", product.name, product.id);
            print_listing(session.state())?;
        }
        Command::Delete { id, page, yes } => {
            let product = api.get_product(&id).await?;
            let mut session = Session::new(api);
            session.dispatch(Action::PageRequested(page)).await;
            session
                .dispatch(Action::DeleteRequested {
                    id: product.id,
                    name: product.name,
                })
                .await;

            let confirmed = match &session.state().pending_delete {
                Some(pending) => yes || confirm(&pending.prompt())?,
                None => false,
            };
            if !confirmed {
                session.dispatch(Action::DeleteCancelled).await;
                println!("Cancelled");
                return Ok(());
            }

            session.dispatch(Action::DeleteConfirmed).await;
            if let Some(alert) = &session.state().alert {
                bail!("{alert}");
            }
            print_listing(session.state())?;
        }
    }

    Ok(())
}

/// Maps category names (case-insensitive) or ids to ids.
fn resolve(known: &[Category], wanted: &[String]) -> Result<Vec<String>> {
    wanted
        .iter()
        .map(|w| {
            known
                .iter()
                .find(|c| c.id == *w || c.name.eq_ignore_ascii_case(w))
                .map(|c| c.id.clone())
                .ok_or_else(|| anyhow::anyhow!("unknown category: {w}"))
        })
        .collect()
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{prompt} [y/N] ");
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

fn print_listing(state: &ClientState) -> Result<()> {
    if let Some(notice) = &state.notice {
        println!("{}", notice.text);
    }
    if let Some(e) = &state.load_error {
        bail!("Failed to load products: {e}");
    }

    if state.products.is_empty() {
        if state.has_filters() {
            println!("No products match your filters");
        } else {
            println!("No products yet");
        }
        return Ok(());
    }

    for product in &state.products {
        print_product(product);
    }
    if state.total_pages > 1 {
        println!("Page {} of {}", state.current_page, state.total_pages);
    }
    Ok(())
}

fn print_product(product: &ProductView) {
    let categories: Vec<&str> = product.categories.iter().map(|c| c.name.as_str()).collect();

    println!(
        "{:<30} qty {:<6} {:<30} added {}  (ID: {})",
        product.name,
        product.quantity,
        categories.join(", "),
        product.created_at.format("%b %-d, %Y"),
        product.id
    );
}
