use anyhow::{anyhow, Context, Result};
use catalog::seed::load_seed;
use catalog::{Category, MemoryStore, OrderId, OrderStore, Product, ProductFilter, ProductStore, UserId};
use clap::{Parser, Subcommand};
use colored::Colorize;
use recommend::RecommendationResolver;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

/// PartsRecs - Auto-parts catalog and recommendation toolbox
#[derive(Parser)]
#[command(name = "parts-recs")]
#[command(about = "Query the auto-parts catalog and exercise the recommendation flow", long_about = None)]
struct Cli {
    /// Path to the seed data directory
    #[arg(short, long, default_value = "data/seed")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute (or reuse) recommendations for an order
    Recommend {
        /// Order ID to recommend against
        #[arg(long)]
        order_id: OrderId,

        /// Acting user identity recorded on a fresh recommendation
        #[arg(long, default_value = "1")]
        user_id: UserId,
    },

    /// Show an order and its line items
    Order {
        /// Order ID to display
        #[arg(long)]
        order_id: OrderId,
    },

    /// Search products by name (case-insensitive substring match)
    Search {
        /// Name fragment to search for
        #[arg(long)]
        name: String,
    },

    /// List catalog products, optionally narrowed by category
    Products {
        /// Category to filter by (e.g. Brakes, Engine)
        #[arg(long)]
        category: Option<Category>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    println!("Loading seed data from {}...", cli.data_dir.display());
    let start = Instant::now();
    let store = Arc::new(
        load_seed(&cli.data_dir)
            .with_context(|| format!("Failed to load seed data from {}", cli.data_dir.display()))?,
    );
    let (products, orders, _) = store.counts()?;
    println!(
        "{} Loaded {} products and {} orders in {:?}",
        "✓".green(),
        products,
        orders,
        start.elapsed()
    );

    match cli.command {
        Commands::Recommend { order_id, user_id } => {
            handle_recommend(store, order_id, user_id).await?
        }
        Commands::Order { order_id } => handle_order(store, order_id).await?,
        Commands::Search { name } => handle_search(store, name).await?,
        Commands::Products { category } => handle_products(store, category).await?,
    }

    Ok(())
}

/// Handle the 'recommend' command
async fn handle_recommend(store: Arc<MemoryStore>, order_id: OrderId, user_id: UserId) -> Result<()> {
    let resolver = RecommendationResolver::new(store.clone(), store.clone(), store);

    let start = Instant::now();
    let recommendations = resolver.resolve(order_id, user_id).await?;
    println!(
        "{}",
        format!(
            "Recommendations for order {} ({:?}):",
            order_id,
            start.elapsed()
        )
        .bold()
        .blue()
    );

    if recommendations.is_empty() {
        println!("  (none - no available alternatives in this order's categories)");
        return Ok(());
    }
    print_products(&recommendations);
    Ok(())
}

/// Handle the 'order' command
async fn handle_order(store: Arc<MemoryStore>, order_id: OrderId) -> Result<()> {
    let order = OrderStore::get(store.as_ref(), order_id)
        .await?
        .ok_or_else(|| anyhow!("Order {} not found", order_id))?;

    println!("{}", format!("Order {}", order.id).bold().blue());
    println!("{}User: {}", "• ".green(), order.user_id);
    println!("{}Status: {:?}", "• ".green(), order.status);
    println!(
        "{}Totals: subtotal {} + tax {} = {}",
        "• ".green(),
        format_cents(order.subtotal_cents),
        format_cents(order.tax_cents),
        format_cents(order.total_cents)
    );

    println!("Items:");
    for item in &order.items {
        let name = ProductStore::get(store.as_ref(), item.product_id)
            .await?
            .map(|product| product.name)
            .unwrap_or_else(|| "(no longer in catalog)".to_string());
        println!(
            "  - {} x{} @ {} (product {})",
            name,
            item.qty,
            format_cents(item.price_cents_snapshot),
            item.product_id
        );
    }
    Ok(())
}

/// Handle the 'search' command
async fn handle_search(store: Arc<MemoryStore>, name: String) -> Result<()> {
    let all = store.list(&ProductFilter::default()).await?;
    let needle = name.to_lowercase();

    let matches: Vec<&Product> = all
        .iter()
        .filter(|product| product.name.to_lowercase().contains(&needle))
        .collect();

    println!(
        "{}",
        format!("Search results for '{}':", name).bold().blue()
    );
    if matches.is_empty() {
        println!("  (no matches)");
        return Ok(());
    }
    for product in matches.iter().take(20) {
        print_product(product);
    }
    Ok(())
}

/// Handle the 'products' command
async fn handle_products(store: Arc<MemoryStore>, category: Option<Category>) -> Result<()> {
    let filter = ProductFilter {
        category,
        brand: None,
    };
    let products = store.list(&filter).await?;

    match category {
        Some(category) => println!("{}", format!("Products in {}:", category).bold().blue()),
        None => println!("{}", "All products:".bold().blue()),
    }
    print_products(&products);
    Ok(())
}

fn print_products(products: &[Product]) {
    for product in products {
        print_product(product);
    }
}

fn print_product(product: &Product) {
    let availability = if product.is_available {
        format!("{} in stock", product.stock).green()
    } else {
        "unavailable".red()
    };
    println!(
        "  {}. {} [{} / {}] {} - {}",
        product.id.to_string().green(),
        product.name,
        product.brand,
        product.category,
        format_cents(product.price_cents),
        availability
    );
}

fn format_cents(cents: u32) -> String {
    format!("${}.{:02}", cents / 100, cents % 100)
}
