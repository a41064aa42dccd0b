//! Polished CLI - catalog browsing and cart/favorites management.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog
//! polished catalog list --category Polish --sort price-low
//! polished catalog show 3
//!
//! # Edit the persisted cart
//! polished cart add 3 -q 2
//! polished cart set 3 1
//! polished cart show
//!
//! # Manage favorites
//! polished favorites toggle 5
//! ```
//!
//! Cart and favorites are stored as JSON under `--storage-dir` (default
//! `.polished`, or `POLISHED_STORAGE_DIR`). Pointing the storefront server at
//! the same directory shares the shopper state.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use polished_storefront::catalog::{Catalog, ProductQuery, SortOption};
use polished_storefront::session::ShopperSession;
use polished_storefront::storage::FileStorage;

mod commands;

#[derive(Parser)]
#[command(name = "polished")]
#[command(author, version, about = "Polished storefront CLI tools")]
struct Cli {
    /// Directory holding the persisted cart and favorites
    #[arg(
        long,
        global = true,
        env = "POLISHED_STORAGE_DIR",
        default_value = ".polished"
    )]
    storage_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the product catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// Inspect and edit the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Manage favorites
    Favorites {
        #[command(subcommand)]
        action: FavoritesAction,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// List products
    List {
        /// Case-insensitive name search
        #[arg(short, long)]
        search: Option<String>,

        /// Exact category name
        #[arg(short, long)]
        category: Option<String>,

        /// Sort order
        #[arg(long, value_enum, default_value_t = SortArg::Featured)]
        sort: SortArg,
    },
    /// Show one product
    Show {
        /// Product id
        id: String,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the cart and totals
    Show,
    /// Add a product
    Add {
        /// Product id
        id: String,

        /// Number of units to add
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Set a line's quantity (0 removes it)
    Set {
        /// Product id
        id: String,

        /// New quantity
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Remove a line
    Remove {
        /// Product id
        id: String,
    },
    /// Empty the cart
    Clear,
}

#[derive(Subcommand)]
enum FavoritesAction {
    /// List favorites
    Show,
    /// Favorite a product
    Add {
        /// Product id
        id: String,
    },
    /// Remove a favorite
    Remove {
        /// Product id
        id: String,
    },
    /// Flip a product's favorite status
    Toggle {
        /// Product id
        id: String,
    },
    /// Remove every favorite
    Clear,
}

#[derive(Clone, Copy, ValueEnum)]
enum SortArg {
    Featured,
    PriceLow,
    PriceHigh,
    NameAz,
    NameZa,
}

impl From<SortArg> for SortOption {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Featured => Self::Featured,
            SortArg::PriceLow => Self::PriceLow,
            SortArg::PriceHigh => Self::PriceHigh,
            SortArg::NameAz => Self::NameAz,
            SortArg::NameZa => Self::NameZa,
        }
    }
}

fn main() {
    dotenvy::dotenv().ok();

    // Logs go to stderr so command output stays clean on stdout
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "warn".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(output) => print_output(&output),
        Err(e) => {
            tracing::error!("Command failed: {e}");
            std::process::exit(1);
        }
    }
}

#[allow(clippy::print_stdout)]
fn print_output(output: &str) {
    print!("{output}");
}

fn open_session(storage_dir: PathBuf) -> Result<ShopperSession, Box<dyn std::error::Error>> {
    let storage = FileStorage::open(storage_dir)?;
    Ok(ShopperSession::open(Arc::new(storage)))
}

fn run(cli: Cli) -> Result<String, Box<dyn std::error::Error>> {
    let catalog = Catalog::builtin();

    let output = match cli.command {
        Commands::Catalog { action } => match action {
            CatalogAction::List {
                search,
                category,
                sort,
            } => {
                let query = ProductQuery {
                    search,
                    category,
                    sort: sort.into(),
                };
                commands::catalog::list(&catalog, &query)
            }
            CatalogAction::Show { id } => commands::catalog::show(&catalog, &id)?,
        },
        Commands::Cart { action } => {
            let mut session = open_session(cli.storage_dir)?;
            let cart = session.cart_mut();
            let output = match action {
                CartAction::Show => commands::cart::show(cart.state()),
                CartAction::Add { id, quantity } => {
                    commands::cart::add(cart, &catalog, &id, quantity)?
                }
                CartAction::Set { id, quantity } => commands::cart::set(cart, &id, quantity)?,
                CartAction::Remove { id } => commands::cart::remove(cart, &id)?,
                CartAction::Clear => commands::cart::clear(cart),
            };
            session.close();
            output
        }
        Commands::Favorites { action } => {
            let mut session = open_session(cli.storage_dir)?;
            let favorites = session.favorites_mut();
            let output = match action {
                FavoritesAction::Show => commands::favorites::show(favorites),
                FavoritesAction::Add { id } => {
                    commands::favorites::add(favorites, &catalog, &id)?
                }
                FavoritesAction::Remove { id } => commands::favorites::remove(favorites, &id),
                FavoritesAction::Toggle { id } => {
                    commands::favorites::toggle(favorites, &catalog, &id)?
                }
                FavoritesAction::Clear => commands::favorites::clear(favorites),
            };
            session.close();
            output
        }
    };

    Ok(output)
}
