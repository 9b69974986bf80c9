mod cart;
mod catalog;
mod finder;
mod vehicles;

use std::path::Path;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use treadline_client::ApiClient;
use treadline_core::{load_storefront, AppConfig, Failure, StorefrontFile};

use crate::cart::CartCommands;
use crate::catalog::ProductsArgs;
use crate::finder::FinderCommands;
use crate::vehicles::VehiclesCommands;

#[derive(Debug, Parser)]
#[command(name = "treadline")]
#[command(about = "Tire and wheel storefront command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List a page of products from a storefront listing
    Products(ProductsArgs),
    /// Show the filter values available on a listing
    Facets {
        /// Listing name from storefront.yaml (e.g., tires)
        #[arg(long, default_value = "tires")]
        listing: String,
    },
    /// Re-run a text search as you type, one query per line on stdin
    Search {
        /// Listing name from storefront.yaml (e.g., tires)
        #[arg(long, default_value = "tires")]
        listing: String,
    },
    /// Find a vehicle or tire size step by step
    Finder {
        #[command(subcommand)]
        command: FinderCommands,
    },
    /// Manage saved vehicles
    Vehicles {
        #[command(subcommand)]
        command: VehiclesCommands,
    },
    /// View and change a shopper's cart
    Cart {
        #[command(subcommand)]
        command: CartCommands,
    },
}

/// Wraps a domain error with its user-facing notice, e.g.
/// `[validation] cannot choose model before choosing make`.
pub(crate) fn surface<E>(err: E) -> anyhow::Error
where
    E: Failure + std::error::Error + Send + Sync + 'static,
{
    let notice = err.notice();
    tracing::debug!(kind = %notice.kind, error = %err, "surfacing failure");
    anyhow::Error::new(err).context(notice.to_string())
}

/// Storefront listings from the configured file, or the built-in listings when
/// the file does not exist.
fn storefront(path: &Path) -> anyhow::Result<StorefrontFile> {
    if path.exists() {
        Ok(load_storefront(path)?)
    } else {
        tracing::info!(path = %path.display(), "no storefront file; using built-in listings");
        Ok(StorefrontFile::default())
    }
}

async fn run(cli: Cli, config: &AppConfig) -> anyhow::Result<()> {
    let client = ApiClient::from_config(config)?;
    match cli.command {
        Commands::Products(args) => {
            let storefront = storefront(&config.storefront_path)?;
            catalog::run_products(&client, &storefront, config, &args).await
        }
        Commands::Facets { listing } => {
            let storefront = storefront(&config.storefront_path)?;
            catalog::run_facets(&client, &storefront, &listing).await
        }
        Commands::Search { listing } => {
            let storefront = storefront(&config.storefront_path)?;
            catalog::run_search(&client, &storefront, config, &listing).await
        }
        Commands::Finder { command } => finder::run_finder(&client, config, command).await,
        Commands::Vehicles { command } => vehicles::run_vehicles(config, command),
        Commands::Cart { command } => cart::run_cart(client, command).await,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = treadline_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
    tracing::debug!(env = %config.env, "configuration loaded");

    let cli = Cli::parse();
    run(cli, &config).await
}

#[cfg(test)]
mod tests;
