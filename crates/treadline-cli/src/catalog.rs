//! Listing, facet and search command handlers.

use std::time::Duration;

use clap::Args;
use tokio::io::{AsyncBufReadExt, BufReader};
use treadline_catalog::{CatalogQuery, Debouncer, Facet, Listing, Page, PriceSort};
use treadline_client::ApiClient;
use treadline_core::{AppConfig, ListingConfig, Product, StorefrontFile, VehicleSelection};
use treadline_finder::{Garage, JsonFileStorage};

use crate::surface;

#[derive(Debug, Args)]
pub struct ProductsArgs {
    /// Listing name from storefront.yaml (e.g., tires)
    #[arg(long, default_value = "tires")]
    pub listing: String,
    /// Case-insensitive text matched against name and description
    #[arg(long)]
    pub search: Option<String>,
    /// Brand names to include (repeatable)
    #[arg(long)]
    pub brand: Vec<String>,
    #[arg(long)]
    pub category: Vec<String>,
    #[arg(long)]
    pub width: Vec<String>,
    #[arg(long)]
    pub ratio: Vec<String>,
    #[arg(long)]
    pub diameter: Vec<String>,
    #[arg(long)]
    pub model: Vec<String>,
    #[arg(long)]
    pub year: Vec<String>,
    #[arg(long)]
    pub driving_type: Vec<String>,
    /// 1-based page number
    #[arg(long, default_value = "1")]
    pub page: usize,
    /// Price order: asc or desc
    #[arg(long)]
    pub sort: Option<PriceSort>,
    /// Only show products that fit a saved vehicle
    #[arg(long)]
    pub my_vehicles: bool,
}

impl ProductsArgs {
    fn facet_values(&self) -> [(Facet, &[String]); 8] {
        [
            (Facet::Brand, self.brand.as_slice()),
            (Facet::Category, self.category.as_slice()),
            (Facet::Width, self.width.as_slice()),
            (Facet::Ratio, self.ratio.as_slice()),
            (Facet::Diameter, self.diameter.as_slice()),
            (Facet::Model, self.model.as_slice()),
            (Facet::Year, self.year.as_slice()),
            (Facet::DrivingType, self.driving_type.as_slice()),
        ]
    }

    /// Writes these arguments into `query`. The page is applied last because
    /// every other setter returns the query to page 1.
    pub(crate) fn apply(&self, query: &mut CatalogQuery) {
        if let Some(text) = &self.search {
            query.set_text(text.as_str());
        }
        for (facet, values) in self.facet_values() {
            query.set_facet(facet, values.iter().cloned());
        }
        query.set_sort(self.sort);
        query.set_vehicles_only(self.my_vehicles);
        query.set_page(self.page);
    }
}

fn listing_config<'a>(
    storefront: &'a StorefrontFile,
    name: &str,
) -> anyhow::Result<&'a ListingConfig> {
    storefront.listing(name).ok_or_else(|| {
        let known: Vec<&str> = storefront.listings.iter().map(|l| l.name.as_str()).collect();
        anyhow::anyhow!(
            "unknown listing '{name}'; expected one of: {}",
            known.join(", ")
        )
    })
}

async fn load_listing(
    client: &ApiClient,
    storefront: &StorefrontFile,
    name: &str,
) -> anyhow::Result<Listing> {
    let config = listing_config(storefront, name)?.clone();
    let products = client.products(config.product_type).await.map_err(surface)?;
    Ok(Listing::new(config, products))
}

fn saved_vehicles(config: &AppConfig) -> Vec<VehicleSelection> {
    Garage::open(JsonFileStorage::new(&config.vehicles_path))
        .list()
        .to_vec()
}

fn print_page(page: &Page<&Product>) {
    if page.items.is_empty() {
        println!("no products match the current filters");
        return;
    }

    let header = format!("{:<26}{:<18}{:<14}{:>10}  NAME", "ID", "BRAND", "SIZE", "PRICE");
    println!("{header}");
    for product in &page.items {
        let size = product.tire_size_label().unwrap_or_else(|| "-".to_string());
        println!(
            "{:<26}{:<18}{:<14}{:>10}  {}",
            product.id().as_str(),
            product.brand_name(),
            size,
            product.price().round_dp(2).to_string(),
            product.name()
        );
    }
    println!(
        "page {} of {} ({} products)",
        page.page,
        page.total_pages.max(1),
        page.total_items
    );
}

/// Print one page of a listing after applying the given filters.
///
/// # Errors
///
/// Returns an error if the listing name is unknown or products cannot be
/// fetched.
pub(crate) async fn run_products(
    client: &ApiClient,
    storefront: &StorefrontFile,
    config: &AppConfig,
    args: &ProductsArgs,
) -> anyhow::Result<()> {
    let mut listing = load_listing(client, storefront, &args.listing).await?;
    args.apply(listing.query_mut());

    let vehicles = if args.my_vehicles {
        let vehicles = saved_vehicles(config);
        if vehicles.is_empty() {
            println!("no saved vehicles; showing every product");
        }
        vehicles
    } else {
        Vec::new()
    };

    print_page(&listing.view(&vehicles));
    Ok(())
}

/// Print the filter values available on a listing.
///
/// # Errors
///
/// Returns an error if the listing name is unknown or products cannot be
/// fetched.
pub(crate) async fn run_facets(
    client: &ApiClient,
    storefront: &StorefrontFile,
    listing: &str,
) -> anyhow::Result<()> {
    let listing = load_listing(client, storefront, listing).await?;
    for facet in Facet::ALL {
        let values = listing.facets().get(&facet).map(Vec::as_slice).unwrap_or_default();
        if values.is_empty() {
            continue;
        }
        println!("{:<14}{}", facet.label(), values.join(", "));
    }
    Ok(())
}

/// Read search text line by line from stdin and print results once typing
/// pauses for the configured debounce window.
///
/// # Errors
///
/// Returns an error if the listing cannot be loaded or stdin cannot be read.
pub(crate) async fn run_search(
    client: &ApiClient,
    storefront: &StorefrontFile,
    config: &AppConfig,
    listing: &str,
) -> anyhow::Result<()> {
    let mut listing = load_listing(client, storefront, listing).await?;
    let window = Duration::from_millis(config.search_debounce_ms);
    tracing::info!(window_ms = config.search_debounce_ms, "reading search text from stdin");

    let debouncer = Debouncer::spawn(window, move |text: String| {
        listing.query_mut().set_text(text.trim());
        println!("search: {:?}", listing.query().text());
        print_page(&listing.view(&[]));
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if !debouncer.push(line) {
            break;
        }
    }
    debouncer.close().await;
    Ok(())
}
