use treadline_core::{ListingConfig, Product, VehicleSelection};

use crate::facets::{derive_facets, FacetOptions};
use crate::filter::filter_products;
use crate::paginate::{paginate, Page};
use crate::query::CatalogQuery;
use crate::sort::sort_by_price;

/// A product listing page: the fetched products, the shopper's query, and the
/// facet candidates derived once from the unfiltered list.
#[derive(Debug, Clone)]
pub struct Listing {
    config: ListingConfig,
    products: Vec<Product>,
    facets: FacetOptions,
    query: CatalogQuery,
}

impl Listing {
    #[must_use]
    pub fn new(config: ListingConfig, products: Vec<Product>) -> Self {
        let facets = derive_facets(&products);
        tracing::debug!(
            listing = %config.name,
            products = products.len(),
            "listing loaded"
        );
        Self {
            config,
            products,
            facets,
            query: CatalogQuery::new(),
        }
    }

    #[must_use]
    pub fn config(&self) -> &ListingConfig {
        &self.config
    }

    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub fn facets(&self) -> &FacetOptions {
        &self.facets
    }

    #[must_use]
    pub fn query(&self) -> &CatalogQuery {
        &self.query
    }

    pub fn query_mut(&mut self) -> &mut CatalogQuery {
        &mut self.query
    }

    /// Swaps in a fresh product list. Facets are re-derived and the page
    /// returns to 1; the rest of the query is kept.
    pub fn replace_products(&mut self, products: Vec<Product>) {
        self.facets = derive_facets(&products);
        self.products = products;
        self.query.set_page(1);
    }

    /// The current page after filtering and sorting.
    #[must_use]
    pub fn view(&self, vehicles: &[VehicleSelection]) -> Page<&Product> {
        let mut matched = filter_products(&self.products, &self.query, vehicles);
        if let Some(order) = self.query.sort() {
            sort_by_price(&mut matched, order);
        }
        paginate(matched, self.query.page(), self.config.page_size)
    }
}
