use treadline_core::{Product, VehicleSelection};

use crate::query::{CatalogQuery, Facet};
use crate::size::fits_any_vehicle;

fn matches_text(product: &Product, text: &str) -> bool {
    let needle = text.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    product.name().to_lowercase().contains(&needle)
        || product.description().to_lowercase().contains(&needle)
}

/// Whether `product` passes every part of `query`.
///
/// The vehicle restriction only applies when the query asks for it and at
/// least one vehicle is saved.
#[must_use]
pub fn matches(product: &Product, query: &CatalogQuery, vehicles: &[VehicleSelection]) -> bool {
    if !matches_text(product, query.text()) {
        return false;
    }
    let facets_ok = Facet::ALL.iter().all(|facet| {
        query
            .selected(*facet)
            .is_none_or(|values| values.contains(facet.value_of(product)))
    });
    if !facets_ok {
        return false;
    }
    if query.vehicles_only() && !vehicles.is_empty() {
        return fits_any_vehicle(product, vehicles);
    }
    true
}

/// The products matching `query`, in their original order.
#[must_use]
pub fn filter_products<'a>(
    products: &'a [Product],
    query: &CatalogQuery,
    vehicles: &[VehicleSelection],
) -> Vec<&'a Product> {
    products
        .iter()
        .filter(|p| matches(p, query, vehicles))
        .collect()
}

#[cfg(test)]
#[path = "filter_test.rs"]
mod tests;
