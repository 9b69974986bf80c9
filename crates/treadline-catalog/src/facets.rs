//! Dropdown candidates for each facet.
//!
//! Candidates always come from the full, unfiltered product list so that a
//! choice in one dropdown never empties another.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use treadline_core::Product;

use crate::query::Facet;

pub type FacetOptions = BTreeMap<Facet, Vec<String>>;

/// Distinct non-empty values of `facet` across `products`.
///
/// Sorted numerically when every value parses as a number, so widths read
/// `195, 205, 225` rather than `195, 225, 205`; otherwise sorted lexically.
#[must_use]
pub fn facet_values(products: &[Product], facet: Facet) -> Vec<String> {
    let distinct: BTreeSet<&str> = products
        .iter()
        .map(|p| facet.value_of(p))
        .filter(|v| !v.is_empty())
        .collect();

    let numbers: Option<Vec<f64>> = distinct.iter().map(|v| v.parse::<f64>().ok()).collect();
    let mut values: Vec<String> = distinct.iter().map(|v| (*v).to_owned()).collect();
    if let Some(numbers) = numbers {
        let mut paired: Vec<(f64, String)> = numbers.into_iter().zip(values).collect();
        paired.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));
        values = paired.into_iter().map(|(_, v)| v).collect();
    }
    values
}

#[must_use]
pub fn derive_facets(products: &[Product]) -> FacetOptions {
    Facet::ALL
        .iter()
        .map(|facet| (*facet, facet_values(products, *facet)))
        .collect()
}
