use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use treadline_core::Product;

use crate::sort::PriceSort;

/// A product attribute the listing can be narrowed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Facet {
    Brand,
    Category,
    Width,
    Ratio,
    Diameter,
    Model,
    Year,
    DrivingType,
}

impl Facet {
    pub const ALL: [Facet; 8] = [
        Facet::Brand,
        Facet::Category,
        Facet::Width,
        Facet::Ratio,
        Facet::Diameter,
        Facet::Model,
        Facet::Year,
        Facet::DrivingType,
    ];

    /// The product's value for this facet, trimmed; `""` when absent.
    #[must_use]
    pub fn value_of(self, product: &Product) -> &str {
        let value = match self {
            Facet::Brand => product.brand_name(),
            Facet::Category => product.category_name(),
            Facet::Width => product.width_value(),
            Facet::Ratio => product.ratio_value(),
            Facet::Diameter => product.diameter_value(),
            Facet::Model => product.model(),
            Facet::Year => product.year(),
            Facet::DrivingType => product.driving_type_name(),
        };
        value.trim()
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Facet::Brand => "brand",
            Facet::Category => "category",
            Facet::Width => "width",
            Facet::Ratio => "ratio",
            Facet::Diameter => "diameter",
            Facet::Model => "model",
            Facet::Year => "year",
            Facet::DrivingType => "driving type",
        }
    }
}

impl fmt::Display for Facet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Everything the shopper has set on a listing.
///
/// Every setter that changes what matches, or in which order, puts the page
/// back to 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogQuery {
    text: String,
    facets: BTreeMap<Facet, BTreeSet<String>>,
    sort: Option<PriceSort>,
    vehicles_only: bool,
    page: usize,
}

impl Default for CatalogQuery {
    fn default() -> Self {
        Self {
            text: String::new(),
            facets: BTreeMap::new(),
            sort: None,
            vehicles_only: false,
            page: 1,
        }
    }
}

impl CatalogQuery {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Selected values for `facet`. Empty means the facet matches everything.
    #[must_use]
    pub fn selected(&self, facet: Facet) -> Option<&BTreeSet<String>> {
        self.facets.get(&facet).filter(|s| !s.is_empty())
    }

    #[must_use]
    pub fn sort(&self) -> Option<PriceSort> {
        self.sort
    }

    #[must_use]
    pub fn vehicles_only(&self) -> bool {
        self.vehicles_only
    }

    #[must_use]
    pub fn page(&self) -> usize {
        self.page
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.page = 1;
    }

    pub fn set_facet<I, S>(&mut self, facet: Facet, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: BTreeSet<String> = values.into_iter().map(Into::into).collect();
        if values.is_empty() {
            self.facets.remove(&facet);
        } else {
            self.facets.insert(facet, values);
        }
        self.page = 1;
    }

    /// Adds `value` to the facet's selection, or removes it if already there.
    pub fn toggle_facet_value(&mut self, facet: Facet, value: &str) {
        let set = self.facets.entry(facet).or_default();
        if !set.remove(value) {
            set.insert(value.to_owned());
        }
        if set.is_empty() {
            self.facets.remove(&facet);
        }
        self.page = 1;
    }

    pub fn clear_filters(&mut self) {
        self.facets.clear();
        self.text.clear();
        self.vehicles_only = false;
        self.page = 1;
    }

    pub fn set_sort(&mut self, sort: Option<PriceSort>) {
        self.sort = sort;
        self.page = 1;
    }

    /// Restricts results to products that fit a saved vehicle.
    pub fn set_vehicles_only(&mut self, on: bool) {
        self.vehicles_only = on;
        self.page = 1;
    }

    /// Pages are 1-based; 0 is treated as 1.
    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    /// Non-empty facet selections, in facet order.
    pub fn active_facets(&self) -> impl Iterator<Item = (Facet, &BTreeSet<String>)> {
        self.facets
            .iter()
            .filter(|(_, values)| !values.is_empty())
            .map(|(facet, values)| (*facet, values))
    }
}
