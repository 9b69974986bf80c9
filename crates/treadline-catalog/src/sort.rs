use std::fmt;
use std::str::FromStr;

use treadline_core::{CoreError, Product};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceSort {
    Ascending,
    Descending,
}

impl FromStr for PriceSort {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(PriceSort::Ascending),
            "desc" | "descending" => Ok(PriceSort::Descending),
            _ => Err(CoreError::InvalidSortOrder(s.to_owned())),
        }
    }
}

impl fmt::Display for PriceSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriceSort::Ascending => f.write_str("asc"),
            PriceSort::Descending => f.write_str("desc"),
        }
    }
}

/// Orders `products` by price. Equal prices keep their incoming order.
pub fn sort_by_price(products: &mut [&Product], order: PriceSort) {
    match order {
        PriceSort::Ascending => products.sort_by(|a, b| a.price().cmp(&b.price())),
        PriceSort::Descending => products.sort_by(|a, b| b.price().cmp(&a.price())),
    }
}
