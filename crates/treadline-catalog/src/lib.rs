//! Product listing engine: facet and text filtering, price sorting,
//! pagination, facet derivation and input debouncing.

pub mod debounce;
pub mod facets;
pub mod filter;
pub mod listing;
pub mod paginate;
pub mod query;
pub mod size;
pub mod sort;

pub use debounce::Debouncer;
pub use facets::{derive_facets, facet_values, FacetOptions};
pub use filter::{filter_products, matches};
pub use listing::Listing;
pub use paginate::{paginate, Page};
pub use query::{CatalogQuery, Facet};
pub use size::{fits_any_vehicle, fits_vehicle, normalize_tire_size};
pub use sort::{sort_by_price, PriceSort};
