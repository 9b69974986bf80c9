pub mod app_config;
pub mod cart;
pub mod config;
pub mod error;
mod lenient;
pub mod notice;
pub mod product;
pub mod reference;
pub mod storefront;
pub mod vehicle;

pub use app_config::{AppConfig, Environment};
pub use cart::{AddonService, Cart, CartItem, ProductDetails};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::{ConfigError, CoreError};
pub use notice::{Failure, FailureKind, Notice};
pub use product::{Listing, NamedRef, Product, ProductType, TireProduct, WheelProduct};
pub use reference::{
    Brand, Category, Diameter, DrivingType, Make, Model, Ratio, RefId, ReferenceValue, SizeCatalog,
    TireSize, Trim, Width, Year,
};
pub use storefront::{load_storefront, ListingConfig, StorefrontFile};
pub use vehicle::{SizeSelection, VehicleSelection};
