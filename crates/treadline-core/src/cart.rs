use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::lenient;
use crate::product::ProductType;
use crate::reference::RefId;

/// An optional priced service attachable to a cart line, billed per unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddonService {
    #[serde(rename = "_id")]
    pub id: RefId,
    pub name: String,
    #[serde(deserialize_with = "lenient::decimal")]
    pub price: Decimal,
}

/// Product data the backend embeds in each cart line.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetails {
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::count")]
    pub stock: u32,
    /// Every add-on that may be attached to this line.
    #[serde(default)]
    pub addon_services: Vec<AddonService>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    #[serde(deserialize_with = "lenient::id_or_object")]
    pub product: String,
    pub product_type: ProductType,
    #[serde(deserialize_with = "lenient::count")]
    pub quantity: u32,
    #[serde(deserialize_with = "lenient::decimal")]
    pub price: Decimal,
    #[serde(default, deserialize_with = "lenient::decimal_or_zero")]
    pub installation_fee: Decimal,
    /// Whether the backend has installation recorded for this line.
    #[serde(default)]
    pub installation_selected: bool,
    /// Add-ons the backend has recorded for this line.
    #[serde(default)]
    pub addon_services: Vec<AddonService>,
    #[serde(default, deserialize_with = "lenient::nested")]
    pub product_details: Option<ProductDetails>,
}

impl CartItem {
    #[must_use]
    pub fn product_id(&self) -> RefId {
        RefId::new(self.product.clone())
    }

    /// Available stock, if the backend sent product details.
    #[must_use]
    pub fn available_stock(&self) -> Option<u32> {
        self.product_details.as_ref().map(|d| d.stock)
    }

    /// The add-ons offered for this line. Empty when details are missing.
    #[must_use]
    pub fn offered_addons(&self) -> &[AddonService] {
        self.product_details
            .as_ref()
            .map_or(&[], |d| d.addon_services.as_slice())
    }

    #[must_use]
    pub fn display_name(&self) -> &str {
        self.product_details
            .as_ref()
            .map_or(self.product.as_str(), |d| d.name.as_str())
    }
}

/// The backend cart entity. The client only mirrors it and requests mutations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    #[serde(rename = "_id", default)]
    pub id: RefId,
    #[serde(default, deserialize_with = "lenient::id_or_object_or_empty")]
    pub user: String,
    #[serde(default)]
    pub items: Vec<CartItem>,
    /// Server-computed total. Informational only; see `treadline_cart::pricing`.
    #[serde(default, deserialize_with = "lenient::opt_decimal")]
    pub total_price: Option<Decimal>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Cart {
    #[must_use]
    pub fn item(&self, product: &RefId) -> Option<&CartItem> {
        self.items.iter().find(|i| i.product == product.as_str())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total units across all lines, as shown on a header badge.
    #[must_use]
    pub fn unit_count(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }
}
