use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cart::AddonService;
use crate::error::CoreError;
use crate::lenient;
use crate::reference::{Diameter, Ratio, RefId, Width};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductType {
    Tire,
    Wheel,
}

impl ProductType {
    /// Collection path on the storefront API, e.g. `"tires"`.
    #[must_use]
    pub fn collection(self) -> &'static str {
        match self {
            ProductType::Tire => "tires",
            ProductType::Wheel => "wheels",
        }
    }
}

impl fmt::Display for ProductType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductType::Tire => write!(f, "tire"),
            ProductType::Wheel => write!(f, "wheel"),
        }
    }
}

impl FromStr for ProductType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tire" | "tires" => Ok(ProductType::Tire),
            "wheel" | "wheels" => Ok(ProductType::Wheel),
            other => Err(CoreError::UnknownProductType(other.to_owned())),
        }
    }
}

/// A populated `{ _id, name }` reference nested inside a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedRef {
    #[serde(rename = "_id", default)]
    pub id: RefId,
    #[serde(deserialize_with = "lenient::string_or_number")]
    pub name: String,
}

/// Fields shared by every product regardless of type.
///
/// Nested references are optional and read leniently: a missing, `null`,
/// unpopulated or malformed reference deserializes to `None`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    #[serde(rename = "_id")]
    pub id: RefId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(deserialize_with = "lenient::decimal")]
    pub price: Decimal,
    /// Units available for purchase.
    #[serde(default, deserialize_with = "lenient::count")]
    pub stock: u32,
    /// Per-unit installation fee, charged only when installation is selected.
    #[serde(default, deserialize_with = "lenient::decimal_or_zero")]
    pub installation_fee: Decimal,
    #[serde(default)]
    pub addon_services: Vec<AddonService>,
    #[serde(default, deserialize_with = "lenient::nested")]
    pub brand: Option<NamedRef>,
    #[serde(default, deserialize_with = "lenient::nested")]
    pub category: Option<NamedRef>,
    #[serde(default, deserialize_with = "lenient::nested")]
    pub driving_type: Option<NamedRef>,
    #[serde(default, deserialize_with = "lenient::nested")]
    pub width: Option<Width>,
    #[serde(default, deserialize_with = "lenient::nested")]
    pub ratio: Option<Ratio>,
    #[serde(default, deserialize_with = "lenient::nested")]
    pub diameter: Option<Diameter>,
    #[serde(default, deserialize_with = "lenient::opt_string_or_number")]
    pub model: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string_or_number")]
    pub year: Option<String>,
    /// Explicit size label, e.g. `"225/45R17"`. Wheels usually leave it unset.
    #[serde(default, deserialize_with = "lenient::opt_string_or_number")]
    pub tire_size: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TireProduct {
    #[serde(flatten)]
    pub listing: Listing,
    #[serde(default)]
    pub season: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string_or_number")]
    pub load_index: Option<String>,
    #[serde(default)]
    pub speed_rating: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WheelProduct {
    #[serde(flatten)]
    pub listing: Listing,
    #[serde(default)]
    pub finish: Option<String>,
    #[serde(default)]
    pub bolt_pattern: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string_or_number")]
    pub offset: Option<String>,
}

/// A tire or a wheel, tagged by `productType` on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "productType", rename_all = "lowercase")]
pub enum Product {
    Tire(TireProduct),
    Wheel(WheelProduct),
}

fn name_of(r: Option<&NamedRef>) -> &str {
    r.map_or("", |r| r.name.as_str())
}

impl Product {
    #[must_use]
    pub fn listing(&self) -> &Listing {
        match self {
            Product::Tire(t) => &t.listing,
            Product::Wheel(w) => &w.listing,
        }
    }

    #[must_use]
    pub fn product_type(&self) -> ProductType {
        match self {
            Product::Tire(_) => ProductType::Tire,
            Product::Wheel(_) => ProductType::Wheel,
        }
    }

    #[must_use]
    pub fn id(&self) -> &RefId {
        &self.listing().id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.listing().name
    }

    #[must_use]
    pub fn description(&self) -> &str {
        self.listing().description.as_deref().unwrap_or("")
    }

    #[must_use]
    pub fn price(&self) -> Decimal {
        self.listing().price
    }

    #[must_use]
    pub fn brand_name(&self) -> &str {
        name_of(self.listing().brand.as_ref())
    }

    #[must_use]
    pub fn category_name(&self) -> &str {
        name_of(self.listing().category.as_ref())
    }

    #[must_use]
    pub fn driving_type_name(&self) -> &str {
        name_of(self.listing().driving_type.as_ref())
    }

    #[must_use]
    pub fn width_value(&self) -> &str {
        self.listing().width.as_ref().map_or("", |w| w.width.as_str())
    }

    #[must_use]
    pub fn ratio_value(&self) -> &str {
        self.listing().ratio.as_ref().map_or("", |r| r.ratio.as_str())
    }

    #[must_use]
    pub fn diameter_value(&self) -> &str {
        self.listing()
            .diameter
            .as_ref()
            .map_or("", |d| d.diameter.as_str())
    }

    #[must_use]
    pub fn model(&self) -> &str {
        self.listing().model.as_deref().unwrap_or("")
    }

    #[must_use]
    pub fn year(&self) -> &str {
        self.listing().year.as_deref().unwrap_or("")
    }

    /// The product's tire size: the explicit `tireSize` field if set, otherwise
    /// `"{width}/{ratio}R{diameter}"` when all three references are present.
    #[must_use]
    pub fn tire_size_label(&self) -> Option<String> {
        let listing = self.listing();
        if let Some(size) = listing.tire_size.as_deref().filter(|s| !s.trim().is_empty()) {
            return Some(size.to_owned());
        }
        let (w, r, d) = (self.width_value(), self.ratio_value(), self.diameter_value());
        if w.is_empty() || r.is_empty() || d.is_empty() {
            return None;
        }
        Some(format!("{w}/{r}R{d}"))
    }
}
