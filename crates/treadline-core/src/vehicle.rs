use serde::{Deserialize, Serialize};

use crate::product::ProductType;
use crate::reference::{Diameter, Ratio, Width};

/// A vehicle chosen through the finder, built left to right.
///
/// The JSON form of this struct is the saved-vehicle storage format, so its
/// field set is fixed at these five keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleSelection {
    pub year: String,
    pub make: String,
    pub model: String,
    pub trim: String,
    pub tire_size: String,
}

impl VehicleSelection {
    /// Field values in stage order: year, make, model, trim, tire size.
    #[must_use]
    pub fn fields(&self) -> [&str; 5] {
        [
            &self.year,
            &self.make,
            &self.model,
            &self.trim,
            &self.tire_size,
        ]
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.fields().iter().all(|f| !f.trim().is_empty())
    }

    /// Human-readable summary, e.g. `"2020 Honda Civic EX (215/55R16)"`.
    #[must_use]
    pub fn describe(&self) -> String {
        format!(
            "{} {} {} {} ({})",
            self.year, self.make, self.model, self.trim, self.tire_size
        )
    }
}

/// A completed tire-size search: width, ratio and diameter reference objects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SizeSelection {
    pub width: Width,
    pub ratio: Ratio,
    pub diameter: Diameter,
    pub product_type: ProductType,
}

impl SizeSelection {
    /// Size label in the usual sidewall notation, e.g. `"225/45R17"`.
    #[must_use]
    pub fn label(&self) -> String {
        format!(
            "{}/{}R{}",
            self.width.width, self.ratio.ratio, self.diameter.diameter
        )
    }
}
