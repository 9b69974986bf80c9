//! Tire size comparison between products and saved vehicles.

use std::sync::LazyLock;

use regex::Regex;
use treadline_core::{Product, VehicleSelection};

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));
static SIZE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:P|LT)?(\d+(?:\.\d+)?)/(\d+(?:\.\d+)?)Z?R(\d+(?:\.\d+)?)$").expect("valid regex")
});

/// Canonical spelling of a sidewall size: upper case, no whitespace, and
/// `ZR` folded to `R`. `"225/45 zr17"` and `"225/45R17"` both become
/// `"225/45R17"`. Strings that do not look like a size are only upper-cased
/// and stripped of whitespace.
#[must_use]
pub fn normalize_tire_size(raw: &str) -> String {
    let compact = WHITESPACE_RE.replace_all(raw, "").to_uppercase();
    match SIZE_RE.captures(&compact) {
        Some(caps) => format!("{}/{}R{}", &caps[1], &caps[2], &caps[3]),
        None => compact,
    }
}

/// Whether `product` carries the vehicle's tire size.
#[must_use]
pub fn fits_vehicle(product: &Product, vehicle: &VehicleSelection) -> bool {
    let Some(size) = product.tire_size_label() else {
        return false;
    };
    let wanted = normalize_tire_size(&vehicle.tire_size);
    !wanted.is_empty() && normalize_tire_size(&size) == wanted
}

#[must_use]
pub fn fits_any_vehicle(product: &Product, vehicles: &[VehicleSelection]) -> bool {
    vehicles.iter().any(|v| fits_vehicle(product, v))
}
