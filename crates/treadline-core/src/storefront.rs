use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::product::ProductType;
use crate::ConfigError;

/// One product listing page and its fixed page size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingConfig {
    pub name: String,
    pub product_type: ProductType,
    pub page_size: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorefrontFile {
    pub listings: Vec<ListingConfig>,
}

impl Default for StorefrontFile {
    fn default() -> Self {
        let listing = |name: &str, product_type, page_size| ListingConfig {
            name: name.to_string(),
            product_type,
            page_size,
        };
        Self {
            listings: vec![
                listing("tires", ProductType::Tire, 20),
                listing("wheels", ProductType::Wheel, 9),
                listing("featured", ProductType::Tire, 8),
            ],
        }
    }
}

impl StorefrontFile {
    #[must_use]
    pub fn listing(&self, name: &str) -> Option<&ListingConfig> {
        self.listings.iter().find(|l| l.name == name)
    }
}

/// Load and validate the storefront listing configuration from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_storefront(path: &Path) -> Result<StorefrontFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::StorefrontFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let storefront: StorefrontFile = serde_yaml::from_str(&content)?;

    validate_storefront(&storefront)?;

    Ok(storefront)
}

fn validate_storefront(storefront: &StorefrontFile) -> Result<(), ConfigError> {
    if storefront.listings.is_empty() {
        return Err(ConfigError::Validation(
            "at least one listing must be configured".to_string(),
        ));
    }

    let mut seen_names = HashSet::new();

    for listing in &storefront.listings {
        if listing.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "listing name must be non-empty".to_string(),
            ));
        }

        if listing.page_size == 0 {
            return Err(ConfigError::Validation(format!(
                "listing '{}' has page size 0; must be at least 1",
                listing.name
            )));
        }

        if !seen_names.insert(listing.name.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate listing name: '{}'",
                listing.name
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "storefront_test.rs"]
mod tests;
