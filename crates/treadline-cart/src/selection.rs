use std::collections::BTreeSet;

use treadline_client::ServiceSync;
use treadline_core::{CartItem, ProductDetails, RefId};

use crate::error::CartError;

/// The services chosen for one cart line, keyed by add-on id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineSelection {
    pub installation: bool,
    pub addon_ids: BTreeSet<RefId>,
}

impl LineSelection {
    /// The selection the backend has recorded for `item`.
    #[must_use]
    pub fn from_item(item: &CartItem) -> Self {
        Self {
            installation: item.installation_selected,
            addon_ids: item.addon_services.iter().map(|a| a.id.clone()).collect(),
        }
    }

    /// Translates positions in `details.addon_services` into ids.
    ///
    /// Positional input only exists at the edge (a checkbox list); once
    /// translated the selection no longer depends on list order.
    ///
    /// # Errors
    ///
    /// [`CartError::AddonIndexOutOfRange`] for any position past the end of
    /// the offered list.
    pub fn from_indices(
        details: &ProductDetails,
        installation: bool,
        indices: &[usize],
    ) -> Result<Self, CartError> {
        let available = details.addon_services.len();
        let addon_ids = indices
            .iter()
            .map(|&index| {
                details
                    .addon_services
                    .get(index)
                    .map(|a| a.id.clone())
                    .ok_or(CartError::AddonIndexOutOfRange { index, available })
            })
            .collect::<Result<_, _>>()?;
        Ok(Self {
            installation,
            addon_ids,
        })
    }

    /// Adds the add-on if absent, removes it if present.
    pub fn toggle_addon(&mut self, addon: &RefId) {
        if !self.addon_ids.remove(addon) {
            self.addon_ids.insert(addon.clone());
        }
    }

    #[must_use]
    pub fn to_sync(&self) -> ServiceSync {
        ServiceSync {
            installation: self.installation,
            addon_services: self.addon_ids.iter().cloned().collect(),
        }
    }
}
