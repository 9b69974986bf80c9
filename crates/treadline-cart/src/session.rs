//! A shopper's cart as seen by the storefront.
//!
//! Add-on and installation choices are optimistic: they land in a local
//! overlay at once and are synced afterwards. Quantity changes, removals and
//! clearing are confirmed by the backend before the session changes.

use std::collections::HashMap;

use treadline_client::ServiceSync;
use treadline_core::{Cart, CartItem, RefId};

use crate::backend::CartBackend;
use crate::error::CartError;
use crate::pricing::{check_server_total, compute_totals, line_totals, CartTotals, LineTotals};
use crate::selection::LineSelection;

const MIN_QUANTITY: u32 = 1;

/// Inclusive quantity range for a line. Without stock information only the
/// lower bound applies.
#[must_use]
pub fn quantity_bounds(item: &CartItem) -> (u32, u32) {
    (MIN_QUANTITY, item.available_stock().unwrap_or(u32::MAX))
}

/// A service update waiting to be sent for one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSync {
    pub product: RefId,
    pub services: ServiceSync,
}

pub struct CartSession<B> {
    backend: B,
    user: String,
    cart: Cart,
    overlay: HashMap<RefId, LineSelection>,
}

impl<B: CartBackend> CartSession<B> {
    /// Reads the user's cart and starts a session over it.
    ///
    /// # Errors
    ///
    /// [`CartError::Fetch`] when the cart cannot be read.
    pub async fn load(backend: B, user: impl Into<String>) -> Result<Self, CartError> {
        let user = user.into();
        let cart = backend.get_cart(&user).await.map_err(CartError::Fetch)?;
        check_server_total(&cart);
        Ok(Self {
            backend,
            user,
            cart,
            overlay: HashMap::new(),
        })
    }

    #[must_use]
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    #[must_use]
    pub fn user(&self) -> &str {
        &self.user
    }

    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Whether any line has choices the backend has not confirmed yet.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.overlay.is_empty()
    }

    /// The effective selection for a line: the unsent choice if there is one,
    /// otherwise what the backend recorded.
    #[must_use]
    pub fn selection(&self, product: &RefId) -> Option<LineSelection> {
        let item = self.cart.item(product)?;
        Some(
            self.overlay
                .get(product)
                .cloned()
                .unwrap_or_else(|| LineSelection::from_item(item)),
        )
    }

    #[must_use]
    pub fn line_totals(&self, product: &RefId) -> Option<LineTotals> {
        let item = self.cart.item(product)?;
        let selection = self.selection(product)?;
        Some(line_totals(item, &selection))
    }

    /// Totals including unsent choices.
    #[must_use]
    pub fn totals(&self) -> CartTotals {
        let selections: Vec<LineSelection> = self
            .cart
            .items
            .iter()
            .map(|item| self.effective(item))
            .collect();
        compute_totals(self.cart.items.iter().zip(selections.iter()))
    }

    /// Flips installation for a line.
    ///
    /// # Errors
    ///
    /// [`CartError::UnknownItem`] when the product is not in the cart.
    pub fn toggle_installation(&mut self, product: &RefId) -> Result<PendingSync, CartError> {
        let mut selection = self.current(product)?;
        selection.installation = !selection.installation;
        Ok(self.stage(product, selection))
    }

    /// Adds or removes an add-on on a line.
    ///
    /// # Errors
    ///
    /// [`CartError::UnknownItem`] for a product not in the cart,
    /// [`CartError::UnknownAddon`] for an add-on the line does not offer.
    pub fn toggle_addon(
        &mut self,
        product: &RefId,
        addon: &RefId,
    ) -> Result<PendingSync, CartError> {
        let mut selection = self.current(product)?;
        let offered = self
            .cart
            .item(product)
            .is_some_and(|item| item.offered_addons().iter().any(|a| &a.id == addon));
        if !offered && !selection.addon_ids.contains(addon) {
            return Err(CartError::UnknownAddon {
                product: product.clone(),
                addon: addon.clone(),
            });
        }
        selection.toggle_addon(addon);
        Ok(self.stage(product, selection))
    }

    /// Replaces a line's whole selection.
    ///
    /// # Errors
    ///
    /// [`CartError::UnknownItem`] when the product is not in the cart.
    pub fn set_selection(
        &mut self,
        product: &RefId,
        selection: LineSelection,
    ) -> Result<PendingSync, CartError> {
        self.current(product)?;
        Ok(self.stage(product, selection))
    }

    /// Sends a staged service update, then re-reads the cart.
    ///
    /// On failure the unsent choice stays in place so totals keep showing
    /// what the shopper picked.
    ///
    /// # Errors
    ///
    /// [`CartError::Mutation`] when the update is refused,
    /// [`CartError::Fetch`] when the follow-up read fails.
    pub async fn sync(&mut self, request: PendingSync) -> Result<(), CartError> {
        if let Err(source) = self
            .backend
            .update_services(&self.user, &request.product, &request.services)
            .await
        {
            tracing::warn!(
                product = %request.product,
                error = %source,
                "service update failed; keeping local selection"
            );
            return Err(CartError::Mutation {
                operation: "service update",
                source,
            });
        }
        self.refresh().await
    }

    /// Sets a line's quantity. Out-of-range values are refused without
    /// contacting the backend.
    ///
    /// # Errors
    ///
    /// [`CartError::UnknownItem`], [`CartError::QuantityOutOfRange`],
    /// [`CartError::Mutation`] when the backend refuses, or
    /// [`CartError::Fetch`] when the follow-up read fails.
    pub async fn set_quantity(&mut self, product: &RefId, quantity: u32) -> Result<(), CartError> {
        let item = self
            .cart
            .item(product)
            .ok_or_else(|| CartError::UnknownItem(product.clone()))?;
        let (min, max) = quantity_bounds(item);
        if !(min..=max).contains(&quantity) {
            return Err(CartError::QuantityOutOfRange {
                product: product.clone(),
                requested: quantity,
                min,
                max,
            });
        }
        if quantity == item.quantity {
            return Ok(());
        }

        self.backend
            .update_item(&self.user, product, quantity)
            .await
            .map_err(|source| CartError::Mutation {
                operation: "quantity update",
                source,
            })?;
        self.refresh().await
    }

    /// Removes a line once the backend confirms.
    ///
    /// # Errors
    ///
    /// [`CartError::Mutation`] when the backend refuses; the line is kept.
    pub async fn remove(&mut self, product: &RefId) -> Result<(), CartError> {
        if self.cart.item(product).is_none() {
            return Err(CartError::UnknownItem(product.clone()));
        }
        self.backend
            .remove_item(&self.user, product)
            .await
            .map_err(|source| CartError::Mutation {
                operation: "remove",
                source,
            })?;
        self.refresh().await
    }

    /// Empties the cart once the backend confirms.
    ///
    /// # Errors
    ///
    /// [`CartError::Mutation`] when the backend refuses; the cart is kept.
    pub async fn clear(&mut self) -> Result<(), CartError> {
        self.backend
            .clear_cart(&self.user)
            .await
            .map_err(|source| CartError::Mutation {
                operation: "clear",
                source,
            })?;
        self.refresh().await
    }

    /// Re-reads the cart. A successful read replaces every unsent choice.
    ///
    /// # Errors
    ///
    /// [`CartError::Fetch`]; the previous cart and choices are kept.
    pub async fn refresh(&mut self) -> Result<(), CartError> {
        let cart = self
            .backend
            .get_cart(&self.user)
            .await
            .map_err(CartError::Fetch)?;
        check_server_total(&cart);
        self.cart = cart;
        self.overlay.clear();
        Ok(())
    }

    fn effective(&self, item: &CartItem) -> LineSelection {
        self.overlay
            .get(&item.product_id())
            .cloned()
            .unwrap_or_else(|| LineSelection::from_item(item))
    }

    fn current(&self, product: &RefId) -> Result<LineSelection, CartError> {
        self.selection(product)
            .ok_or_else(|| CartError::UnknownItem(product.clone()))
    }

    fn stage(&mut self, product: &RefId, selection: LineSelection) -> PendingSync {
        let services = selection.to_sync();
        self.overlay.insert(product.clone(), selection);
        PendingSync {
            product: product.clone(),
            services,
        }
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
