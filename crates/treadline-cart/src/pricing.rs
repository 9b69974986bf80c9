//! Cart totals.
//!
//! Every figure the storefront shows is computed by these functions from the
//! line items and the active service selections. The backend's `totalPrice`
//! is compared against the result but never displayed in its place.

use rust_decimal::Decimal;
use treadline_core::{AddonService, Cart, CartItem};

use crate::selection::LineSelection;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineTotals {
    pub subtotal: Decimal,
    pub installation: Decimal,
    pub addons: Decimal,
    pub total: Decimal,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CartTotals {
    pub subtotal: Decimal,
    pub installation_total: Decimal,
    pub addon_total: Decimal,
    pub grand_total: Decimal,
}

/// Add-ons a line can be priced against: the product's offered list, or the
/// recorded add-ons when the backend sent no product details.
fn addon_catalogue(item: &CartItem) -> &[AddonService] {
    let offered = item.offered_addons();
    if offered.is_empty() {
        &item.addon_services
    } else {
        offered
    }
}

#[must_use]
pub fn line_totals(item: &CartItem, selection: &LineSelection) -> LineTotals {
    let qty = Decimal::from(item.quantity);
    let subtotal = item.price * qty;
    let installation = if selection.installation {
        item.installation_fee * qty
    } else {
        Decimal::ZERO
    };
    // Ids missing from the catalogue contribute nothing.
    let addon_unit: Decimal = addon_catalogue(item)
        .iter()
        .filter(|a| selection.addon_ids.contains(&a.id))
        .map(|a| a.price)
        .sum();
    let addons = addon_unit * qty;
    LineTotals {
        subtotal,
        installation,
        addons,
        total: subtotal + installation + addons,
    }
}

#[must_use]
pub fn compute_totals<'a, I>(lines: I) -> CartTotals
where
    I: IntoIterator<Item = (&'a CartItem, &'a LineSelection)>,
{
    lines
        .into_iter()
        .map(|(item, selection)| line_totals(item, selection))
        .fold(CartTotals::default(), |acc, line| CartTotals {
            subtotal: acc.subtotal + line.subtotal,
            installation_total: acc.installation_total + line.installation,
            addon_total: acc.addon_total + line.addons,
            grand_total: acc.grand_total + line.total,
        })
}

/// Totals for `cart` exactly as the backend has recorded its selections.
#[must_use]
pub fn server_totals(cart: &Cart) -> CartTotals {
    let selections: Vec<LineSelection> = cart.items.iter().map(LineSelection::from_item).collect();
    compute_totals(cart.items.iter().zip(selections.iter()))
}

/// Logs when the backend's own total disagrees with ours. Returns whether
/// they agree (or the backend sent none).
pub fn check_server_total(cart: &Cart) -> bool {
    let Some(reported) = cart.total_price else {
        return true;
    };
    let computed = server_totals(cart).grand_total;
    if reported == computed {
        return true;
    }
    tracing::warn!(
        cart = %cart.id,
        %reported,
        %computed,
        "backend cart total differs from computed total; showing computed"
    );
    false
}
