//! Cart command handlers.
//!
//! Every command loads a fresh [`CartSession`], applies one change, and prints
//! the cart as re-read from the backend.

use std::collections::BTreeSet;

use clap::Subcommand;
use rust_decimal::Decimal;
use treadline_cart::{quantity_bounds, CartBackend, CartSession, LineSelection};
use treadline_client::ApiClient;
use treadline_core::RefId;

use crate::surface;

/// Sub-commands available under `cart`.
#[derive(Debug, Subcommand)]
pub enum CartCommands {
    /// Show cart lines and totals
    Show {
        #[arg(long)]
        user: String,
    },
    /// Set the quantity of a cart line
    Quantity {
        #[arg(long)]
        user: String,
        /// Product id of the line
        #[arg(long)]
        product: String,
        #[arg(long)]
        qty: u32,
    },
    /// Replace the installation and add-on choices of a cart line
    Services {
        #[arg(long)]
        user: String,
        #[arg(long)]
        product: String,
        /// Include installation
        #[arg(long)]
        installation: bool,
        /// Add-on id to select (repeatable)
        #[arg(long)]
        addon: Vec<String>,
        /// Add-on position in the offered list, starting at 0 (repeatable)
        #[arg(long)]
        addon_index: Vec<usize>,
    },
    /// Remove a line from the cart
    Remove {
        #[arg(long)]
        user: String,
        #[arg(long)]
        product: String,
    },
    /// Remove every line from the cart
    Clear {
        #[arg(long)]
        user: String,
    },
}

fn money(amount: Decimal) -> String {
    format!("{:.2}", amount.round_dp(2))
}

fn print_cart<B: CartBackend>(session: &CartSession<B>) {
    let cart = session.cart();
    if cart.is_empty() {
        println!("cart for {} is empty", session.user());
        return;
    }

    println!(
        "{:<26}{:<30}{:>5}{:>8}  {:<9}{:>10}",
        "PRODUCT", "NAME", "QTY", "MAX", "INSTALL", "TOTAL"
    );
    for item in &cart.items {
        let product = item.product_id();
        let (_, max) = quantity_bounds(item);
        let max = if max == u32::MAX {
            "-".to_string()
        } else {
            max.to_string()
        };
        let selection = session.selection(&product).unwrap_or_default();
        let line = session.line_totals(&product).unwrap_or_default();
        println!(
            "{:<26}{:<30}{:>5}{:>8}  {:<9}{:>10}",
            product.as_str(),
            item.display_name(),
            item.quantity,
            max,
            if selection.installation { "yes" } else { "no" },
            money(line.total)
        );
        for addon in item
            .offered_addons()
            .iter()
            .filter(|a| selection.addon_ids.contains(&a.id))
        {
            println!("{:<26}  + {} ({} each)", "", addon.name, money(addon.price));
        }
    }

    let totals = session.totals();
    println!();
    println!("subtotal      {:>10}", money(totals.subtotal));
    println!("installation  {:>10}", money(totals.installation_total));
    println!("add-ons       {:>10}", money(totals.addon_total));
    println!("total         {:>10}", money(totals.grand_total));
}

/// Dispatch a `cart` sub-command.
///
/// # Errors
///
/// Returns an error if the cart cannot be read, a value is rejected before
/// sending, or the backend refuses the change.
pub(crate) async fn run_cart(client: ApiClient, command: CartCommands) -> anyhow::Result<()> {
    match command {
        CartCommands::Show { user } => {
            let session = CartSession::load(client, user).await.map_err(surface)?;
            print_cart(&session);
        }
        CartCommands::Quantity { user, product, qty } => {
            let mut session = CartSession::load(client, user).await.map_err(surface)?;
            session
                .set_quantity(&RefId::new(product), qty)
                .await
                .map_err(surface)?;
            print_cart(&session);
        }
        CartCommands::Services {
            user,
            product,
            installation,
            addon,
            addon_index,
        } => {
            let mut session = CartSession::load(client, user).await.map_err(surface)?;
            let product = RefId::new(product);
            let mut selection = LineSelection {
                installation,
                addon_ids: addon.into_iter().map(RefId::new).collect::<BTreeSet<_>>(),
            };
            if !addon_index.is_empty() {
                let details = session
                    .cart()
                    .item(&product)
                    .and_then(|i| i.product_details.as_ref())
                    .ok_or_else(|| {
                        anyhow::anyhow!("product '{product}' has no add-on list to pick from")
                    })?;
                let picked = LineSelection::from_indices(details, installation, &addon_index)
                    .map_err(surface)?;
                selection.addon_ids.extend(picked.addon_ids);
            }
            let pending = session
                .set_selection(&product, selection)
                .map_err(surface)?;
            session.sync(pending).await.map_err(surface)?;
            print_cart(&session);
        }
        CartCommands::Remove { user, product } => {
            let mut session = CartSession::load(client, user).await.map_err(surface)?;
            session
                .remove(&RefId::new(product))
                .await
                .map_err(surface)?;
            print_cart(&session);
        }
        CartCommands::Clear { user } => {
            let mut session = CartSession::load(client, user).await.map_err(surface)?;
            session.clear().await.map_err(surface)?;
            print_cart(&session);
        }
    }
    Ok(())
}
