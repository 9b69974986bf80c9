use serde::{Deserialize, Serialize};
use treadline_core::RefId;

/// Success envelope used by every storefront endpoint: `{ "data": ... }`.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

/// Body of a cart service update. Add-ons are identified by backend id,
/// never by their position in the product's add-on list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceSync {
    pub installation: bool,
    pub addon_services: Vec<RefId>,
}

#[derive(Debug, Serialize)]
pub(crate) struct QuantityUpdate {
    pub quantity: u32,
}
