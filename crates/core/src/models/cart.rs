use serde::{Deserialize, Serialize};

/// What a cart line refers to. The storefront currently sells tours only,
/// but the wire format carries a discriminator so other kinds can appear
/// without breaking old clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CartItemKind {
    Tour,
}

impl std::fmt::Display for CartItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CartItemKind::Tour => write!(f, "tour"),
        }
    }
}

/// One purchasable line in the cart.
///
/// The id is assigned by the backend and is opaque here — the client never
/// synthesizes one. `unit_price` is set by the server at add-time from its
/// own price lookup and is not editable client-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    #[serde(rename = "_id")]
    pub id: String,

    #[serde(rename = "type")]
    pub kind: CartItemKind,

    /// Id of the purchased entity (the tour).
    pub ref_id: String,

    /// Id of the scheduled departure the line books.
    pub option_id: String,

    /// Quantity; at least 1 for as long as the item exists.
    pub qty: u32,

    /// Server-assigned price per unit, in the backend's currency unit.
    pub unit_price: f64,
}

impl CartItem {
    /// Line subtotal (qty × unit price).
    #[must_use]
    pub fn subtotal(&self) -> f64 {
        f64::from(self.qty) * self.unit_price
    }
}

/// The authoritative shopping cart for one identity.
///
/// An unauthenticated context has no cart at all (`Option<Cart>` is `None`),
/// which is distinct from an authenticated user with an empty one. Snapshots
/// are replaced wholesale whenever the backend returns a new cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    pub user_id: String,
    pub items: Vec<CartItem>,
}

impl Cart {
    /// Sum of quantities across all items.
    #[must_use]
    pub fn total_qty(&self) -> u32 {
        self.items.iter().map(|i| i.qty).sum()
    }

    #[must_use]
    pub fn find_item(&self, item_id: &str) -> Option<&CartItem> {
        self.items.iter().find(|i| i.id == item_id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
