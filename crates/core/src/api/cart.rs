use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;

use super::http::ApiClient;
use crate::errors::CoreError;
use crate::models::cart::Cart;

/// Remote cart operations, as the [`CartStore`](crate::store::CartStore)
/// consumes them.
///
/// Every mutation returns the **entire** cart, not a delta — the store's
/// replace-snapshot-wholesale reconciliation depends on this, so a mock
/// that returned partial state would not be a faithful backend.
#[async_trait]
pub trait CartApi: Send + Sync {
    /// Fetch the current cart for the authenticated identity.
    async fn get_cart(&self) -> Result<Cart, CoreError>;

    /// Add a tour departure to the cart. The backend is the sole authority
    /// for price lookup, capacity validation, and duplicate-line merging.
    async fn add_tour_item(
        &self,
        tour_id: &str,
        option_id: &str,
        qty: u32,
    ) -> Result<Cart, CoreError>;

    /// Set the quantity of an existing cart item.
    async fn update_item_qty(&self, item_id: &str, qty: u32) -> Result<Cart, CoreError>;

    /// Remove one item from the cart.
    async fn remove_item(&self, item_id: &str) -> Result<Cart, CoreError>;
}

// ── Request payloads ────────────────────────────────────────────────

#[derive(Serialize)]
struct AddItemBody<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
    ref_id: &'a str,
    option_id: &'a str,
    qty: u32,
}

#[derive(Serialize)]
struct UpdateQtyBody {
    qty: u32,
}

/// `CartApi` over the real backend.
#[derive(Debug)]
pub struct HttpCartApi {
    client: Arc<ApiClient>,
}

impl HttpCartApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CartApi for HttpCartApi {
    async fn get_cart(&self) -> Result<Cart, CoreError> {
        self.client.get("/cart").await
    }

    async fn add_tour_item(
        &self,
        tour_id: &str,
        option_id: &str,
        qty: u32,
    ) -> Result<Cart, CoreError> {
        let body = AddItemBody {
            kind: "tour",
            ref_id: tour_id,
            option_id,
            qty,
        };
        self.client.post("/cart/items", &body).await
    }

    async fn update_item_qty(&self, item_id: &str, qty: u32) -> Result<Cart, CoreError> {
        let body = UpdateQtyBody { qty };
        self.client
            .put(&format!("/cart/items/{item_id}"), &body)
            .await
    }

    async fn remove_item(&self, item_id: &str) -> Result<Cart, CoreError> {
        self.client.delete(&format!("/cart/{item_id}")).await
    }
}
