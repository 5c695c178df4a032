use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;

use super::http::ApiClient;
use crate::errors::CoreError;
use crate::models::checkout::{CheckoutItem, CheckoutLink, InstantReceipt};

/// Remote checkout creation.
///
/// Emptying the cart of purchased items is the backend's job once a
/// checkout settles; callers observe it through a later cart refresh.
#[async_trait]
pub trait CheckoutApi: Send + Sync {
    /// Interactive flow: returns a payment link / QR payload the UI hands
    /// to the payment provider.
    async fn create_checkout(&self, items: &[CheckoutItem]) -> Result<CheckoutLink, CoreError>;

    /// Instant (demo) flow: settles immediately and returns the order code.
    async fn create_checkout_instant(
        &self,
        items: &[CheckoutItem],
    ) -> Result<InstantReceipt, CoreError>;
}

#[derive(Serialize)]
struct CheckoutBody<'a> {
    items: &'a [CheckoutItem],
}

/// `CheckoutApi` over the real backend.
#[derive(Debug)]
pub struct HttpCheckoutApi {
    client: Arc<ApiClient>,
}

impl HttpCheckoutApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CheckoutApi for HttpCheckoutApi {
    async fn create_checkout(&self, items: &[CheckoutItem]) -> Result<CheckoutLink, CoreError> {
        self.client.post("/checkout", &CheckoutBody { items }).await
    }

    async fn create_checkout_instant(
        &self,
        items: &[CheckoutItem],
    ) -> Result<InstantReceipt, CoreError> {
        self.client
            .post("/checkout/demo", &CheckoutBody { items })
            .await
    }
}
