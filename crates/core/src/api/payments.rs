use async_trait::async_trait;
use std::sync::Arc;

use super::http::ApiClient;
use crate::errors::CoreError;
use crate::models::payment::Payment;

/// Read-only access to the caller's payment history.
#[async_trait]
pub trait PaymentsApi: Send + Sync {
    async fn list_my_payments(&self) -> Result<Vec<Payment>, CoreError>;

    async fn get_my_payment(&self, payment_id: &str) -> Result<Payment, CoreError>;
}

/// `PaymentsApi` over the real backend.
#[derive(Debug)]
pub struct HttpPaymentsApi {
    client: Arc<ApiClient>,
}

impl HttpPaymentsApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PaymentsApi for HttpPaymentsApi {
    async fn list_my_payments(&self) -> Result<Vec<Payment>, CoreError> {
        self.client.get("/payments").await
    }

    async fn get_my_payment(&self, payment_id: &str) -> Result<Payment, CoreError> {
        self.client.get(&format!("/payments/{payment_id}")).await
    }
}
