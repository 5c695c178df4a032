use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;

use super::http::ApiClient;
use crate::errors::CoreError;
use crate::models::booking::Booking;

/// One page of the caller's bookings.
#[derive(Debug, Clone, Deserialize)]
pub struct BookingPage {
    pub items: Vec<Booking>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
}

/// Read-only access to the caller's bookings (created server-side when a
/// checkout settles).
#[async_trait]
pub trait BookingsApi: Send + Sync {
    async fn list_my_bookings(&self, page: u32, limit: u32) -> Result<BookingPage, CoreError>;

    async fn get_my_booking(&self, booking_id: &str) -> Result<Booking, CoreError>;
}

/// `BookingsApi` over the real backend.
#[derive(Debug)]
pub struct HttpBookingsApi {
    client: Arc<ApiClient>,
}

impl HttpBookingsApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl BookingsApi for HttpBookingsApi {
    async fn list_my_bookings(&self, page: u32, limit: u32) -> Result<BookingPage, CoreError> {
        self.client
            .get(&format!("/bookings?page={page}&limit={limit}"))
            .await
    }

    async fn get_my_booking(&self, booking_id: &str) -> Result<Booking, CoreError> {
        self.client.get(&format!("/bookings/{booking_id}")).await
    }
}
