use async_trait::async_trait;
use std::sync::Arc;

use super::http::ApiClient;
use crate::errors::CoreError;
use crate::models::tour::{Destination, Tour, TourOption};

/// Query for listing a tour's departures.
#[derive(Debug, Clone, Default)]
pub struct TourOptionQuery {
    /// Only departures marked open by the backend.
    pub only_open: bool,
    /// Only departures in the future.
    pub only_future: bool,
}

/// Read-only browse surface: tours, departures, destinations.
#[async_trait]
pub trait ToursApi: Send + Sync {
    async fn list_tours(&self, destination_id: Option<&str>) -> Result<Vec<Tour>, CoreError>;

    async fn get_tour(&self, tour_id: &str) -> Result<Tour, CoreError>;

    /// Departures of one tour, for the option picker that feeds
    /// add-to-cart with a `(tour_id, option_id)` pair.
    async fn list_tour_options(
        &self,
        tour_id: &str,
        query: &TourOptionQuery,
    ) -> Result<Vec<TourOption>, CoreError>;

    async fn list_destinations(&self) -> Result<Vec<Destination>, CoreError>;
}

/// `ToursApi` over the real backend.
#[derive(Debug)]
pub struct HttpToursApi {
    client: Arc<ApiClient>,
}

impl HttpToursApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ToursApi for HttpToursApi {
    async fn list_tours(&self, destination_id: Option<&str>) -> Result<Vec<Tour>, CoreError> {
        let path = match destination_id {
            Some(dest) => format!("/tours?destination={dest}"),
            None => "/tours".to_string(),
        };
        self.client.get(&path).await
    }

    async fn get_tour(&self, tour_id: &str) -> Result<Tour, CoreError> {
        self.client.get(&format!("/tours/{tour_id}")).await
    }

    async fn list_tour_options(
        &self,
        tour_id: &str,
        query: &TourOptionQuery,
    ) -> Result<Vec<TourOption>, CoreError> {
        let mut params = Vec::new();
        if query.only_open {
            params.push("onlyOpen=1");
        }
        if query.only_future {
            params.push("onlyFuture=1");
        }
        let path = if params.is_empty() {
            format!("/tours/{tour_id}/options")
        } else {
            format!("/tours/{tour_id}/options?{}", params.join("&"))
        };
        self.client.get(&path).await
    }

    async fn list_destinations(&self) -> Result<Vec<Destination>, CoreError> {
        self.client.get("/destinations").await
    }
}
