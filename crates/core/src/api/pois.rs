use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;

use super::http::ApiClient;
use crate::errors::CoreError;
use crate::models::poi::Poi;

/// Filters for the POI listing. Both are optional.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PoiQuery {
    #[serde(rename = "destination", skip_serializing_if = "Option::is_none")]
    pub destination_id: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// Read-only listing of points of interest for destination pages.
#[async_trait]
pub trait PoisApi: Send + Sync {
    async fn list_pois(&self, query: &PoiQuery) -> Result<Vec<Poi>, CoreError>;
}

/// `PoisApi` over the real backend.
#[derive(Debug)]
pub struct HttpPoisApi {
    client: Arc<ApiClient>,
}

impl HttpPoisApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PoisApi for HttpPoisApi {
    async fn list_pois(&self, query: &PoiQuery) -> Result<Vec<Poi>, CoreError> {
        self.client.get_with_query("/pois", query).await
    }
}
