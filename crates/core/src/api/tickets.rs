use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::http::ApiClient;
use crate::errors::CoreError;
use crate::models::ticket::{Ticket, TicketStatus};

/// Filters for listing the caller's tickets. Everything is optional; the
/// backend pages with its own defaults when `page`/`limit` are absent.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TicketQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TicketStatus>,
    /// Free-text search over code and booking snapshot fields.
    #[serde(rename = "q", skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booking_id: Option<String>,
}

/// One page of the caller's tickets.
#[derive(Debug, Clone, Deserialize)]
pub struct TicketPage {
    pub rows: Vec<Ticket>,
    pub page: u32,
    pub limit: u32,
    pub total: u64,
}

/// Read-only access to the caller's tickets, issued server-side when a
/// booking is paid. Lookup by code serves the "scan failed, type it in"
/// path at the gate.
#[async_trait]
pub trait TicketsApi: Send + Sync {
    async fn list_my_tickets(&self, query: &TicketQuery) -> Result<TicketPage, CoreError>;

    async fn get_my_ticket(&self, ticket_id: &str) -> Result<Ticket, CoreError>;

    async fn get_my_ticket_by_code(&self, code: &str) -> Result<Ticket, CoreError>;
}

/// `TicketsApi` over the real backend.
#[derive(Debug)]
pub struct HttpTicketsApi {
    client: Arc<ApiClient>,
}

impl HttpTicketsApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TicketsApi for HttpTicketsApi {
    async fn list_my_tickets(&self, query: &TicketQuery) -> Result<TicketPage, CoreError> {
        self.client.get_with_query("/tickets", query).await
    }

    async fn get_my_ticket(&self, ticket_id: &str) -> Result<Ticket, CoreError> {
        self.client.get(&format!("/tickets/{ticket_id}")).await
    }

    async fn get_my_ticket_by_code(&self, code: &str) -> Result<Ticket, CoreError> {
        self.client.get(&format!("/tickets/code/{code}")).await
    }
}
