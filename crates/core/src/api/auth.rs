use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::http::ApiClient;
use crate::errors::CoreError;
use crate::models::user::User;

/// A successful login: the bearer token for subsequent requests plus the
/// account it belongs to.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

/// Registration payload for a new account.
#[derive(Debug, Clone, Serialize)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// Remote auth operations consumed by the [`Session`](crate::session::Session).
/// Logout is purely local (token discard) and has no endpoint.
#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, CoreError>;

    async fn register(&self, account: &NewAccount) -> Result<User, CoreError>;

    /// Resolve the identity behind the currently attached token.
    async fn me(&self) -> Result<User, CoreError>;
}

// ── Wire shapes ─────────────────────────────────────────────────────

#[derive(Serialize)]
struct LoginBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct UserEnvelope {
    user: User,
}

/// `AuthApi` over the real backend.
#[derive(Debug)]
pub struct HttpAuthApi {
    client: Arc<ApiClient>,
}

impl HttpAuthApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AuthApi for HttpAuthApi {
    async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, CoreError> {
        self.client
            .post("/auth/login", &LoginBody { email, password })
            .await
    }

    async fn register(&self, account: &NewAccount) -> Result<User, CoreError> {
        let envelope: UserEnvelope = self.client.post("/auth/register", account).await?;
        Ok(envelope.user)
    }

    async fn me(&self) -> Result<User, CoreError> {
        let envelope: UserEnvelope = self.client.get("/auth/me").await?;
        Ok(envelope.user)
    }
}
