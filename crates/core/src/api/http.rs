use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde::Serialize;
use std::sync::{Arc, Mutex};

use crate::config::ApiConfig;
use crate::errors::CoreError;

/// Where the opaque auth token lives between requests.
///
/// The backend hands a bearer token out at login; every request afterwards
/// carries it. Hosts that have real persistent storage (keychain, browser
/// storage) implement this trait; tests and short-lived processes use
/// [`MemoryTokenStore`].
pub trait TokenStore: Send + Sync {
    fn get(&self) -> Option<String>;
    fn set(&self, token: &str);
    fn clear(&self);
}

/// In-memory token store — the token lives as long as the process.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> Option<String> {
        self.token.lock().ok().and_then(|t| t.clone())
    }

    fn set(&self, token: &str) {
        if let Ok(mut slot) = self.token.lock() {
            *slot = Some(token.to_string());
        }
    }

    fn clear(&self) {
        if let Ok(mut slot) = self.token.lock() {
            *slot = None;
        }
    }
}

/// Failure body the backend sends on non-2xx responses.
/// Some endpoints use `error`, older ones `message`.
#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Thin JSON transport over the backend REST API.
///
/// Attaches the bearer token (when present) to every request, decodes
/// success bodies into typed models, and lifts failure bodies into
/// [`CoreError::Api`] with the server's message forwarded verbatim.
pub struct ApiClient {
    base_url: String,
    client: Client,
    tokens: Arc<dyn TokenStore>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("has_token", &self.tokens.get().is_some())
            .finish()
    }
}

impl ApiClient {
    pub fn new(config: &ApiConfig, tokens: Arc<dyn TokenStore>) -> Self {
        let builder = Client::builder().timeout(config.timeout);
        Self {
            base_url: config.base_url.clone(),
            client: builder.build().unwrap_or_else(|_| Client::new()),
            tokens,
        }
    }

    pub fn tokens(&self) -> &Arc<dyn TokenStore> {
        &self.tokens
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let mut rb = self.client.request(method, url);
        if let Some(token) = self.tokens.get() {
            rb = rb.bearer_auth(token);
        }
        rb
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, CoreError> {
        self.send(self.request(Method::GET, path)).await
    }

    /// GET with a serialized query string; `None` fields are omitted.
    pub async fn get_with_query<T: DeserializeOwned, Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<T, CoreError> {
        self.send(self.request(Method::GET, path).query(query)).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, CoreError> {
        self.send(self.request(Method::POST, path).json(body)).await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, CoreError> {
        self.send(self.request(Method::PUT, path).json(body)).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, CoreError> {
        self.send(self.request(Method::DELETE, path)).await
    }

    async fn send<T: DeserializeOwned>(&self, rb: RequestBuilder) -> Result<T, CoreError> {
        let resp = rb.send().await?;
        let status = resp.status();
        let bytes = resp.bytes().await?;

        if !status.is_success() {
            return Err(Self::failure(status, &bytes));
        }

        serde_json::from_slice(&bytes).map_err(CoreError::from)
    }

    fn failure(status: StatusCode, body: &[u8]) -> CoreError {
        let message = serde_json::from_slice::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.error.or(b.message))
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("Request failed")
                    .to_string()
            });
        CoreError::Api {
            status: status.as_u16(),
            message,
        }
    }
}
