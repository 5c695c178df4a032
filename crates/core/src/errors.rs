use thiserror::Error;

/// Unified error type for the entire tourbook-core library.
/// Every fallible public function returns `Result<T, CoreError>`.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Session / Identity ──────────────────────────────────────────
    #[error("Not authenticated")]
    NotAuthenticated,

    // ── API / Network ───────────────────────────────────────────────
    /// The backend rejected the request (validation, capacity, stale
    /// price, auth). The message is the server's own, forwarded verbatim
    /// so the UI can display it unchanged.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    // ── Client-side validation ──────────────────────────────────────
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Cart item not found: {0}")]
    ItemNotFound(String),
}

impl CoreError {
    /// The message a consumer should surface to the user.
    /// For remote rejections this is the server's own text, untouched.
    #[must_use]
    pub fn display_message(&self) -> String {
        match self {
            CoreError::Api { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<reqwest::Error> for CoreError {
    fn from(e: reqwest::Error) -> Self {
        // Sanitize error message: strip query parameters from URLs so
        // tokens or search terms never end up in logs or alerts.
        let msg = e.to_string();
        let sanitized = if let Some(idx) = msg.find('?') {
            format!("{}?<query redacted>", &msg[..idx])
        } else {
            msg
        };
        CoreError::Network(sanitized)
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}
