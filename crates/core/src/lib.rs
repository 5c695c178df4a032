pub mod api;
pub mod checkout;
pub mod config;
pub mod errors;
pub mod models;
pub mod session;
pub mod store;
pub mod subscribers;
pub mod util;

use std::sync::Arc;

use api::auth::HttpAuthApi;
use api::bookings::{BookingsApi, HttpBookingsApi};
use api::cart::{CartApi, HttpCartApi};
use api::checkout::{CheckoutApi, HttpCheckoutApi};
use api::http::{ApiClient, MemoryTokenStore, TokenStore};
use api::payments::{HttpPaymentsApi, PaymentsApi};
use api::pois::{HttpPoisApi, PoisApi};
use api::tickets::{HttpTicketsApi, TicketsApi};
use api::tours::{HttpToursApi, ToursApi};
use checkout::CheckoutDraft;
use config::ApiConfig;
use errors::CoreError;
use models::checkout::{CheckoutLink, InstantReceipt};
use models::user::User;
use session::Session;
use store::CartStore;

/// Composition root for the storefront client: wires the HTTP transport,
/// the typed API clients, the session provider, and the cart store
/// together, and owns the one cart store instance for the process.
///
/// UI layers receive this (or the pieces they need) from the top of the
/// application — there is no ambient global.
#[must_use]
pub struct TourbookClient {
    session: Arc<Session>,
    cart: Arc<CartStore>,
    checkout: Arc<dyn CheckoutApi>,
    tours: Arc<dyn ToursApi>,
    pois: Arc<dyn PoisApi>,
    bookings: Arc<dyn BookingsApi>,
    tickets: Arc<dyn TicketsApi>,
    payments: Arc<dyn PaymentsApi>,
}

impl std::fmt::Debug for TourbookClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TourbookClient")
            .field("authenticated", &self.session.is_authenticated())
            .field("cart_qty", &self.cart.total_qty())
            .finish()
    }
}

impl TourbookClient {
    /// Build against a live backend with an in-memory token store.
    pub fn new(config: ApiConfig) -> Self {
        Self::with_token_store(config, Arc::new(MemoryTokenStore::new()))
    }

    /// Build against a live backend with a host-provided token store
    /// (keychain, browser storage, ...).
    pub fn with_token_store(config: ApiConfig, tokens: Arc<dyn TokenStore>) -> Self {
        let http = Arc::new(ApiClient::new(&config, Arc::clone(&tokens)));
        let session = Arc::new(Session::new(
            Arc::new(HttpAuthApi::new(Arc::clone(&http))),
            tokens,
        ));
        let cart = Arc::new(CartStore::new(
            Arc::new(HttpCartApi::new(Arc::clone(&http))),
            Arc::clone(&session),
        ));
        Self {
            session,
            cart,
            checkout: Arc::new(HttpCheckoutApi::new(Arc::clone(&http))),
            tours: Arc::new(HttpToursApi::new(Arc::clone(&http))),
            pois: Arc::new(HttpPoisApi::new(Arc::clone(&http))),
            bookings: Arc::new(HttpBookingsApi::new(Arc::clone(&http))),
            tickets: Arc::new(HttpTicketsApi::new(Arc::clone(&http))),
            payments: Arc::new(HttpPaymentsApi::new(http)),
        }
    }

    /// Build from explicit collaborators. This is how tests substitute
    /// mock backends.
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        session: Arc<Session>,
        cart_api: Arc<dyn CartApi>,
        checkout: Arc<dyn CheckoutApi>,
        tours: Arc<dyn ToursApi>,
        pois: Arc<dyn PoisApi>,
        bookings: Arc<dyn BookingsApi>,
        tickets: Arc<dyn TicketsApi>,
        payments: Arc<dyn PaymentsApi>,
    ) -> Self {
        let cart = Arc::new(CartStore::new(cart_api, Arc::clone(&session)));
        Self {
            session,
            cart,
            checkout,
            tours,
            pois,
            bookings,
            tickets,
            payments,
        }
    }

    // ── Accessors ───────────────────────────────────────────────────

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub fn cart(&self) -> &Arc<CartStore> {
        &self.cart
    }

    pub fn tours(&self) -> &Arc<dyn ToursApi> {
        &self.tours
    }

    pub fn pois(&self) -> &Arc<dyn PoisApi> {
        &self.pois
    }

    pub fn bookings(&self) -> &Arc<dyn BookingsApi> {
        &self.bookings
    }

    pub fn tickets(&self) -> &Arc<dyn TicketsApi> {
        &self.tickets
    }

    pub fn payments(&self) -> &Arc<dyn PaymentsApi> {
        &self.payments
    }

    pub fn checkout_api(&self) -> &Arc<dyn CheckoutApi> {
        &self.checkout
    }

    // ── Session lifecycle (cart kept in step) ───────────────────────

    /// Log in and bring the cart store in line with the new identity
    /// (silent refresh). The cart sync is best-effort; a fetch failure
    /// does not undo the login.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, CoreError> {
        let user = self.session.login(email, password).await?;
        if let Err(e) = self.cart.sync_session().await {
            tracing::debug!("cart sync after login failed: {e}");
        }
        Ok(user)
    }

    /// Resolve a stored token into an identity on startup, then sync the
    /// cart the same way `login` does.
    pub async fn restore(&self) -> Result<Option<User>, CoreError> {
        let user = self.session.restore().await?;
        if let Err(e) = self.cart.sync_session().await {
            tracing::debug!("cart sync after restore failed: {e}");
        }
        Ok(user)
    }

    /// Log out and drop the local cart snapshot.
    pub fn logout(&self) {
        self.session.logout();
        self.cart.clear_local();
    }

    // ── Checkout convenience ────────────────────────────────────────

    /// Submit a draft through the interactive flow. On success the cart
    /// is resynced silently — the backend removes purchased items, and
    /// the refresh is how that becomes visible here.
    pub async fn create_checkout(&self, draft: &CheckoutDraft) -> Result<CheckoutLink, CoreError> {
        let snapshot = self.cart.snapshot();
        let link = draft.submit(self.checkout.as_ref(), snapshot.as_ref()).await?;
        let _ = self.cart.refresh(true).await;
        Ok(link)
    }

    /// Submit a draft through the instant (demo) flow, then resync the
    /// cart silently.
    pub async fn create_checkout_instant(
        &self,
        draft: &CheckoutDraft,
    ) -> Result<InstantReceipt, CoreError> {
        let snapshot = self.cart.snapshot();
        let receipt = draft
            .submit_instant(self.checkout.as_ref(), snapshot.as_ref())
            .await?;
        let _ = self.cart.refresh(true).await;
        Ok(receipt)
    }
}
