use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use crate::api::cart::CartApi;
use crate::errors::CoreError;
use crate::models::cart::Cart;
use crate::session::Session;
use crate::subscribers::{Subscribers, SubscriptionId};

#[derive(Debug, Default)]
struct StoreState {
    cart: Option<Cart>,
    loading: bool,
    /// User id the store last synchronized against. `sync_session` acts
    /// only when the session's identity differs from this.
    synced_identity: Option<String>,
}

/// The single process-wide owner of the cart snapshot for the active
/// identity. Consumers never talk to the cart endpoints directly — every
/// read and write goes through here.
///
/// Mutations are optimistic where latency matters (`update_qty`,
/// `remove`): the local snapshot changes synchronously before the network
/// call is issued, and a failed call rolls the guess back with a silent
/// re-fetch of server truth. `add_tour_item` is not optimistic — price
/// and capacity come from the server, so the snapshot only changes once
/// the server has answered.
///
/// Same-item mutations are serialized through a per-item async guard, so
/// two rapid quantity changes on one line cannot interleave their
/// optimistic writes with out-of-order responses. Mutations on different
/// items stay independent.
pub struct CartStore {
    api: Arc<dyn CartApi>,
    session: Arc<Session>,
    state: Mutex<StoreState>,
    /// Issue counter for `refresh`; only the latest-issued call may apply
    /// its result.
    refresh_seq: AtomicU64,
    subscribers: Subscribers<Option<Cart>>,
    item_guards: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock().ok();
        f.debug_struct("CartStore")
            .field(
                "items",
                &state
                    .as_ref()
                    .and_then(|s| s.cart.as_ref().map(|c| c.items.len())),
            )
            .field("loading", &state.as_ref().map(|s| s.loading))
            .finish()
    }
}

impl CartStore {
    pub fn new(api: Arc<dyn CartApi>, session: Arc<Session>) -> Self {
        Self {
            api,
            session,
            state: Mutex::new(StoreState::default()),
            refresh_seq: AtomicU64::new(0),
            subscribers: Subscribers::new(),
            item_guards: Mutex::new(HashMap::new()),
        }
    }

    // ── Reads ───────────────────────────────────────────────────────

    /// The current snapshot, or `None` when unauthenticated or not yet
    /// loaded.
    #[must_use]
    pub fn snapshot(&self) -> Option<Cart> {
        self.state.lock().ok().and_then(|s| s.cart.clone())
    }

    /// True only while a non-silent refresh is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state.lock().map(|s| s.loading).unwrap_or(false)
    }

    /// Sum of quantities across all items; 0 with no cart.
    #[must_use]
    pub fn total_qty(&self) -> u32 {
        self.state
            .lock()
            .ok()
            .and_then(|s| s.cart.as_ref().map(Cart::total_qty))
            .unwrap_or(0)
    }

    /// Register a callback invoked with the new snapshot after every
    /// snapshot change, optimistic or confirmed.
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&Option<Cart>) + Send + Sync + 'static,
    {
        self.subscribers.add(callback)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.subscribers.remove(id)
    }

    // ── Operations ──────────────────────────────────────────────────

    /// Fetch the authoritative cart and replace the snapshot.
    ///
    /// With no identity present this clears the snapshot without touching
    /// the network. Each call gets a monotonically increasing sequence
    /// number; a call superseded by a later one discards its own result,
    /// so a slow early response can never clobber a later one
    /// (last-issued-wins). `silent` never raises the loading flag, for
    /// background resyncs that shouldn't flicker the UI; the winning call
    /// always lowers it, so a superseded non-silent call cannot strand it
    /// raised.
    pub async fn refresh(&self, silent: bool) -> Result<(), CoreError> {
        if !self.session.is_authenticated() {
            self.clear_local();
            return Ok(());
        }

        let seq = self.refresh_seq.fetch_add(1, Ordering::SeqCst) + 1;
        if !silent {
            self.set_loading(true);
        }

        let result = self.api.get_cart().await;

        if seq != self.refresh_seq.load(Ordering::SeqCst) {
            // A newer refresh owns the snapshot now, and the loading flag
            // with it.
            tracing::debug!(seq, "discarding stale cart refresh response");
            return Ok(());
        }

        // Latest call: lower the flag even when silent, in case a
        // superseded non-silent call raised it.
        self.set_loading(false);

        match result {
            Ok(cart) => {
                self.replace_snapshot(Some(cart));
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Add a tour departure to the cart.
    ///
    /// The server is the sole authority for price lookup, capacity
    /// validation, and duplicate-line merging, so there is no optimistic
    /// local add: on success the whole snapshot is replaced with the
    /// server's cart, and on failure nothing local changes.
    pub async fn add_tour_item(
        &self,
        tour_id: &str,
        option_id: &str,
        qty: u32,
    ) -> Result<(), CoreError> {
        if !self.session.is_authenticated() {
            return Err(CoreError::NotAuthenticated);
        }
        let cart = self.api.add_tour_item(tour_id, option_id, qty).await?;
        self.replace_snapshot(Some(cart));
        Ok(())
    }

    /// Set the quantity of one cart line.
    ///
    /// `qty < 1` is rejected silently — no network call, snapshot
    /// unchanged. Otherwise the local quantity changes immediately
    /// (optimistic), then the endpoint is called; success replaces the
    /// snapshot with the authoritative cart, failure rolls back with a
    /// silent refresh and re-throws so the consumer can surface it.
    pub async fn update_qty(&self, item_id: &str, qty: u32) -> Result<(), CoreError> {
        if qty < 1 {
            return Ok(());
        }

        let guard = self.item_guard(item_id);
        let _in_flight = guard.lock().await;

        // Optimistic write, strictly before the network call is issued.
        let patched = self.patch_qty_local(item_id, qty);
        if let Some(cart) = patched {
            self.subscribers.notify(&Some(cart));
        }

        match self.api.update_item_qty(item_id, qty).await {
            Ok(cart) => {
                self.replace_snapshot(Some(cart));
                Ok(())
            }
            Err(e) => {
                tracing::warn!(item_id, "quantity update failed, resyncing cart: {e}");
                // Best-effort rollback: re-fetch server truth. A failed
                // rollback leaves the last successfully fetched snapshot.
                let _ = self.refresh(true).await;
                Err(e)
            }
        }
    }

    /// Remove one cart line. Symmetric to [`update_qty`](Self::update_qty):
    /// optimistic local removal, then the endpoint, with a silent refresh
    /// as rollback on failure.
    pub async fn remove(&self, item_id: &str) -> Result<(), CoreError> {
        let guard = self.item_guard(item_id);
        let _in_flight = guard.lock().await;

        let removed = self.remove_local(item_id);
        if let Some(cart) = removed {
            self.subscribers.notify(&Some(cart));
        }

        match self.api.remove_item(item_id).await {
            Ok(cart) => {
                self.replace_snapshot(Some(cart));
                Ok(())
            }
            Err(e) => {
                tracing::warn!(item_id, "remove failed, resyncing cart: {e}");
                let _ = self.refresh(true).await;
                Err(e)
            }
        }
    }

    /// Drop the snapshot and reset the loading flag. No network call.
    /// Used when the identity is lost.
    pub fn clear_local(&self) {
        let had_cart = {
            let Ok(mut state) = self.state.lock() else {
                return;
            };
            state.loading = false;
            state.synced_identity = None;
            state.cart.take().is_some()
        };
        if had_cart {
            self.subscribers.notify(&None);
        }
    }

    /// React to a session identity transition: silent refresh when an
    /// identity appeared, local clear when it went away. Acts only when
    /// the identity actually differs from the one last synchronized, so
    /// wiring this to a render loop cannot cause a request storm.
    pub async fn sync_session(&self) -> Result<(), CoreError> {
        let identity = self.session.current_user().map(|u| u.id);
        let changed = {
            let Ok(mut state) = self.state.lock() else {
                return Ok(());
            };
            if state.synced_identity == identity {
                false
            } else {
                state.synced_identity = identity.clone();
                true
            }
        };
        if !changed {
            return Ok(());
        }
        if identity.is_some() {
            self.refresh(true).await
        } else {
            self.clear_local();
            Ok(())
        }
    }

    // ── Internal ────────────────────────────────────────────────────

    fn set_loading(&self, loading: bool) {
        if let Ok(mut state) = self.state.lock() {
            state.loading = loading;
        }
    }

    /// Replace the snapshot wholesale and notify subscribers.
    fn replace_snapshot(&self, cart: Option<Cart>) {
        {
            let Ok(mut state) = self.state.lock() else {
                return;
            };
            state.cart = cart.clone();
        }
        self.subscribers.notify(&cart);
    }

    /// Optimistically set an item's quantity in place. Returns the new
    /// snapshot if anything changed.
    fn patch_qty_local(&self, item_id: &str, qty: u32) -> Option<Cart> {
        let Ok(mut state) = self.state.lock() else {
            return None;
        };
        let cart = state.cart.as_mut()?;
        let item = cart.items.iter_mut().find(|i| i.id == item_id)?;
        if item.qty == qty {
            return None;
        }
        item.qty = qty;
        Some(cart.clone())
    }

    /// Optimistically drop an item. Returns the new snapshot if the item
    /// was present.
    fn remove_local(&self, item_id: &str) -> Option<Cart> {
        let Ok(mut state) = self.state.lock() else {
            return None;
        };
        let cart = state.cart.as_mut()?;
        let before = cart.items.len();
        cart.items.retain(|i| i.id != item_id);
        if cart.items.len() == before {
            return None;
        }
        Some(cart.clone())
    }

    /// Per-item in-flight guard. Entries whose only holder is the map are
    /// pruned on each lookup.
    fn item_guard(&self, item_id: &str) -> Arc<tokio::sync::Mutex<()>> {
        let Ok(mut guards) = self.item_guards.lock() else {
            return Arc::new(tokio::sync::Mutex::new(()));
        };
        guards.retain(|_, g| Arc::strong_count(g) > 1);
        Arc::clone(
            guards
                .entry(item_id.to_string())
                .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(()))),
        )
    }
}
