use std::collections::HashMap;

use crate::models::cart::Cart;

/// Per-view checkbox state for the cart list: which line items are ticked
/// for the upcoming checkout.
///
/// Selection is ephemeral — it lives in the view, not in the cart — and
/// is reconciled against the snapshot with [`sync`](Self::sync) whenever
/// the snapshot's item-id set changes: surviving ids keep their tick, new
/// items default to selected, ids that no longer exist are dropped.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    selected: HashMap<String, bool>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with every item in `cart` selected.
    #[must_use]
    pub fn all_from(cart: &Cart) -> Self {
        let mut selection = Self::new();
        selection.sync(Some(cart));
        selection
    }

    /// Reconcile against the current snapshot. `None` (no cart) clears
    /// everything.
    pub fn sync(&mut self, cart: Option<&Cart>) {
        let Some(cart) = cart else {
            self.selected.clear();
            return;
        };
        let mut next = HashMap::with_capacity(cart.items.len());
        for item in &cart.items {
            let ticked = self.selected.get(&item.id).copied().unwrap_or(true);
            next.insert(item.id.clone(), ticked);
        }
        self.selected = next;
    }

    pub fn toggle(&mut self, item_id: &str, selected: bool) {
        self.selected.insert(item_id.to_string(), selected);
    }

    pub fn set_all(&mut self, cart: &Cart, selected: bool) {
        for item in &cart.items {
            self.selected.insert(item.id.clone(), selected);
        }
    }

    #[must_use]
    pub fn is_selected(&self, item_id: &str) -> bool {
        self.selected.get(item_id).copied().unwrap_or(false)
    }

    /// True when the cart is non-empty and every item is ticked.
    #[must_use]
    pub fn all_selected(&self, cart: &Cart) -> bool {
        !cart.items.is_empty() && cart.items.iter().all(|i| self.is_selected(&i.id))
    }

    /// True when at least one item is ticked. The checkout handoff is
    /// inert (button disabled) when this is false.
    #[must_use]
    pub fn any_selected(&self, cart: &Cart) -> bool {
        cart.items.iter().any(|i| self.is_selected(&i.id))
    }

    /// Ticked item ids, in snapshot order.
    #[must_use]
    pub fn selected_ids(&self, cart: &Cart) -> Vec<String> {
        cart.items
            .iter()
            .filter(|i| self.is_selected(&i.id))
            .map(|i| i.id.clone())
            .collect()
    }

    #[must_use]
    pub fn selected_count(&self, cart: &Cart) -> usize {
        cart.items.iter().filter(|i| self.is_selected(&i.id)).count()
    }

    /// Total price over the ticked subset (Σ qty × unit price). A pure
    /// projection of the snapshot — never stored.
    #[must_use]
    pub fn selected_total(&self, cart: &Cart) -> f64 {
        cart.items
            .iter()
            .filter(|i| self.is_selected(&i.id))
            .map(|i| i.subtotal())
            .sum()
    }
}
