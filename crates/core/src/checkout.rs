use std::collections::HashMap;

use crate::api::checkout::CheckoutApi;
use crate::errors::CoreError;
use crate::models::cart::{Cart, CartItem};
use crate::models::checkout::{CheckoutItem, CheckoutLink, InstantReceipt};
use crate::models::user::User;

/// Optional contact details collected for one checkout line. Absent
/// fields fall back to the account's own details server-side.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactOverride {
    pub contact_name: Option<String>,
    pub contact_phone: Option<String>,
    pub address: Option<String>,
}

impl ContactOverride {
    /// Copy name/phone/address from the account — the "book for myself"
    /// shortcut.
    #[must_use]
    pub fn from_user(user: &User) -> Self {
        Self {
            contact_name: Some(user.name.clone()),
            contact_phone: user.phone.clone(),
            address: user.address.clone(),
        }
    }
}

/// One checkout attempt: the item ids carried over from the cart view,
/// plus per-item contact overrides collected in the checkout view.
///
/// Line items are always re-derived from the live snapshot restricted to
/// the surviving selected ids — never a frozen copy — so a concurrent
/// cart change shows up here too. The draft itself never mutates the
/// cart store; emptying the cart of purchased items is the backend's job,
/// observed via a later refresh.
#[derive(Debug, Clone)]
pub struct CheckoutDraft {
    selected_ids: Vec<String>,
    overrides: HashMap<String, ContactOverride>,
}

impl CheckoutDraft {
    /// An empty selection cannot be checked out; the handoff from the
    /// cart view is inert in that case.
    pub fn new(selected_ids: Vec<String>) -> Result<Self, CoreError> {
        let selected_ids: Vec<String> =
            selected_ids.into_iter().filter(|id| !id.is_empty()).collect();
        if selected_ids.is_empty() {
            return Err(CoreError::Validation(
                "No items selected for checkout".to_string(),
            ));
        }
        Ok(Self {
            selected_ids,
            overrides: HashMap::new(),
        })
    }

    #[must_use]
    pub fn selected_ids(&self) -> &[String] {
        &self.selected_ids
    }

    /// The selected lines still present in the live snapshot, in snapshot
    /// order.
    #[must_use]
    pub fn line_items<'a>(&self, cart: Option<&'a Cart>) -> Vec<&'a CartItem> {
        let Some(cart) = cart else {
            return Vec::new();
        };
        cart.items
            .iter()
            .filter(|i| self.selected_ids.iter().any(|id| *id == i.id))
            .collect()
    }

    /// Total over the surviving selected lines.
    #[must_use]
    pub fn total(&self, cart: Option<&Cart>) -> f64 {
        self.line_items(cart).iter().map(|i| i.subtotal()).sum()
    }

    pub fn set_contact(&mut self, item_id: &str, contact: ContactOverride) {
        self.overrides.insert(item_id.to_string(), contact);
    }

    #[must_use]
    pub fn contact(&self, item_id: &str) -> Option<&ContactOverride> {
        self.overrides.get(item_id)
    }

    /// Prefill one line's contact fields from the account.
    pub fn fill_from_user(&mut self, item_id: &str, user: &User) {
        self.set_contact(item_id, ContactOverride::from_user(user));
    }

    /// Check the draft against the live snapshot: at least one surviving
    /// line, and every present phone override well-formed. The error
    /// names the offending line so the view can point at it.
    pub fn validate(&self, cart: Option<&Cart>) -> Result<(), CoreError> {
        let items = self.line_items(cart);
        if items.is_empty() {
            return Err(CoreError::Validation(
                "No items selected for checkout".to_string(),
            ));
        }
        for item in items {
            if let Some(contact) = self.overrides.get(&item.id) {
                if let Some(phone) = contact.contact_phone.as_deref() {
                    let phone = phone.trim();
                    if !phone.is_empty() && !is_valid_phone(phone) {
                        return Err(CoreError::Validation(format!(
                            "Invalid contact phone for {}",
                            item_label(item)
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    /// Validate, then build one request entry per surviving selected
    /// line. Overrides are trimmed; empty strings are omitted.
    pub fn build_items(&self, cart: Option<&Cart>) -> Result<Vec<CheckoutItem>, CoreError> {
        self.validate(cart)?;
        Ok(self
            .line_items(cart)
            .into_iter()
            .map(|item| {
                let contact = self.overrides.get(&item.id);
                CheckoutItem {
                    cart_item_id: item.id.clone(),
                    contact_name: contact.and_then(|c| clean(c.contact_name.as_deref())),
                    contact_phone: contact.and_then(|c| clean(c.contact_phone.as_deref())),
                    address: contact.and_then(|c| clean(c.address.as_deref())),
                }
            })
            .collect())
    }

    /// Interactive flow: create a checkout and hand back the payment
    /// link / QR payload.
    pub async fn submit(
        &self,
        api: &dyn CheckoutApi,
        cart: Option<&Cart>,
    ) -> Result<CheckoutLink, CoreError> {
        let items = self.build_items(cart)?;
        api.create_checkout(&items).await
    }

    /// Instant (demo) flow: settle at once and return the confirmation
    /// code for the success view.
    pub async fn submit_instant(
        &self,
        api: &dyn CheckoutApi,
        cart: Option<&Cart>,
    ) -> Result<InstantReceipt, CoreError> {
        let items = self.build_items(cart)?;
        api.create_checkout_instant(&items).await
    }
}

fn item_label(item: &CartItem) -> String {
    format!("{} #{}", item.kind, item.ref_id)
}

fn clean(value: Option<&str>) -> Option<String> {
    let trimmed = value?.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Contact phone shape: an optional leading `+` followed by 8–15 digits.
#[must_use]
pub fn is_valid_phone(phone: &str) -> bool {
    let digits = phone.strip_prefix('+').unwrap_or(phone);
    (8..=15).contains(&digits.len()) && digits.chars().all(|c| c.is_ascii_digit())
}
