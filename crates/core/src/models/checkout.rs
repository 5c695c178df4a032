use serde::{Deserialize, Serialize};

/// One entry of a checkout request: a cart item id plus the optional
/// contact details collected for that line. Absent fields are omitted
/// from the wire payload entirely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutItem {
    pub cart_item_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// Payment-provider handoff for the interactive flow: a hosted checkout
/// page and/or a QR payload, keyed by the provider's order code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutLink {
    pub provider: String,
    #[serde(rename = "orderCode")]
    pub order_code: u64,
    #[serde(rename = "checkoutUrl", default, skip_serializing_if = "Option::is_none")]
    pub checkout_url: Option<String>,
    #[serde(rename = "qrCode", default, skip_serializing_if = "Option::is_none")]
    pub qr_code: Option<String>,
}

/// Immediate confirmation from the instant (demo) flow — no provider
/// round trip, the order is settled at once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstantReceipt {
    #[serde(rename = "orderCode")]
    pub order_code: u64,
    pub ok: bool,
}
