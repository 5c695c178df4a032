use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Provider-side state of a payment intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Created,
    Processing,
    Succeeded,
    Failed,
    Canceled,
}

/// One payment intent created for a checkout, as shown in the account's
/// payment history. The intent id is the provider's order code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    #[serde(rename = "_id")]
    pub id: String,
    pub provider: String,
    pub status: PaymentStatus,
    pub amount: f64,
    pub intent_id: String,
    pub user_id: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl Payment {
    /// Whether money actually moved.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.status == PaymentStatus::Succeeded
    }
}
