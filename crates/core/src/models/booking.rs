use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingPaymentStatus {
    Unpaid,
    Paid,
    Failed,
    Refunded,
}

/// A confirmed (or pending) purchase of one departure, created by the
/// backend when a checkout settles. Read-only from this client's side.
///
/// Title and destination are snapshotted at purchase time so later edits
/// to the tour don't rewrite booking history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    #[serde(rename = "_id")]
    pub id: String,
    pub user_id: String,
    pub tour_id: String,
    pub option_id: String,

    pub start_date: NaiveDate,
    #[serde(default)]
    pub start_time: Option<String>,

    pub qty: u32,
    pub unit_price: f64,
    pub total: f64,

    #[serde(default)]
    pub snapshot_title: Option<String>,
    #[serde(default)]
    pub snapshot_destination_name: Option<String>,

    pub status: BookingStatus,
    pub payment_status: BookingPaymentStatus,

    #[serde(default)]
    pub contact_name: Option<String>,
    #[serde(default)]
    pub contact_phone: Option<String>,
    #[serde(default)]
    pub pickup_note: Option<String>,

    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// Whether the trip can still be called off by the customer.
    #[must_use]
    pub fn is_cancellable(&self) -> bool {
        matches!(self.status, BookingStatus::Pending | BookingStatus::Confirmed)
    }
}
