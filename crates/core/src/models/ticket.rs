use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Redemption state of an issued ticket, owned by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketStatus {
    Valid,
    Used,
    Refunded,
    Void,
}

impl std::fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Valid => "valid",
            Self::Used => "used",
            Self::Refunded => "refunded",
            Self::Void => "void",
        };
        f.write_str(s)
    }
}

/// Who the ticket was issued for, as captured at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TicketPassenger {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

/// Summary of the booking a ticket belongs to, embedded in the ticket
/// payload so the list view renders without a second request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketBooking {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub qty: Option<u32>,
    #[serde(default)]
    pub total: Option<f64>,
    #[serde(default)]
    pub snapshot_title: Option<String>,
    #[serde(default)]
    pub snapshot_destination_name: Option<String>,
}

/// An admission ticket issued per booking once payment settles. The QR
/// payload is what the gate scanner reads; the human-readable code is the
/// fallback for manual lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    #[serde(rename = "_id")]
    pub id: String,
    pub code: String,
    pub qr_payload: String,
    pub status: TicketStatus,
    #[serde(default)]
    pub used_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub pickup_note: Option<String>,
    #[serde(default)]
    pub passenger: Option<TicketPassenger>,
    pub booking: TicketBooking,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl Ticket {
    /// Whether the gate would still accept this ticket.
    #[must_use]
    pub fn is_redeemable(&self) -> bool {
        self.status == TicketStatus::Valid
    }
}
