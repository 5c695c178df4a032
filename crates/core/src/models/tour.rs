use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A bookable tour as listed by the storefront.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tour {
    #[serde(rename = "_id")]
    pub id: String,
    pub destination_id: String,
    pub title: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    pub duration_hr: f64,
    pub is_active: bool,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub rating_avg: Option<f64>,
    #[serde(default)]
    pub policy: Option<String>,
}

/// Lifecycle of a scheduled departure, owned entirely by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TourOptionStatus {
    Open,
    Full,
    Closed,
    Cancelled,
}

/// A specific scheduled departure of a tour, with its own capacity
/// accounting. Capacity is validated server-side at add-to-cart time;
/// the fields here are display hints only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TourOption {
    #[serde(rename = "_id")]
    pub id: String,
    pub tour_id: String,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub start_time: Option<String>,
    pub capacity_total: u32,
    pub capacity_sold: u32,
    #[serde(default)]
    pub cut_off_hours: Option<u32>,
    pub status: TourOptionStatus,
}

impl TourOption {
    /// Seats still available on this departure.
    #[must_use]
    pub fn remaining(&self) -> u32 {
        self.capacity_total.saturating_sub(self.capacity_sold)
    }

    /// Whether the option picker should offer this departure at all.
    #[must_use]
    pub fn is_bookable(&self) -> bool {
        self.status == TourOptionStatus::Open && self.remaining() > 0
    }
}

/// A travel destination grouping tours and points of interest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Destination {
    #[serde(rename = "_id")]
    pub id: String,
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub is_active: bool,
    #[serde(default)]
    pub images: Vec<String>,
}
