use serde::{Deserialize, Serialize};

/// Map coordinates of a point of interest.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

/// A point of interest listed under a destination, shown alongside tours
/// on the destination page. Purely descriptive; POIs are not bookable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Poi {
    #[serde(rename = "_id")]
    pub id: String,
    pub destination_id: String,
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub duration_min: Option<u32>,
    #[serde(default)]
    pub price_est: Option<f64>,
    pub is_active: bool,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub open_from: Option<String>,
    #[serde(default)]
    pub open_to: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub geo: Option<GeoPoint>,
}
