//! GPS sample models.
//!
//! `GpsSample` is what the ingestion boundary hands in; `ResolvedSample` is
//! what the tracker appends to the session log after snapping.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GpsSample {
    pub timestamp: DateTime<Utc>,
    pub lat: f64,
    pub lon: f64,
    pub session_id: Option<String>,
}

impl GpsSample {
    pub fn has_valid_coordinates(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedSample {
    pub timestamp: DateTime<Utc>,
    pub lat: f64,
    pub lon: f64,
    pub snapped_row_index: Option<u32>,
    pub distance_meters: f64,
    /// True only on the sample that flipped a row to sprayed.
    pub marked_sprayed: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LastLocation {
    pub lat: f64,
    pub lon: f64,
    pub timestamp: DateTime<Utc>,
}

impl From<&GpsSample> for LastLocation {
    fn from(sample: &GpsSample) -> Self {
        Self {
            lat: sample.lat,
            lon: sample.lon,
            timestamp: sample.timestamp,
        }
    }
}
