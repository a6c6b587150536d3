//! Row data models.
//!
//! A row is one line of vines, stored as a centerline line string in
//! geographic coordinates (x = lon, y = lat).

use chrono::{DateTime, Utc};
use geo_types::{LineString, Point};
use serde::{Deserialize, Serialize};

/// A geographic point in decimal degrees.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GeoPoint {
    pub lon: f64,
    pub lat: f64,
}

impl GeoPoint {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }
}

impl From<GeoPoint> for Point<f64> {
    fn from(p: GeoPoint) -> Self {
        Point::new(p.lon, p.lat)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Row {
    /// 1-based, stable for the lifetime of the plot's row set.
    pub index: u32,
    pub centerline: LineString<f64>,
    pub sprayed: bool,
    pub last_sprayed_at: Option<DateTime<Utc>>,
}

impl Row {
    pub fn new(index: u32, centerline: LineString<f64>) -> Self {
        Self {
            index,
            centerline,
            sprayed: false,
            last_sprayed_at: None,
        }
    }

    /// Mark the row sprayed at `at`. Returns true when this call flipped it.
    pub fn mark_sprayed(&mut self, at: DateTime<Utc>) -> bool {
        let newly = !self.sprayed;
        self.sprayed = true;
        self.last_sprayed_at = Some(at);
        newly
    }

    pub fn status(&self) -> RowStatus {
        RowStatus {
            index: self.index,
            sprayed: self.sprayed,
            last_sprayed_at: self.last_sprayed_at,
        }
    }
}

/// Rendering view of a row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RowStatus {
    pub index: u32,
    pub sprayed: bool,
    pub last_sprayed_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn mark_sprayed_reports_first_promotion_only() {
        let mut row = Row::new(1, LineString::from(vec![(0.0, 0.0), (0.0, 1.0)]));
        let first = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
        let second = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 5).unwrap();

        assert!(row.mark_sprayed(first));
        assert!(!row.mark_sprayed(second));
        assert!(row.sprayed);
        assert_eq!(row.last_sprayed_at, Some(second));
    }

    #[test]
    fn status_serializes_camel_case() {
        let row = Row::new(3, LineString::from(vec![(0.0, 0.0), (1.0, 0.0)]));
        let json = serde_json::to_value(row.status()).unwrap();
        assert_eq!(json["index"], 3);
        assert_eq!(json["sprayed"], false);
        assert!(json["lastSprayedAt"].is_null());
    }

    #[test]
    fn geo_point_maps_lon_to_x() {
        let p: Point<f64> = GeoPoint::new(73.8, 18.5).into();
        assert_eq!(p.x(), 73.8);
        assert_eq!(p.y(), 18.5);
    }
}
